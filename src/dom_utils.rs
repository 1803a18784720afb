//! dom_utils.rs – thin helper layer for repetitive DOM operations.
//!
//! Keeps the `window()?.document()?` dance and the class / style toggles out
//! of the lifecycle code.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList};

use crate::errors::{ModalError, Result};

pub fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ModalError::Dom("no global `document` exists".into()))
}

pub fn body(document: &Document) -> Result<HtmlElement> {
    document
        .body()
        .ok_or_else(|| ModalError::Dom("document has no <body>".into()))
}

/// `<html>` as an `HtmlElement` so its inline style can be edited.
pub fn root_element(document: &Document) -> Result<HtmlElement> {
    document
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| ModalError::Dom("document has no root element".into()))
}

pub fn create(document: &Document, tag: &str, class: &str) -> Result<Element> {
    let el = document.create_element(tag)?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    Ok(el)
}

pub fn add_class(el: &Element, class: &str) {
    let _ = el.class_list().add_1(class);
}

pub fn remove_class(el: &Element, class: &str) {
    let _ = el.class_list().remove_1(class);
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

/// Set one inline style property, leaving the rest of `style` untouched.
pub fn set_style(el: &Element, property: &str, value: &str) -> Result<()> {
    match el.dyn_ref::<HtmlElement>() {
        Some(html) => html.style().set_property(property, value)?,
        // SVG and friends: fall back to the style attribute
        None => {
            let existing = el.get_attribute("style").unwrap_or_default();
            let sep = if existing.trim().is_empty() || existing.trim_end().ends_with(';') { "" } else { ";" };
            el.set_attribute("style", &format!("{}{}{}: {};", existing, sep, property, value))?;
        }
    }
    Ok(())
}

/// Snapshot a live or static `NodeList` into elements so callers can mutate
/// the tree while iterating.
pub fn elements_of(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Detach `el` from its parent if it has one.  Detaching twice is a no-op.
pub fn detach(el: &Element) {
    el.remove();
}
