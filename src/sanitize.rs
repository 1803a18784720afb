//! Sanitization of remotely fetched markup.
//!
//! Remote content is never inserted without passing through a [`Sanitizer`].
//! The default [`DomSanitizer`] parses the text inside an inert `<template>`
//! (nothing executes, nothing loads) and walks every element against an
//! allowlist.  Unknown elements are unwrapped and unknown attributes removed;
//! allowed URL attributes are additionally checked for script schemes.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlTemplateElement, Node};

use crate::dom_utils;
use crate::errors::{ModalError, Result};

/// Turns untrusted markup into markup that is safe to assign to `innerHTML`.
pub trait Sanitizer {
    fn sanitize(&self, raw: &str) -> Result<String>;
}

/// Elements kept as they are (after attribute filtering).  Anything else is
/// unwrapped, or dropped with its subtree when listed in [`DROPPED_TAGS`].
const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "address", "article", "aside", "b", "bdi", "bdo", "blockquote", "br", "button",
    "caption", "cite", "code", "col", "colgroup", "dd", "del", "details", "dfn", "div", "dl", "dt",
    "em", "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "i",
    "img", "ins", "kbd", "li", "main", "mark", "nav", "ol", "p", "picture", "pre", "q", "s", "samp",
    "section", "small", "source", "span", "strong", "sub", "summary", "sup", "table", "tbody", "td",
    "tfoot", "th", "thead", "time", "tr", "u", "ul", "var", "wbr",
];

/// Elements removed together with their whole subtree: executable or
/// foreign content, and raw text containers whose text is not meant to show.
const DROPPED_TAGS: &[&str] = &[
    "script", "style", "template", "noscript", "iframe", "frame", "frameset", "object", "embed",
    "applet", "base", "link", "meta", "title", "head", "svg", "math", "form", "textarea", "select",
    "noembed", "noframes", "xmp", "plaintext",
];

/// Attributes kept on any allowed element, besides `data-*` and `aria-*`.
const ALLOWED_ATTRS: &[&str] = &[
    "id", "class", "title", "lang", "dir", "role", "hidden", "tabindex", "style", "alt", "width",
    "height", "href", "src", "srcset", "sizes", "target", "rel", "hreflang", "download", "type",
    "value", "colspan", "rowspan", "scope", "headers", "span", "start", "reversed", "datetime",
    "cite", "open", "loading", "decoding", "disabled",
];

/// Allowed attributes whose value is dereferenced as a URL.
const URL_ATTRS: &[&str] = &["href", "src", "cite"];

const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// What happens to an element during sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagVerdict {
    Keep,
    /// Replace the element by its children.
    Unwrap,
    /// Remove the element and everything inside it.
    Drop,
}

pub fn tag_verdict(tag: &str) -> TagVerdict {
    let tag = tag.to_ascii_lowercase();
    if ALLOWED_TAGS.contains(&tag.as_str()) {
        TagVerdict::Keep
    } else if DROPPED_TAGS.contains(&tag.as_str()) {
        TagVerdict::Drop
    } else {
        TagVerdict::Unwrap
    }
}

/// URL values are compared after dropping whitespace and control characters,
/// which browsers also ignore inside a scheme (`java\tscript:`).
pub fn is_unsafe_url(value: &str) -> bool {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    // inline images are the one data: URL worth keeping
    if normalized.starts_with("data:image/") && !normalized.starts_with("data:image/svg") {
        return false;
    }
    UNSAFE_SCHEMES.iter().any(|scheme| normalized.starts_with(scheme))
}

/// True when the attribute must be removed: not on the allowlist, or
/// allowed but carrying a script-capable value.
pub fn is_unsafe_attribute(name: &str, value: &str) -> bool {
    let name = name.to_ascii_lowercase();
    let allowed = ALLOWED_ATTRS.contains(&name.as_str())
        || (name.starts_with("data-") && name.len() > 5)
        || (name.starts_with("aria-") && name.len() > 5);
    if !allowed {
        return true;
    }
    match name.as_str() {
        "style" => {
            let v = value.to_ascii_lowercase();
            v.contains("expression(") || v.contains("javascript:") || v.contains("url(") || v.contains("@import")
        }
        "srcset" => value.split(',').any(is_unsafe_url),
        _ => URL_ATTRS.contains(&name.as_str()) && is_unsafe_url(value),
    }
}

/// Browser-backed sanitizer, the default collaborator.
#[derive(Debug, Clone, Default)]
pub struct DomSanitizer;

impl DomSanitizer {
    fn template(document: &Document) -> Result<HtmlTemplateElement> {
        document
            .create_element("template")?
            .dyn_into::<HtmlTemplateElement>()
            .map_err(|_| ModalError::Dom("<template> is not supported".into()))
    }

    fn scrub(el: &Element) -> Result<()> {
        match tag_verdict(&el.tag_name()) {
            TagVerdict::Drop => {
                el.remove();
                return Ok(());
            }
            TagVerdict::Unwrap => {
                // children stay in place and are visited later in document order
                if let Some(parent) = el.parent_node() {
                    let anchor: &Node = el.as_ref();
                    while let Some(child) = el.first_child() {
                        parent.insert_before(&child, Some(anchor))?;
                    }
                }
                el.remove();
                return Ok(());
            }
            TagVerdict::Keep => {}
        }

        let attrs = el.attributes();
        let doomed: Vec<String> = (0..attrs.length())
            .filter_map(|i| attrs.item(i))
            .filter(|attr| is_unsafe_attribute(&attr.name(), &attr.value()))
            .map(|attr| attr.name())
            .collect();
        for name in doomed {
            el.remove_attribute(&name)?;
        }
        Ok(())
    }
}

impl Sanitizer for DomSanitizer {
    fn sanitize(&self, raw: &str) -> Result<String> {
        let document = dom_utils::document()?;
        let template = Self::template(&document)?;
        template.set_inner_html(raw);

        let content = template.content();
        let all = content.query_selector_all("*")?;
        for el in dom_utils::elements_of(&all) {
            // already gone with a dropped ancestor
            let node: &Node = el.as_ref();
            if !content.contains(Some(node)) {
                continue;
            }
            Self::scrub(&el)?;
        }

        Ok(template.inner_html())
    }
}
