//! Content resolver: turns a [`ContentSource`] into a DOM node ready to be
//! appended to the modal's inner container.
//!
//! Only the remote strategy suspends, but every strategy goes through the
//! same async [`ContentSource::resolve`] so callers never branch on the kind.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement, HtmlTemplateElement, Node};

use crate::config::ContentSource;
use crate::constants::TEXT_CLASS;
use crate::dom_utils;
use crate::errors::{ModalError, Result};
use crate::network::{BrowserFetcher, Fetcher};
use crate::sanitize::{DomSanitizer, Sanitizer};

/// External services the resolver depends on.  Cheap to clone; nested
/// instances created by discovery share their parent's collaborators.
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Rc<dyn Fetcher>,
    pub sanitizer: Rc<dyn Sanitizer>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            fetcher: Rc::new(BrowserFetcher::default()),
            sanitizer: Rc::new(DomSanitizer),
        }
    }
}

impl Collaborators {
    pub fn new(fetcher: Rc<dyn Fetcher>, sanitizer: Rc<dyn Sanitizer>) -> Self {
        Self { fetcher, sanitizer }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

impl ContentSource {
    pub async fn resolve(&self, document: &Document, collaborators: &Collaborators) -> Result<Node> {
        match self {
            ContentSource::Remote { url } => {
                let raw = collaborators.fetcher.fetch_text(url).await?;
                let clean = collaborators.sanitizer.sanitize(&raw)?;
                markup_fragment(document, &clean)
            }
            ContentSource::Selector { selector, display } => clone_selector(document, selector, display),
            ContentSource::Image { src } => image(document, src),
            // appending moves the node out of wherever it lives now
            ContentSource::Node(node) => Ok(node.clone()),
            ContentSource::Text(text) => paragraph(document, text),
        }
    }
}

/// Parse already-sanitized markup into a fragment without executing it.
fn markup_fragment(document: &Document, markup: &str) -> Result<Node> {
    let template = document
        .create_element("template")?
        .dyn_into::<HtmlTemplateElement>()
        .map_err(|_| ModalError::Dom("<template> is not supported".into()))?;
    template.set_inner_html(markup);
    Ok(template.content().into())
}

fn clone_selector(document: &Document, selector: &str, display: &str) -> Result<Node> {
    let found = document
        .query_selector(selector)
        .map_err(|_| ModalError::configuration(format!("invalid selector `{}`", selector)))?
        .ok_or_else(|| ModalError::ContentNotFound { selector: selector.to_string() })?;

    let copy = found
        .clone_node_with_deep(true)?
        .dyn_into::<Element>()
        .map_err(|_| ModalError::Dom(format!("clone of `{}` is not an element", selector)))?;
    // templates are usually hidden with display:none
    dom_utils::set_style(&copy, "display", display)?;
    Ok(copy.into())
}

fn image(document: &Document, src: &str) -> Result<Node> {
    let img = document
        .create_element("img")?
        .dyn_into::<HtmlImageElement>()
        .map_err(|_| ModalError::Dom("<img> is not an HtmlImageElement".into()))?;
    img.set_src(src);
    let style = img.style();
    style.set_property("max-width", "100%")?;
    style.set_property("display", "block")?;
    Ok(img.into())
}

fn paragraph(document: &Document, text: &str) -> Result<Node> {
    let p = dom_utils::create(document, "p", TEXT_CLASS)?;
    p.set_text_content(Some(text));
    Ok(p.into())
}
