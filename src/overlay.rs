//! Overlay skeleton: the reusable DOM shell every modal renders into.
//!
//! ```text
//! div.m-modal-overlay
//! └── div.m-modal-wrapper
//!     ├── button.m-modal-close[type=button]
//!     └── div.m-modal-inner-wrapper   <- content goes here
//! ```

use web_sys::{Document, Element, EventTarget, Node};

use crate::constants::{CLOSE_CLASS, INNER_WRAPPER_CLASS, OVERLAY_ACTIVE_CLASS, OVERLAY_CLASS, WRAPPER_CLASS};
use crate::dom_utils;
use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct Skeleton {
    pub overlay: Element,
    pub wrapper: Element,
    pub inner: Element,
    pub close: Element,
}

impl Skeleton {
    /// Build the detached shell.  Nothing is inserted into the live
    /// document and no content is involved.
    pub fn build(document: &Document) -> Result<Self> {
        let overlay = dom_utils::create(document, "div", OVERLAY_CLASS)?;
        let wrapper = dom_utils::create(document, "div", WRAPPER_CLASS)?;
        let inner = dom_utils::create(document, "div", INNER_WRAPPER_CLASS)?;
        let close = dom_utils::create(document, "button", CLOSE_CLASS)?;
        close.set_attribute("type", "button")?;
        close.set_attribute("aria-label", "Close")?;

        wrapper.append_child(&close)?;
        wrapper.append_child(&inner)?;
        overlay.append_child(&wrapper)?;

        Ok(Self { overlay, wrapper, inner, close })
    }

    pub fn is_attached(&self) -> bool {
        self.overlay.is_connected()
    }

    /// Append the overlay to `<body>` unless it is already in the document.
    pub fn attach(&self, document: &Document) -> Result<()> {
        if !self.is_attached() {
            dom_utils::body(document)?.append_child(&self.overlay)?;
        }
        Ok(())
    }

    pub fn detach(&self) {
        dom_utils::detach(&self.overlay);
    }

    pub fn is_active(&self) -> bool {
        dom_utils::has_class(&self.overlay, OVERLAY_ACTIVE_CLASS)
    }

    pub fn set_active(&self, active: bool) {
        if active {
            dom_utils::add_class(&self.overlay, OVERLAY_ACTIVE_CLASS);
        } else {
            dom_utils::remove_class(&self.overlay, OVERLAY_ACTIVE_CLASS);
        }
    }

    /// True when a click landed on the backdrop itself rather than on the
    /// wrapper or anything inside it.
    pub fn is_backdrop_target(&self, target: Option<&EventTarget>) -> bool {
        let overlay: &EventTarget = self.overlay.as_ref();
        target.map_or(false, |t| t == overlay)
    }

    pub fn insert_content(&self, content: &Node) -> Result<()> {
        self.inner.append_child(content)?;
        Ok(())
    }
}
