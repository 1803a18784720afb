//! Construction input for a modal.
//!
//! Two entry points produce a [`ModalConfig`]: the JS options object handed to
//! `new Modal({...})` (via [`ModalOptions`]) and the `data-*` attributes of a
//! declarative trigger (via [`TriggerAttributes`]).  Both funnel through
//! [`ContentSource::from_kind`] so validation lives in one place.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Node, NodeList};

use crate::constants::{
    ATTR_DISPLAY, ATTR_HEIGHT, ATTR_TARGET, ATTR_TYPE, ATTR_WIDTH, ATTR_Z_INDEX, DEFAULT_DISPLAY,
    DEFAULT_HEIGHT, DEFAULT_WIDTH, DEFAULT_Z_INDEX,
};
use crate::dom_utils;
use crate::errors::{ModalError, Result};

// ---------------------------------------------------------------------------
// Content kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Remote,
    Selector,
    Image,
    Node,
    Text,
}

impl FromStr for ContentKind {
    type Err = ModalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            // "ajax" is what existing markup in the wild uses
            "remote" | "ajax" => Ok(Self::Remote),
            "selector" => Ok(Self::Selector),
            "image" => Ok(Self::Image),
            "node" => Ok(Self::Node),
            "text" => Ok(Self::Text),
            other => Err(ModalError::configuration(format!("unknown content type `{}`", other))),
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Remote => "remote",
            ContentKind::Selector => "selector",
            ContentKind::Image => "image",
            ContentKind::Node => "node",
            ContentKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// Raw `target` value before it is checked against a content kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentRef {
    Missing,
    Text(String),
    Node(Node),
}

impl ContentRef {
    /// Interpret an arbitrary JS value: strings stay strings, DOM nodes stay
    /// nodes, `null` / `undefined` are missing.  Anything else is rejected.
    pub fn from_js(value: &JsValue) -> Result<Self> {
        if value.is_null() || value.is_undefined() {
            return Ok(Self::Missing);
        }
        if let Some(s) = value.as_string() {
            return Ok(Self::Text(s));
        }
        match value.dyn_ref::<Node>() {
            Some(node) => Ok(Self::Node(node.clone())),
            None => Err(ModalError::configuration("target must be a string or a DOM node")),
        }
    }
}

impl From<Option<String>> for ContentRef {
    fn from(value: Option<String>) -> Self {
        value.map(ContentRef::Text).unwrap_or(ContentRef::Missing)
    }
}

/// Where modal content comes from.  One variant per content kind, each
/// carrying exactly the reference its strategy needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    /// Fetch markup from a URL; always sanitized before insertion.
    Remote { url: String },
    /// Deep-clone the first element matching `selector`.
    Selector { selector: String, display: String },
    /// An `<img>` pointing at `src`.
    Image { src: String },
    /// Move an existing node into the modal.
    Node(Node),
    /// Literal text, never parsed as markup.
    Text(String),
}

impl ContentSource {
    pub fn from_kind(kind: ContentKind, target: ContentRef, display: &str) -> Result<Self> {
        match (kind, target) {
            (ContentKind::Node, ContentRef::Node(node)) => Ok(Self::Node(node)),
            (ContentKind::Node, _) => Err(ModalError::configuration(
                "content type `node` needs a DOM node as target",
            )),
            (ContentKind::Text, ContentRef::Text(text)) => Ok(Self::Text(text)),
            (ContentKind::Remote, ContentRef::Text(url)) => Ok(Self::Remote {
                url: required(kind, url)?,
            }),
            (ContentKind::Selector, ContentRef::Text(selector)) => Ok(Self::Selector {
                selector: required(kind, selector)?,
                display: display.to_string(),
            }),
            (ContentKind::Image, ContentRef::Text(src)) => Ok(Self::Image {
                src: required(kind, src)?,
            }),
            (kind, ContentRef::Node(_)) => Err(ModalError::configuration(format!(
                "content type `{}` needs a string target, got a DOM node",
                kind
            ))),
            (kind, ContentRef::Missing) => Err(ModalError::configuration(format!(
                "content type `{}` needs a target",
                kind
            ))),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Remote { .. } => ContentKind::Remote,
            Self::Selector { .. } => ContentKind::Selector,
            Self::Image { .. } => ContentKind::Image,
            Self::Node(_) => ContentKind::Node,
            Self::Text(_) => ContentKind::Text,
        }
    }
}

fn required(kind: ContentKind, reference: String) -> Result<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ModalError::configuration(format!(
            "content type `{}` needs a non-empty target",
            kind
        )));
    }
    Ok(reference.to_string())
}

// ---------------------------------------------------------------------------
// Scan root
// ---------------------------------------------------------------------------

/// Subtree searched by trigger discovery.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanRoot {
    /// The current page's document, resolved when the scan runs.
    #[default]
    Page,
    Document(Document),
    Element(Element),
}

impl ScanRoot {
    pub fn query_all(&self, selector: &str) -> Result<NodeList> {
        let list = match self {
            ScanRoot::Page => dom_utils::document()?.query_selector_all(selector)?,
            ScanRoot::Document(doc) => doc.query_selector_all(selector)?,
            ScanRoot::Element(el) => el.query_selector_all(selector)?,
        };
        Ok(list)
    }
}

// ---------------------------------------------------------------------------
// Presentation options
// ---------------------------------------------------------------------------

/// Values pushed into the page-wide CSS custom properties on every open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub z_index: u32,
    pub width: String,
    pub height: String,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            z_index: DEFAULT_Z_INDEX,
            width: DEFAULT_WIDTH.to_string(),
            height: DEFAULT_HEIGHT.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ModalConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ModalConfig {
    pub presentation: Presentation,
    /// `None` only for discovery-only instances (`Modal.init()`).
    pub content: Option<ContentSource>,
    pub trigger: Option<Element>,
    pub auto_discover: bool,
    pub scan_root: ScanRoot,
    /// Do not attach the trigger click listener at construction.
    pub skip_auto_wire: bool,
    pub open_immediately: bool,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            presentation: Presentation::default(),
            content: None,
            trigger: None,
            auto_discover: true,
            scan_root: ScanRoot::Page,
            skip_auto_wire: false,
            open_immediately: false,
        }
    }
}

impl ModalConfig {
    /// Config for a modal showing `content`, with discovery turned off.
    pub fn new(content: ContentSource) -> Self {
        Self {
            content: Some(content),
            auto_discover: false,
            ..Self::default()
        }
    }

    pub fn with_trigger(mut self, trigger: Element) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_size(mut self, width: &str, height: &str) -> Self {
        self.presentation.width = width.to_string();
        self.presentation.height = height.to_string();
        self
    }

    pub fn with_z_index(mut self, z_index: u32) -> Self {
        self.presentation.z_index = z_index;
        self
    }

    pub fn open_immediately(mut self) -> Self {
        self.open_immediately = true;
        self
    }

    pub fn discover_in(mut self, scan_root: ScanRoot) -> Self {
        self.auto_discover = true;
        self.scan_root = scan_root;
        self
    }
}

// ---------------------------------------------------------------------------
// JS options object
// ---------------------------------------------------------------------------

/// Scalar part of the options object accepted by `new Modal({...})`.
///
/// `trigger`, `target` and `context` may be DOM nodes, which serde cannot
/// represent, so they are read separately by [`DomRefs::from_js`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModalOptions {
    pub z_index: u32,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub modal_width: String,
    pub modal_height: String,
    pub need_find_triggers: bool,
    pub empty_init: bool,
    pub open_now: bool,
    pub display: String,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            z_index: DEFAULT_Z_INDEX,
            kind: None,
            modal_width: DEFAULT_WIDTH.to_string(),
            modal_height: DEFAULT_HEIGHT.to_string(),
            need_find_triggers: true,
            empty_init: false,
            open_now: false,
            display: DEFAULT_DISPLAY.to_string(),
        }
    }
}

/// DOM references pulled off the JS options object.
#[derive(Debug, Clone, Default)]
pub struct DomRefs {
    pub trigger: Option<Element>,
    pub target: JsValue,
    pub context: Option<Element>,
}

impl DomRefs {
    pub fn from_js(options: &JsValue) -> Result<Self> {
        if !options.is_object() {
            return Ok(Self::default());
        }
        let trigger = optional_element(options, "trigger")?;
        let context = optional_element(options, "context")?;
        let target = js_sys::Reflect::get(options, &JsValue::from_str("target"))?;
        Ok(Self { trigger, target, context })
    }
}

fn optional_element(options: &JsValue, key: &str) -> Result<Option<Element>> {
    let value = js_sys::Reflect::get(options, &JsValue::from_str(key))?;
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    value
        .dyn_into::<Element>()
        .map(Some)
        .map_err(|_| ModalError::configuration(format!("`{}` must be a DOM element", key)))
}

impl ModalOptions {
    pub fn from_js(options: &JsValue) -> Result<Self> {
        if options.is_null() || options.is_undefined() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(options.clone())
            .map_err(|e| ModalError::configuration(format!("invalid modal options: {}", e)))
    }

    pub fn into_config(self, refs: DomRefs) -> Result<ModalConfig> {
        let content = match self.kind.as_deref() {
            Some(kind) => {
                let kind: ContentKind = kind.parse()?;
                let target = ContentRef::from_js(&refs.target)?;
                Some(ContentSource::from_kind(kind, target, &self.display)?)
            }
            None if self.empty_init => None,
            None => {
                return Err(ModalError::configuration(
                    "`type` is required unless `emptyInit` is set",
                ))
            }
        };

        Ok(ModalConfig {
            presentation: Presentation {
                z_index: self.z_index,
                width: self.modal_width,
                height: self.modal_height,
            },
            content,
            trigger: refs.trigger,
            auto_discover: self.need_find_triggers,
            scan_root: refs.context.map(ScanRoot::Element).unwrap_or_default(),
            skip_auto_wire: self.empty_init,
            open_immediately: self.open_now,
        })
    }
}

// ---------------------------------------------------------------------------
// Declarative trigger attributes
// ---------------------------------------------------------------------------

/// Companion `data-*` attributes of a `[data-m-modal]` trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerAttributes {
    pub kind: Option<String>,
    pub target: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub z_index: Option<String>,
    pub display: Option<String>,
}

impl TriggerAttributes {
    /// Collect attributes through `lookup` (usually `Element::get_attribute`).
    pub fn read(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            kind: lookup(ATTR_TYPE),
            target: lookup(ATTR_TARGET),
            width: lookup(ATTR_WIDTH),
            height: lookup(ATTR_HEIGHT),
            z_index: lookup(ATTR_Z_INDEX),
            display: lookup(ATTR_DISPLAY),
        }
    }

    pub fn from_element(el: &Element) -> Self {
        Self::read(|name| el.get_attribute(name))
    }

    /// Build the config for a discovered trigger.  Nested instances never
    /// run discovery themselves; the lifecycle re-scans after each open.
    pub fn into_config(self, trigger: Element) -> Result<ModalConfig> {
        let kind: ContentKind = self
            .kind
            .as_deref()
            .ok_or_else(|| ModalError::configuration(format!("trigger is missing `{}`", ATTR_TYPE)))?
            .parse()?;

        let display = non_empty(self.display).unwrap_or_else(|| DEFAULT_DISPLAY.to_string());
        let target = match kind {
            // markup can only reference nodes by selector; resolve it now
            ContentKind::Node => node_by_selector(self.target.as_deref())?,
            _ => ContentRef::from(self.target),
        };
        let content = ContentSource::from_kind(kind, target, &display)?;

        let z_index = match non_empty(self.z_index) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                ModalError::configuration(format!("`{}` must be a non-negative integer, got `{}`", ATTR_Z_INDEX, raw))
            })?,
            None => DEFAULT_Z_INDEX,
        };

        Ok(ModalConfig {
            presentation: Presentation {
                z_index,
                width: non_empty(self.width).unwrap_or_else(|| DEFAULT_WIDTH.to_string()),
                height: non_empty(self.height).unwrap_or_else(|| DEFAULT_HEIGHT.to_string()),
            },
            content: Some(content),
            trigger: Some(trigger),
            auto_discover: false,
            scan_root: ScanRoot::Page,
            skip_auto_wire: false,
            open_immediately: false,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn node_by_selector(selector: Option<&str>) -> Result<ContentRef> {
    let Some(selector) = selector.filter(|s| !s.trim().is_empty()) else {
        return Ok(ContentRef::Missing);
    };
    let document = dom_utils::document()?;
    match document.query_selector(selector) {
        Ok(Some(el)) => Ok(ContentRef::Node(el.into())),
        Ok(None) => Err(ModalError::ContentNotFound { selector: selector.to_string() }),
        Err(_) => Err(ModalError::configuration(format!("invalid selector `{}`", selector))),
    }
}
