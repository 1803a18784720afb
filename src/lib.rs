//! m-modal – declarative modal dialogs for the browser.
//!
//! A [`Modal`] owns a prebuilt overlay skeleton and fills it from one of five
//! content sources the first time it opens.  Triggers can be wired in code or
//! discovered from `data-m-modal` markup; page-wide effects (scroll lock,
//! Escape handling, CSS variables) are arbitrated by the [`page`] coordinator.

use wasm_bindgen::prelude::*;

mod macros;

pub mod bindings;
pub mod config;
pub mod constants;
pub mod content;
pub mod discovery;
pub mod dom_utils;
pub mod errors;
pub mod events;
pub mod modal;
pub mod network;
pub mod overlay;
pub mod page;
pub mod presentation;
pub mod sanitize;

#[cfg(test)]
mod tests;

pub use config::{ContentKind, ContentRef, ContentSource, ModalConfig, Presentation, ScanRoot};
pub use content::Collaborators;
pub use discovery::discover_triggers;
pub use errors::ModalError;
pub use modal::{Modal, ModalId, Phase};
pub use network::{BrowserFetcher, Fetcher};
pub use sanitize::{DomSanitizer, Sanitizer};

// Runs once when the wasm module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();
    Ok(())
}
