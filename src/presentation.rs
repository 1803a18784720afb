//! Page-wide presentation state on `<html>`: the CSS custom properties the
//! stylesheet reads for size / stacking, and the scroll lock.
//!
//! Only the page coordinator calls these; instances never touch `:root`
//! directly.

use web_sys::Document;

use crate::config::Presentation;
use crate::constants::{VAR_HEIGHT, VAR_WIDTH, VAR_Z_INDEX};
use crate::dom_utils;
use crate::errors::Result;

/// Write all three custom properties.  Each is set individually so other
/// inline styles on `<html>` survive.
pub fn apply(document: &Document, presentation: &Presentation) -> Result<()> {
    let style = dom_utils::root_element(document)?.style();
    style.set_property(VAR_Z_INDEX, &presentation.z_index.to_string())?;
    style.set_property(VAR_WIDTH, &presentation.width)?;
    style.set_property(VAR_HEIGHT, &presentation.height)?;
    Ok(())
}

pub fn block_scroll(document: &Document) -> Result<()> {
    dom_utils::root_element(document)?
        .style()
        .set_property("overflow", "hidden")?;
    Ok(())
}

pub fn unblock_scroll(document: &Document) -> Result<()> {
    dom_utils::root_element(document)?
        .style()
        .remove_property("overflow")?;
    Ok(())
}

pub fn is_scroll_blocked(document: &Document) -> bool {
    dom_utils::root_element(document)
        .ok()
        .and_then(|root| root.style().get_property_value("overflow").ok())
        .map(|v| v == "hidden")
        .unwrap_or(false)
}
