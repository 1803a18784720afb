//! Declarative trigger discovery.
//!
//! ```html
//! <button data-m-modal data-type="selector" data-target="#terms"
//!         data-width="40rem" data-display="flex">Terms</button>
//! ```
//!
//! Every `[data-m-modal]` element under the scan root becomes the trigger of
//! a new modal.  The marker is stripped as soon as the element is read, so a
//! second scan of the same subtree finds nothing.

use web_sys::Element;

use crate::config::{ScanRoot, TriggerAttributes};
use crate::constants::{TRIGGER_MARKER_ATTR, TRIGGER_SELECTOR};
use crate::content::Collaborators;
use crate::errors::Result;
use crate::modal::Modal;
use crate::{dom_utils, page, warn_log};

/// Instantiate one modal per marked trigger under `scope`.  The instances are
/// owned by the page coordinator; the returned handles are extra references.
///
/// A trigger with unusable attributes is skipped with a warning - its marker
/// is still removed so it is not reported again.
pub fn discover_triggers(scope: &ScanRoot, collaborators: &Collaborators) -> Result<Vec<Modal>> {
    let triggers = dom_utils::elements_of(&scope.query_all(TRIGGER_SELECTOR)?);
    if triggers.is_empty() {
        return Ok(Vec::new());
    }

    let mut created = Vec::with_capacity(triggers.len());
    for trigger in triggers {
        // an earlier trigger's setup may already have claimed this one
        if !trigger.has_attribute(TRIGGER_MARKER_ATTR) {
            continue;
        }
        let attrs = TriggerAttributes::from_element(&trigger);
        trigger.remove_attribute(TRIGGER_MARKER_ATTR)?;

        match instantiate(trigger, attrs, collaborators) {
            Ok(modal) => {
                page::adopt(modal.clone());
                created.push(modal);
            }
            Err(err) => warn_log!("m-modal: skipping trigger: {}", err),
        }
    }
    Ok(created)
}

fn instantiate(trigger: Element, attrs: TriggerAttributes, collaborators: &Collaborators) -> Result<Modal> {
    let config = attrs.into_config(trigger)?;
    Modal::with_collaborators(config, collaborators.clone())
}

/// Scan the whole document with the default collaborators.
pub fn init() -> Result<usize> {
    let created = discover_triggers(&ScanRoot::Page, &Collaborators::default())?;
    Ok(created.len())
}
