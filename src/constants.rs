// Defaults and DOM names - these are the single source of truth for the
// markup / CSS contract between the widget and the page stylesheet.

pub const PREFIX: &str = "m-modal";

// Default option values
pub const DEFAULT_Z_INDEX: u32 = 100;
pub const DEFAULT_WIDTH: &str = "90%";
pub const DEFAULT_HEIGHT: &str = "auto";
pub const DEFAULT_DISPLAY: &str = "block";

/// Time the overlay stays attached after `close()` so CSS can fade it out.
pub const CLOSE_DELAY_MS: u32 = 500;

// Skeleton classes
pub const OVERLAY_CLASS: &str = "m-modal-overlay";
pub const OVERLAY_ACTIVE_CLASS: &str = "m-modal-overlay--active";
pub const WRAPPER_CLASS: &str = "m-modal-wrapper";
pub const INNER_WRAPPER_CLASS: &str = "m-modal-inner-wrapper";
pub const CLOSE_CLASS: &str = "m-modal-close";
pub const TEXT_CLASS: &str = "m-modal-text";

/// Set on the overlay so page scripts can correlate it with an instance.
pub const INSTANCE_ID_ATTR: &str = "data-m-modal-id";

// Declarative trigger markup
pub const TRIGGER_MARKER_ATTR: &str = "data-m-modal";
pub const TRIGGER_SELECTOR: &str = "[data-m-modal]";
pub const ATTR_TYPE: &str = "data-type";
pub const ATTR_TARGET: &str = "data-target";
pub const ATTR_WIDTH: &str = "data-width";
pub const ATTR_HEIGHT: &str = "data-height";
pub const ATTR_Z_INDEX: &str = "data-z-index";
pub const ATTR_DISPLAY: &str = "data-display";

// CSS custom properties written on :root
pub const VAR_Z_INDEX: &str = "--m-modal-z-index";
pub const VAR_WIDTH: &str = "--m-modal-width";
pub const VAR_HEIGHT: &str = "--m-modal-height";

/// Name of the `CustomEvent` dispatched on the document after an open.
pub const OPENED_EVENT: &str = "m-modal";
