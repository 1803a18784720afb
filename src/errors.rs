//! Error type shared by every layer of the widget.
//!
//! Browser APIs hand back `JsValue` errors; everything past the `web-sys`
//! boundary speaks `ModalError`, and exported functions convert back into a
//! `JsValue` so promise rejections carry a readable message.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    /// Remote content could not be fetched or was not text.
    #[error("network error: {0}")]
    Network(String),

    /// A selector content source matched nothing in the document.
    #[error("content not found for selector `{selector}`")]
    ContentNotFound { selector: String },

    /// Options or trigger attributes do not describe a usable modal.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unexpected failure of a DOM call.
    #[error("dom error: {0}")]
    Dom(String),
}

pub type Result<T> = std::result::Result<T, ModalError>;

impl ModalError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Short machine-readable tag, exposed to JS as the `kind` of a rejection.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "NetworkError",
            Self::ContentNotFound { .. } => "ContentNotFoundError",
            Self::Configuration(_) => "ConfigurationError",
            Self::Dom(_) => "DomError",
        }
    }
}

/// Render a thrown JS value for log output.
pub fn describe_js(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

impl From<JsValue> for ModalError {
    fn from(value: JsValue) -> Self {
        Self::Dom(describe_js(&value))
    }
}

impl From<ModalError> for JsValue {
    fn from(err: ModalError) -> Self {
        let js_err = js_sys::Error::new(&err.to_string());
        js_err.set_name(err.kind());
        js_err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_public_error_names() {
        assert_eq!(ModalError::network("boom").kind(), "NetworkError");
        assert_eq!(
            ModalError::ContentNotFound { selector: "#x".into() }.kind(),
            "ContentNotFoundError"
        );
        assert_eq!(ModalError::configuration("bad").kind(), "ConfigurationError");
    }

    #[test]
    fn display_includes_selector() {
        let err = ModalError::ContentNotFound { selector: ".missing".into() };
        assert_eq!(err.to_string(), "content not found for selector `.missing`");
    }
}
