pub use futures::future::LocalBoxFuture;
use futures::FutureExt;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::errors::{describe_js, ModalError, Result};

/// "Fetch text by URL".  Implementations fail with [`ModalError::Network`].
pub trait Fetcher {
    fn fetch_text<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String>>;
}

/// `window.fetch` backed implementation.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    mode: RequestMode,
}

impl Default for BrowserFetcher {
    fn default() -> Self {
        Self { mode: RequestMode::Cors }
    }
}

impl BrowserFetcher {
    pub fn with_mode(mode: RequestMode) -> Self {
        Self { mode }
    }

    async fn get(&self, url: &str) -> Result<String> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(self.mode);

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|e| ModalError::network(format!("invalid request for {}: {}", url, describe_js(&e))))?;

        let window = web_sys::window().ok_or_else(|| ModalError::Dom("no global window exists".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ModalError::network(format!("GET {} failed: {}", url, describe_js(&e))))?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| ModalError::network(format!("GET {} did not produce a Response", url)))?;

        if !resp.ok() {
            return Err(ModalError::network(format!(
                "GET {} failed: {} {}",
                url,
                resp.status(),
                resp.status_text()
            )));
        }

        let text_promise = resp
            .text()
            .map_err(|e| ModalError::network(format!("GET {}: unreadable body: {}", url, describe_js(&e))))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| ModalError::network(format!("GET {}: unreadable body: {}", url, describe_js(&e))))?;
        text.as_string()
            .ok_or_else(|| ModalError::network(format!("GET {}: response body is not text", url)))
    }
}

impl Fetcher for BrowserFetcher {
    fn fetch_text<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String>> {
        self.get(url).boxed_local()
    }
}
