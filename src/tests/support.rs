use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use web_sys::{Document, Element};

use crate::constants::CLOSE_DELAY_MS;
use crate::content::Collaborators;
use crate::dom_utils;
use crate::errors::{ModalError, Result};
use crate::network::{Fetcher, LocalBoxFuture};
use crate::sanitize::DomSanitizer;

/// Canned responses instead of `window.fetch`, with an optional delay to
/// simulate a slow network.
pub struct MockFetcher {
    body: std::result::Result<String, String>,
    delay_ms: u32,
    pub calls: Rc<Cell<u32>>,
}

impl MockFetcher {
    pub fn ok(body: &str) -> Self {
        Self { body: Ok(body.to_string()), delay_ms: 0, calls: Rc::new(Cell::new(0)) }
    }

    pub fn failing(msg: &str) -> Self {
        Self { body: Err(msg.to_string()), delay_ms: 0, calls: Rc::new(Cell::new(0)) }
    }

    pub fn slow(body: &str, delay_ms: u32) -> Self {
        Self { delay_ms, ..Self::ok(body) }
    }
}

impl Fetcher for MockFetcher {
    fn fetch_text<'a>(&'a self, _url: &'a str) -> LocalBoxFuture<'a, Result<String>> {
        self.calls.set(self.calls.get() + 1);
        Box::pin(async move {
            if self.delay_ms > 0 {
                TimeoutFuture::new(self.delay_ms).await;
            }
            self.body.clone().map_err(ModalError::Network)
        })
    }
}

/// Collaborators using `fetcher` and the real DOM sanitizer.  Also returns
/// the fetcher's call counter.
pub fn collaborators(fetcher: MockFetcher) -> (Collaborators, Rc<Cell<u32>>) {
    let calls = fetcher.calls.clone();
    (Collaborators::new(Rc::new(fetcher), Rc::new(DomSanitizer)), calls)
}

pub fn document() -> Document {
    dom_utils::document().unwrap()
}

/// Append `html` inside a fresh `<div>` on the body and return that div.
pub fn fixture(html: &str) -> Element {
    let document = document();
    let host = document.create_element("div").unwrap();
    host.set_inner_html(html);
    dom_utils::body(&document).unwrap().append_child(&host).unwrap();
    host
}

pub async fn wait_for_detach() {
    TimeoutFuture::new(CLOSE_DELAY_MS + 150).await;
}

pub async fn wait_ms(ms: u32) {
    TimeoutFuture::new(ms).await;
}
