//! Network collaborator used by the remote content strategy.

pub mod fetcher;

pub use fetcher::{BrowserFetcher, Fetcher, LocalBoxFuture};
