//! Browser tests for the modal lifecycle (run with `wasm-pack test --headless --chrome`).

mod support;

mod content_tests;
mod discovery_tests;
