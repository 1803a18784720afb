use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

use super::support::{collaborators, fixture, wait_ms, MockFetcher};
use crate::config::{ContentSource, ModalConfig, ScanRoot};
use crate::constants::TRIGGER_MARKER_ATTR;
use crate::content::Collaborators;
use crate::discovery::discover_triggers;
use crate::modal::Modal;
use crate::page;

wasm_bindgen_test_configure!(run_in_browser);

fn scan(host: &web_sys::Element) -> Vec<Modal> {
    discover_triggers(&ScanRoot::Element(host.clone()), &Collaborators::default()).unwrap()
}

#[wasm_bindgen_test]
fn second_scan_creates_nothing() {
    let host = fixture(
        r#"<a data-m-modal data-type="text" data-target="one">1</a>
           <a data-m-modal data-type="image" data-target="/two.png">2</a>"#,
    );

    let first = scan(&host);
    assert_eq!(first.len(), 2);
    let links = host.query_selector_all("a").unwrap();
    for i in 0..links.length() {
        let el: web_sys::Element = links.item(i).unwrap().dyn_into().unwrap();
        assert!(!el.has_attribute(TRIGGER_MARKER_ATTR), "marker stripped");
        assert!(el.get_attribute("data-type").is_some(), "companions kept");
    }

    assert!(scan(&host).is_empty());

    page::release_discovered();
    host.remove();
}

#[wasm_bindgen_test]
fn data_attributes_map_into_config() {
    let host = fixture(
        r##"<button data-m-modal data-type="selector" data-target="#terms"
                    data-width="40rem" data-height="60vh" data-z-index="900" data-display="flex">t</button>"##,
    );

    let found = scan(&host);
    assert_eq!(found.len(), 1);
    let config = found[0].config();
    assert_eq!(config.presentation.width, "40rem");
    assert_eq!(config.presentation.height, "60vh");
    assert_eq!(config.presentation.z_index, 900);
    assert_eq!(
        config.content,
        Some(ContentSource::Selector { selector: "#terms".into(), display: "flex".into() })
    );
    assert!(!config.auto_discover);
    assert!(config.trigger.is_some());

    page::release_discovered();
    host.remove();
}

#[wasm_bindgen_test]
fn invalid_triggers_are_skipped_but_unmarked() {
    let host = fixture(
        r#"<span id="bad-kind" data-m-modal data-type="video" data-target="x">v</span>
           <span id="bad-z" data-m-modal data-type="text" data-target="x" data-z-index="-3">z</span>
           <span id="no-target" data-m-modal data-type="remote">r</span>
           <span id="fine" data-m-modal data-type="text" data-target="ok">ok</span>"#,
    );

    let found = scan(&host);
    assert_eq!(found.len(), 1, "only the valid trigger yields a modal");
    assert_eq!(found[0].config().content, Some(ContentSource::Text("ok".into())));
    assert!(host.query_selector("[data-m-modal]").unwrap().is_none());

    page::release_discovered();
    host.remove();
}

#[wasm_bindgen_test]
fn discovered_modals_are_owned_by_the_page() {
    let host = fixture(r#"<i data-m-modal data-type="text" data-target="kept">k</i>"#);
    let before = page::discovered_count();

    // drop the returned handles straight away
    assert_eq!(scan(&host).len(), 1);
    assert_eq!(page::discovered_count(), before + 1);

    page::release_discovered();
    assert_eq!(page::discovered_count(), 0);
    host.remove();
}

#[wasm_bindgen_test]
async fn clicking_a_discovered_trigger_opens_it() {
    let host = fixture(r#"<button id="declared" data-m-modal data-type="text" data-target="from markup">go</button>"#);
    let trigger: HtmlElement = host.query_selector("#declared").unwrap().unwrap().dyn_into().unwrap();

    let found = scan(&host);
    let modal = found[0].clone();
    drop(found);

    trigger.click();
    wait_ms(50).await;

    assert!(modal.is_open());
    assert_eq!(modal.inner_container().text_content().as_deref(), Some("from markup"));

    page::release_discovered();
    assert!(!modal.is_attached());
    host.remove();
}

#[wasm_bindgen_test]
async fn node_kind_trigger_resolves_target_by_selector() {
    let host = fixture(
        r##"<div id="node-home"><aside id="aside-node">moved</aside></div>
            <b data-m-modal data-type="node" data-target="#aside-node">n</b>"##,
    );

    let found = scan(&host);
    assert_eq!(found.len(), 1);
    found[0].open().await.unwrap();

    let home = host.query_selector("#node-home").unwrap().unwrap();
    assert_eq!(home.child_element_count(), 0);
    assert!(found[0].inner_container().query_selector("#aside-node").unwrap().is_some());

    page::release_discovered();
    host.remove();
}

#[wasm_bindgen_test]
fn constructor_scans_only_its_scan_root() {
    let inside = fixture(r#"<em data-m-modal data-type="text" data-target="in">in</em>"#);
    let outside = fixture(r#"<em data-m-modal data-type="text" data-target="out">out</em>"#);

    let config = ModalConfig::new(ContentSource::Text("host".into())).discover_in(ScanRoot::Element(inside.clone()));
    let (collab, _) = collaborators(MockFetcher::ok(""));
    let modal = Modal::with_collaborators(config, collab).unwrap();

    assert!(inside.query_selector("[data-m-modal]").unwrap().is_none());
    assert!(outside.query_selector("[data-m-modal]").unwrap().is_some());

    modal.destroy();
    page::release_discovered();
    inside.remove();
    outside.remove();
}

#[wasm_bindgen_test]
fn document_scan_root_reaches_the_whole_page() {
    let host = fixture(r#"<u id="doc-wide" data-m-modal data-type="text" data-target="page">p</u>"#);

    let found = discover_triggers(&ScanRoot::Document(super::support::document()), &Collaborators::default()).unwrap();
    assert!(found.iter().any(|modal| modal.config().content == Some(ContentSource::Text("page".into()))));
    assert!(host.query_selector("#doc-wide[data-m-modal]").unwrap().is_none());

    page::release_discovered();
    host.remove();
}
