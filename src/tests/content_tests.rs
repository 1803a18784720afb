use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlImageElement};

use super::support::{collaborators, document, fixture, MockFetcher};
use crate::config::ContentSource;
use crate::content::Collaborators;
use crate::errors::ModalError;
use crate::sanitize::{DomSanitizer, Sanitizer};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn text_is_inserted_literally() {
    let source = ContentSource::Text("<b>hi</b>".into());
    let node = source.resolve(&document(), &Collaborators::default()).await.unwrap();
    let p: Element = node.dyn_into().unwrap();

    assert_eq!(p.tag_name(), "P");
    assert_eq!(p.class_name(), "m-modal-text");
    assert_eq!(p.text_content().as_deref(), Some("<b>hi</b>"));
    assert_eq!(p.child_element_count(), 0, "markup must not be parsed");
}

#[wasm_bindgen_test]
async fn selector_clones_and_applies_display() {
    let host = fixture(r#"<section id="tpl-clone" style="display:none"><em>inside</em></section>"#);
    let source = ContentSource::Selector { selector: "#tpl-clone".into(), display: "flex".into() };

    let node = source.resolve(&document(), &Collaborators::default()).await.unwrap();
    let copy: web_sys::HtmlElement = node.dyn_into().unwrap();

    assert_eq!(copy.style().get_property_value("display").unwrap(), "flex");
    assert_eq!(copy.query_selector("em").unwrap().unwrap().text_content().as_deref(), Some("inside"));
    // the original stays where it was, still hidden
    let original: web_sys::HtmlElement = host.query_selector("#tpl-clone").unwrap().unwrap().dyn_into().unwrap();
    assert_eq!(original.style().get_property_value("display").unwrap(), "none");
    assert!(!copy.is_connected());

    host.remove();
}

#[wasm_bindgen_test]
async fn selector_without_match_is_content_not_found() {
    let source = ContentSource::Selector { selector: "#nothing-matches-this".into(), display: "block".into() };
    let err = source.resolve(&document(), &Collaborators::default()).await.unwrap_err();
    assert_eq!(err, ModalError::ContentNotFound { selector: "#nothing-matches-this".into() });
}

#[wasm_bindgen_test]
async fn invalid_selector_is_configuration_error() {
    let source = ContentSource::Selector { selector: "[[[".into(), display: "block".into() };
    let err = source.resolve(&document(), &Collaborators::default()).await.unwrap_err();
    assert!(matches!(err, ModalError::Configuration(_)), "got {:?}", err);
}

#[wasm_bindgen_test]
async fn image_points_at_source_without_waiting() {
    let source = ContentSource::Image { src: "/does-not-exist.png".into() };
    let node = source.resolve(&document(), &Collaborators::default()).await.unwrap();
    let img: HtmlImageElement = node.dyn_into().unwrap();

    assert!(img.src().ends_with("/does-not-exist.png"));
    assert_eq!(img.style().get_property_value("max-width").unwrap(), "100%");
    assert_eq!(img.style().get_property_value("display").unwrap(), "block");
}

#[wasm_bindgen_test]
async fn remote_content_is_sanitized() {
    let (collab, calls) = collaborators(MockFetcher::ok("<script>x</script><p>ok</p>"));
    let source = ContentSource::Remote { url: "/fragment.html".into() };

    let node = source.resolve(&document(), &collab).await.unwrap();
    let holder = document().create_element("div").unwrap();
    holder.append_child(&node).unwrap();

    assert_eq!(calls.get(), 1);
    assert!(holder.query_selector("script").unwrap().is_none());
    let p = holder.query_selector("p").unwrap().unwrap();
    assert_eq!(p.text_content().as_deref(), Some("ok"));
}

#[wasm_bindgen_test]
async fn remote_failure_is_network_error() {
    let (collab, _) = collaborators(MockFetcher::failing("offline"));
    let source = ContentSource::Remote { url: "/fragment.html".into() };
    let err = source.resolve(&document(), &collab).await.unwrap_err();
    assert_eq!(err, ModalError::Network("offline".into()));
}

#[wasm_bindgen_test]
fn sanitizer_strips_handlers_and_script_urls() {
    let clean = DomSanitizer
        .sanitize(r#"<a href="javascript:alert(1)" onclick="x()" class="k">link</a><img src="/a.png" onerror="x()"><iframe src="/x"></iframe>"#)
        .unwrap();

    let holder = document().create_element("div").unwrap();
    holder.set_inner_html(&clean);
    let a = holder.query_selector("a").unwrap().unwrap();
    assert!(a.get_attribute("href").is_none());
    assert!(a.get_attribute("onclick").is_none());
    assert_eq!(a.get_attribute("class").as_deref(), Some("k"));
    let img = holder.query_selector("img").unwrap().unwrap();
    assert_eq!(img.get_attribute("src").as_deref(), Some("/a.png"));
    assert!(img.get_attribute("onerror").is_none());
    assert!(holder.query_selector("iframe").unwrap().is_none());
}

#[wasm_bindgen_test]
async fn node_source_is_the_node_itself() {
    let host = fixture(r#"<div id="movable-src">move me</div>"#);
    let target = host.query_selector("#movable-src").unwrap().unwrap();
    let source = ContentSource::Node(target.clone().into());

    let node = source.resolve(&document(), &Collaborators::default()).await.unwrap();
    let resolved: Element = node.dyn_into().unwrap();
    assert_eq!(resolved, target);

    host.remove();
}

#[wasm_bindgen_test]
fn sanitizer_drops_svg_animation_and_style_blocks() {
    let clean = DomSanitizer
        .sanitize(
            r#"<svg><a><animate attributeName=href values=javascript:alert(1) /><text>x</text></a></svg><style>p{background:url(javascript:x)}</style><custom-card title="t"><b>kept</b></custom-card>"#,
        )
        .unwrap();

    let lowered = clean.to_ascii_lowercase();
    assert!(!lowered.contains("animate"), "got {}", clean);
    assert!(!lowered.contains("javascript:"), "got {}", clean);
    assert!(!lowered.contains("<svg"));
    assert!(!lowered.contains("<style"));

    // unknown elements give way to their children
    let holder = document().create_element("div").unwrap();
    holder.set_inner_html(&clean);
    assert!(holder.query_selector("custom-card").unwrap().is_none());
    assert_eq!(holder.query_selector("b").unwrap().unwrap().text_content().as_deref(), Some("kept"));
}

#[wasm_bindgen_test]
fn sanitizer_keeps_nested_trigger_markup() {
    let clean = DomSanitizer
        .sanitize(r#"<button id="n" type="button" data-m-modal data-type="text" data-target="hi" aria-label="more">m</button>"#)
        .unwrap();

    let holder = document().create_element("div").unwrap();
    holder.set_inner_html(&clean);
    let button = holder.query_selector("#n").unwrap().unwrap();
    assert!(button.has_attribute("data-m-modal"));
    assert_eq!(button.get_attribute("data-type").as_deref(), Some("text"));
    assert_eq!(button.get_attribute("aria-label").as_deref(), Some("more"));
}
