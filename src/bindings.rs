//! JavaScript surface.
//!
//! ```js
//! import init, { Modal, discover } from "m-modal";
//! await init();
//! discover();                                   // wire every [data-m-modal]
//! const m = new Modal({ type: "text", target: "Saved!", openNow: true });
//! document.addEventListener("m-modal", e => console.log(e.detail.wrapper));
//! ```

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::Element;

use crate::config::{DomRefs, ModalOptions};
use crate::discovery;
use crate::modal::Modal;

#[wasm_bindgen]
impl Modal {
    /// `new Modal({ zIndex, type, target, trigger, modalWidth, modalHeight,
    /// needFindTriggers, context, emptyInit, openNow, display })`
    #[wasm_bindgen(constructor)]
    pub fn js_new(options: JsValue) -> Result<Modal, JsValue> {
        let refs = DomRefs::from_js(&options)?;
        let config = ModalOptions::from_js(&options)?.into_config(refs)?;
        Ok(Modal::new(config)?)
    }

    /// Discovery-only instance over the whole document.
    #[wasm_bindgen(js_name = init)]
    pub fn js_init() -> Result<Modal, JsValue> {
        let options = ModalOptions {
            empty_init: true,
            ..ModalOptions::default()
        };
        let config = options.into_config(DomRefs::default())?;
        Ok(Modal::new(config)?)
    }

    #[wasm_bindgen(js_name = open)]
    pub fn js_open(&self) -> js_sys::Promise {
        let modal = self.clone();
        future_to_promise(async move {
            modal.open().await?;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = close)]
    pub fn js_close(&self) {
        self.close();
    }

    #[wasm_bindgen(js_name = destroy)]
    pub fn js_destroy(&self) {
        self.destroy();
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn js_is_open(&self) -> bool {
        self.is_open()
    }

    #[wasm_bindgen(js_name = contentInserted)]
    pub fn js_content_inserted(&self) -> bool {
        self.content_inserted()
    }

    #[wasm_bindgen(getter, js_name = wrapper)]
    pub fn js_wrapper(&self) -> Element {
        self.wrapper()
    }

    #[wasm_bindgen(getter, js_name = id)]
    pub fn js_id(&self) -> String {
        self.id().to_string()
    }
}

/// Wire every `[data-m-modal]` element on the page.  Returns how many
/// modals were created.
#[wasm_bindgen(js_name = discover)]
pub fn js_discover() -> Result<u32, JsValue> {
    Ok(discovery::init()? as u32)
}

/// Destroy every modal created by discovery.
#[wasm_bindgen(js_name = releaseDiscovered)]
pub fn js_release_discovered() {
    crate::page::release_discovered();
}
