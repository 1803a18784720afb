//! Event plumbing: owned DOM listeners and the "opened" notification.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Document, Element, Event, EventTarget};

use crate::constants::OPENED_EVENT;
use crate::errors::Result;
use crate::warn_log;

/// A DOM event listener that is removed again when dropped.
///
/// Callbacks capture `Weak` references to their modal, so a listener never
/// keeps an instance alive and dropping the instance unhooks the DOM.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn attach(target: &EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Self> {
        let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    pub fn event(&self) -> &'static str {
        self.event
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            warn_log!("m-modal: failed to remove `{}` listener: {:?}", self.event, e);
        }
    }
}

/// Dispatch `CustomEvent("m-modal", { detail: { wrapper, id } })` on the
/// document.  Returns `false` if a listener cancelled it.
pub fn dispatch_opened(document: &Document, wrapper: &Element, id: &str) -> Result<bool> {
    let detail = js_sys::Object::new();
    js_sys::Reflect::set(&detail, &JsValue::from_str("wrapper"), wrapper)?;
    js_sys::Reflect::set(&detail, &JsValue::from_str("id"), &JsValue::from_str(id))?;

    let init = CustomEventInit::new();
    init.set_detail(&detail);
    init.set_cancelable(true);
    let event = CustomEvent::new_with_event_init_dict(OPENED_EVENT, &init)?;
    Ok(document.dispatch_event(&event)?)
}
