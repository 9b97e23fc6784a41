//! Outside-click detection for popups.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Document, Element, MouseEvent, Node};

/// Name of the event dispatched on the watched element.
const CLICK_OUTSIDE_EVENT: &str = "clickOutside";

/// Watches document clicks in the capture phase and dispatches a
/// `clickOutside` event (with the original click as `detail`) on `node`
/// whenever a click lands outside it and was not already default-prevented.
///
/// The listener is attached on construction and removed when the value is
/// dropped (`free()` from JS).
#[wasm_bindgen]
pub struct ClickOutside {
    document: Document,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

#[wasm_bindgen]
impl ClickOutside {
    /// # Errors
    /// Returns an error if there is no document or the listener cannot be
    /// attached.
    #[wasm_bindgen(constructor)]
    pub fn new(node: Element) -> Result<ClickOutside, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let target_node = node.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            if event.default_prevented() {
                return;
            }
            let inside = event
                .target()
                .and_then(|t| t.dyn_into::<Node>().ok())
                .is_some_and(|clicked| target_node.contains(Some(&clicked)));
            if inside {
                return;
            }
            let init = CustomEventInit::new();
            init.set_detail(&event);
            if let Ok(outside) =
                CustomEvent::new_with_event_init_dict(CLICK_OUTSIDE_EVENT, &init)
            {
                let _ = target_node.dispatch_event(&outside);
            }
        }) as Box<dyn FnMut(MouseEvent)>);

        document.add_event_listener_with_callback_and_bool(
            "click",
            closure.as_ref().unchecked_ref(),
            true,
        )?;

        Ok(ClickOutside { document, closure })
    }
}

impl Drop for ClickOutside {
    fn drop(&mut self) {
        let _ = self.document.remove_event_listener_with_callback_and_bool(
            "click",
            self.closure.as_ref().unchecked_ref(),
            true,
        );
    }
}
