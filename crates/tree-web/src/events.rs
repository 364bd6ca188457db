use glam::Vec2;
use tree_core::constants::MOUSE_CAMERA_GAIN;
use tree_core::{Mode, SceneStore};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Client coordinates to `[-1, 1]` over the canvas rect, y up.
#[inline]
pub fn pointer_ndc(canvas: &web::HtmlCanvasElement, client_x: f64, client_y: f64) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let w = rect.width().max(1.0);
    let h = rect.height().max(1.0);
    let x = ((client_x - rect.left()) / w) * 2.0 - 1.0;
    let y = -((client_y - rect.top()) / h) * 2.0 + 1.0;
    Vec2::new(x as f32, y as f32)
}

fn listen<E: FromWasmAbi + 'static>(
    target: &web::EventTarget,
    kind: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    let callback = closure.as_ref().unchecked_ref();
    if let Err(e) = target.add_event_listener_with_callback(kind, callback) {
        log::warn!("[events] failed to listen for {}: {:?}", kind, e);
    }
    closure.forget();
}

/// Hold to scatter, release to assemble, move to steer.
pub fn wire_pointer(canvas: &web::HtmlCanvasElement, store: &SceneStore) {
    let target: &web::EventTarget = canvas.as_ref();

    {
        let canvas = canvas.clone();
        let store = store.clone();
        listen(target, "pointermove", move |ev: web::PointerEvent| {
            let p = pointer_ndc(&canvas, ev.client_x() as f64, ev.client_y() as f64);
            store.set_pointer(p.x, p.y);
            let cam = p * MOUSE_CAMERA_GAIN;
            store.set_camera_target(cam.x, cam.y);
        });
    }
    {
        let canvas = canvas.clone();
        let store = store.clone();
        listen(target, "pointerdown", move |ev: web::PointerEvent| {
            if ev.button() != 0 {
                return;
            }
            let _ = canvas.set_pointer_capture(ev.pointer_id());
            store.set_mode(Mode::Chaos);
        });
    }
    for kind in ["pointerup", "pointercancel"] {
        let store = store.clone();
        listen(target, kind, move |_ev: web::PointerEvent| {
            store.set_mode(Mode::Formed);
        });
    }
}

/// Space toggles the formation.
pub fn wire_keyboard(window: &web::Window, store: &SceneStore) {
    let store = store.clone();
    listen(window.as_ref(), "keydown", move |ev: web::KeyboardEvent| {
        if ev.repeat() {
            return;
        }
        if ev.key() == " " {
            ev.prevent_default();
            store.set_mode(store.mode().toggled());
        }
    });
}
