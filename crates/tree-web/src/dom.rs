use tree_core::photos::uploaded_ref;
use tree_core::SceneStore;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Keep the canvas backing store at CSS size times device pixel ratio.
pub fn wire_canvas_resize(window: &web::Window, canvas: &web::HtmlCanvasElement) {
    sync_canvas_backing_size(canvas);
    let canvas = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        sync_canvas_backing_size(&canvas);
    }) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Every file picked in `#photo-input` becomes an uploaded photo.
pub fn wire_photo_input(document: &web::Document, input_id: &str, store: SceneStore) {
    let Some(input) = document
        .get_element_by_id(input_id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    else {
        log::warn!("[photos] #{} not found; uploads disabled", input_id);
        return;
    };
    let target = input.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        let Some(files) = target.files() else {
            return;
        };
        for i in 0..files.length() {
            let Some(file) = files.get(i) else {
                continue;
            };
            match web::Url::create_object_url_with_blob(&file) {
                Ok(url) => store.add_photo(uploaded_ref(&url)),
                Err(e) => log::warn!("[photos] could not read {}: {:?}", file.name(), e),
            }
        }
        // Allow picking the same file again.
        target.set_value("");
    }) as Box<dyn FnMut(web::Event)>);
    let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}
