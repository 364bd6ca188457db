#![cfg(target_arch = "wasm32")]
mod dom;
mod events;
mod frame;
mod gesture;

use std::cell::RefCell;
use std::rc::Rc;
use tree_core::constants::GESTURE_POLL_INTERVAL_MS;
use tree_core::{FrameClock, SceneConfig, SceneStore, TreeScene};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

const CANVAS_ID: &str = "app-canvas";
const PHOTO_INPUT_ID: &str = "photo-input";

thread_local! {
    static LATEST_LANDMARKS: gesture::LatestLandmarks = gesture::LatestLandmarks::default();
}

/// Hand the latest inference to the gesture poller: 63 floats (21 points,
/// pixel x/y/z in a 640x480 frame), or an empty array when no hand is visible.
#[wasm_bindgen]
pub fn push_hand_landmarks(values: &js_sys::Float32Array) {
    let values = values.to_vec();
    LATEST_LANDMARKS.with(|latest| latest.push(values));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tree-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::wire_canvas_resize(&window, &canvas);

    let store = SceneStore::new();
    events::wire_pointer(&canvas, &store);
    events::wire_keyboard(&window, &store);
    dom::wire_photo_input(&document, PHOTO_INPUT_ID, store.clone());

    let mut scene = TreeScene::new(SceneConfig::default(), store.clone())?;
    scene.set_viewport(canvas.width(), canvas.height());
    let gpu = frame::GpuState::new(&canvas, &scene).await?;

    let latest = LATEST_LANDMARKS.with(|latest| latest.clone());
    let poller = match gesture::IntervalPoller::start(latest, store, GESTURE_POLL_INTERVAL_MS) {
        Ok(p) => Some(p),
        Err(e) => {
            log::warn!("[gesture] polling unavailable: {:?}", e);
            None
        }
    };

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        canvas,
        gpu,
        scene,
        clock: FrameClock::new(),
        _poller: poller,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
