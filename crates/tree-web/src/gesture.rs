//! Landmarks pushed from JS, polled on a fixed `setInterval` cadence.
//!
//! JS runs the hand model and calls `push_hand_landmarks` whenever an
//! inference finishes. Only the latest inference is kept; a poll that finds
//! nothing new is skipped.

use std::cell::RefCell;
use std::rc::Rc;
use tree_core::gesture::{poll_once, GestureController, HandLandmarks, LandmarkSource};
use tree_core::{LandmarkError, SceneStore};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[derive(Clone, Debug, PartialEq)]
pub enum Inference {
    NoHand,
    Hand(Vec<f32>),
}

/// Single-slot mailbox between the JS model and the poller.
#[derive(Clone, Default)]
pub struct LatestLandmarks {
    slot: Rc<RefCell<Option<Inference>>>,
}

impl LatestLandmarks {
    pub fn push(&self, values: Vec<f32>) {
        let inference = if values.is_empty() {
            Inference::NoHand
        } else {
            Inference::Hand(values)
        };
        *self.slot.borrow_mut() = Some(inference);
    }

    fn take(&self) -> Option<Inference> {
        self.slot.borrow_mut().take()
    }
}

impl LandmarkSource for LatestLandmarks {
    fn estimate(&mut self) -> Result<Option<HandLandmarks>, LandmarkError> {
        match self.take() {
            None => Err(LandmarkError::NotReady),
            Some(Inference::NoHand) => Ok(None),
            Some(Inference::Hand(values)) => HandLandmarks::from_flat(&values).map(Some),
        }
    }
}

/// Owns the interval; dropping it clears the timer.
pub struct IntervalPoller {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl IntervalPoller {
    pub fn start(
        source: LatestLandmarks,
        store: SceneStore,
        interval_ms: u64,
    ) -> Result<Self, JsValue> {
        let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let mut source = source;
        let mut controller = GestureController::new();
        let closure = Closure::wrap(Box::new(move || {
            poll_once(&mut source, &mut controller, &store);
        }) as Box<dyn FnMut()>);
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval_ms.min(i32::MAX as u64) as i32,
        )?;
        log::info!("[gesture] polling every {} ms", interval_ms);
        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for IntervalPoller {
    fn drop(&mut self) {
        if let Some(w) = web::window() {
            w.clear_interval_with_handle(self.handle);
        }
        log::info!("[gesture] polling stopped");
    }
}
