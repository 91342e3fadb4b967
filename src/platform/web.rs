//! Browser `setInterval` scheduler

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::IntervalScheduler;

/// Runs one callback on `window.setInterval`
pub struct BrowserInterval {
    callback: Closure<dyn FnMut()>,
}

impl BrowserInterval {
    pub fn new(callback: impl FnMut() + 'static) -> Self {
        Self {
            callback: Closure::<dyn FnMut()>::new(callback),
        }
    }
}

impl IntervalScheduler for BrowserInterval {
    type Handle = i32;

    fn start(&mut self, interval_ms: u32) -> Option<i32> {
        let window = web_sys::window()?;
        window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                interval_ms as i32,
            )
            .ok()
    }

    fn cancel(&mut self, handle: i32) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(handle);
        }
    }
}
