//! Browser glue (wasm32): `requestAnimationFrame` as the frame source, and window
//! keyboard listeners feeding [`Input`](super::Input)

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::{KeyCode, KeyEvent};
use crate::game_loop::FrameScheduler;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// [`FrameScheduler`] over `requestAnimationFrame`. The installed callback is reused for
/// every request and receives the frame timestamp in milliseconds.
pub struct AnimationFrameScheduler {
    window: web_sys::Window,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl AnimationFrameScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_callback(&self, callback: impl FnMut(f64) + 'static) {
        *self.callback.borrow_mut() = Some(Closure::new(callback));
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    type Handle = Option<i32>;

    fn request_frame(&mut self) -> Option<i32> {
        let slot = self.callback.borrow();
        let Some(callback) = slot.as_ref() else {
            log::warn!("frame requested before a callback was installed");
            return None;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: Option<i32>) {
        if let Some(id) = handle {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }
}

/// Forward `keydown`/`keyup` for game keys, and a focus loss, to `handler`
pub fn bind_keyboard(window: &web_sys::Window, handler: impl Fn(KeyEvent) + 'static) {
    let handler = Rc::new(handler);

    for (name, down) in [("keydown", true), ("keyup", false)] {
        let handler = handler.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let Some(key) = KeyCode::from_code(&event.code()) else {
                return;
            };
            // Arrows and space would scroll the page
            event.prevent_default();
            (*handler)(if down {
                KeyEvent::Down(key)
            } else {
                KeyEvent::Up(key)
            });
        });
        let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
        if let Err(e) = window.add_event_listener_with_callback(name, callback) {
            log::warn!("failed to listen for {}: {:?}", name, e);
        }
        closure.forget();
    }

    // Keys released while unfocused never report keyup
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
        (*handler)(KeyEvent::FocusLost);
    });
    let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
    if let Err(e) = window.add_event_listener_with_callback("blur", callback) {
        log::warn!("failed to listen for blur: {:?}", e);
    }
    closure.forget();
}
