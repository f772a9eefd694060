//! Browser collaborators
//!
//! Canvas-2D drawing, `requestAnimationFrame` scheduling, `localStorage`
//! best scores, DOM input events, and the Telegram WebApp bridge. Every
//! acquisition is fallible; callers degrade instead of crashing when the
//! browser withholds a piece.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{
    FrameCallback, FrameHandle, HostBridge, InputCallback, InputSource, InputSubscription,
    Scheduler, ScoreStore, Surface, SurfaceProvider, Theme,
};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// Canvas-2D drawing surface at the logical playfield resolution. The host
/// page stretches the canvas element; drawing coordinates never change.
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    /// Binds the canvas with the given element id. `None` covers a missing
    /// element as well as a withheld 2d context.
    pub fn acquire(canvas_id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.get_element_by_id(canvas_id)?.dyn_into().ok()?;
        canvas.set_width(PLAYFIELD_WIDTH as u32);
        canvas.set_height(PLAYFIELD_HEIGHT as u32);
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            context,
            width: f64::from(PLAYFIELD_WIDTH),
            height: f64::from(PLAYFIELD_HEIGHT),
        })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.context.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str) {
        self.context.set_fill_style_str(color);
        self.context
            .fill_rect(f64::from(x), f64::from(y), f64::from(width), f64::from(height));
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.begin_path();
        let _ = self.context.arc(
            f64::from(cx),
            f64::from(cy),
            f64::from(radius),
            0.0,
            std::f64::consts::TAU,
        );
        self.context.fill();
    }
}

/// Hands out canvases by the `{game_id}-canvas` element convention
pub struct CanvasSurfaces;

impl SurfaceProvider for CanvasSurfaces {
    fn acquire(&self, game_id: &str) -> Option<Box<dyn Surface>> {
        let surface = CanvasSurface::acquire(&format!("{game_id}-canvas"))?;
        Some(Box::new(surface))
    }
}

struct RafInner {
    next_handle: u64,
    queue: Vec<(FrameHandle, FrameCallback)>,
    raf_id: Option<i32>,
    on_frame: Option<Closure<dyn FnMut(f64)>>,
}

/// `requestAnimationFrame` scheduler. One persistent browser callback
/// drains whatever is queued for the next frame; an empty queue keeps no
/// animation frame outstanding.
pub struct RafScheduler {
    inner: Rc<RefCell<RafInner>>,
}

impl RafScheduler {
    pub fn new() -> Self {
        let inner = Rc::new(RefCell::new(RafInner {
            next_handle: 1,
            queue: Vec::new(),
            raf_id: None,
            on_frame: None,
        }));

        let frame_inner = Rc::clone(&inner);
        let on_frame = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            let due = {
                let mut inner = frame_inner.borrow_mut();
                inner.raf_id = None;
                std::mem::take(&mut inner.queue)
            };
            for (_, callback) in due {
                callback(timestamp);
            }
        });
        inner.borrow_mut().on_frame = Some(on_frame);

        Self { inner }
    }

    fn request_if_needed(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.raf_id.is_some() || inner.queue.is_empty() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(on_frame) = &inner.on_frame else {
            return;
        };
        match window.request_animation_frame(on_frame.as_ref().unchecked_ref()) {
            Ok(raf_id) => inner.raf_id = Some(raf_id),
            Err(_) => log::error!("requestAnimationFrame unavailable"),
        }
    }
}

impl Default for RafScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for RafScheduler {
    fn schedule_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = {
            let mut inner = self.inner.borrow_mut();
            let handle = FrameHandle(inner.next_handle);
            inner.next_handle += 1;
            inner.queue.push((handle, callback));
            handle
        };
        self.request_if_needed();
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let mut inner = self.inner.borrow_mut();
        inner.queue.retain(|(pending, _)| *pending != handle);
        if inner.queue.is_empty() {
            if let Some(raf_id) = inner.raf_id.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(raf_id);
                }
            }
        }
    }

    fn now(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Primary presses from the DOM: pointer-down on the playfield element and
/// Space keydowns on the window. The DOM hooks live for the page's
/// lifetime; unsubscribing detaches a game from them, not them from the DOM.
pub struct DomInputSource {
    subscribers: Rc<RefCell<HashMap<u64, InputCallback>>>,
    next_id: Cell<u64>,
}

impl DomInputSource {
    pub fn install(target_id: &str) -> Self {
        let subscribers: Rc<RefCell<HashMap<u64, InputCallback>>> =
            Rc::new(RefCell::new(HashMap::new()));

        let Some(window) = web_sys::window() else {
            log::warn!("no window, input disabled");
            return Self {
                subscribers,
                next_id: Cell::new(1),
            };
        };

        match window.document().and_then(|d| d.get_element_by_id(target_id)) {
            Some(target) => {
                let subs = Rc::clone(&subscribers);
                let on_pointer = Closure::<dyn FnMut(web_sys::PointerEvent)>::new(
                    move |_event: web_sys::PointerEvent| {
                        Self::fire(&subs);
                    },
                );
                let _ = target
                    .add_event_listener_with_callback("pointerdown", on_pointer.as_ref().unchecked_ref());
                on_pointer.forget();
            }
            None => log::warn!("input target #{target_id} missing, pointer input disabled"),
        }

        let subs = Rc::clone(&subscribers);
        let on_key =
            Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |event: web_sys::KeyboardEvent| {
                if event.code() == "Space" {
                    Self::fire(&subs);
                }
            });
        let _ = window.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref());
        on_key.forget();

        Self {
            subscribers,
            next_id: Cell::new(1),
        }
    }

    fn fire(subscribers: &Rc<RefCell<HashMap<u64, InputCallback>>>) {
        let ids: Vec<u64> = subscribers.borrow().keys().copied().collect();
        for id in ids {
            if let Some(callback) = subscribers.borrow_mut().get_mut(&id) {
                callback();
            }
        }
    }
}

impl InputSource for DomInputSource {
    fn subscribe(&self, callback: InputCallback) -> InputSubscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().insert(id, callback);
        InputSubscription(id)
    }

    fn unsubscribe(&self, subscription: InputSubscription) {
        self.subscribers.borrow_mut().remove(&subscription.0);
    }
}

/// Best scores in `localStorage`, bare decimal integers per key
pub struct LocalScoreStore {
    storage: web_sys::Storage,
}

impl LocalScoreStore {
    /// `None` when storage is disabled; callers keep scores in memory
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl ScoreStore for LocalScoreStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.storage
            .get_item(key)
            .ok()
            .flatten()
            .and_then(|value| value.parse().ok())
    }

    fn set(&self, key: &str, value: u64) {
        if self.storage.set_item(key, &value.to_string()).is_err() {
            log::warn!("storage write failed for {key}");
        }
    }
}

fn js_get(target: &JsValue, name: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &name.into())
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn js_call0(target: &JsValue, name: &str) {
    if let Some(function) = js_get(target, name).and_then(|v| v.dyn_into::<js_sys::Function>().ok())
    {
        if function.call0(target).is_err() {
            log::warn!("host bridge: {name}() failed");
        }
    }
}

fn js_call1(target: &JsValue, name: &str, argument: &JsValue) {
    if let Some(function) = js_get(target, name).and_then(|v| v.dyn_into::<js_sys::Function>().ok())
    {
        if function.call1(target, argument).is_err() {
            log::warn!("host bridge: {name}(..) failed");
        }
    }
}

/// Telegram WebApp chrome, reached through reflection so the same build
/// runs standalone in a plain browser tab
pub struct TelegramBridge {
    webapp: JsValue,
}

impl TelegramBridge {
    /// `Some` only when the page runs inside Telegram
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let telegram = js_get(window.as_ref(), "Telegram")?;
        let webapp = js_get(&telegram, "WebApp")?;

        js_call0(&webapp, "ready");
        js_call0(&webapp, "expand");
        log::info!("telegram webapp detected");
        Some(Self { webapp })
    }
}

impl HostBridge for TelegramBridge {
    fn theme(&self) -> Theme {
        match js_get(&self.webapp, "colorScheme")
            .and_then(|value| value.as_string())
            .as_deref()
        {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    fn install_dismiss_action(&self, label: &str) {
        let Some(main_button) = js_get(&self.webapp, "MainButton") else {
            log::warn!("host bridge: no MainButton, dismiss action skipped");
            return;
        };
        js_call1(&main_button, "setText", &label.into());

        let webapp = self.webapp.clone();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            js_call0(&webapp, "close");
        });
        js_call1(&main_button, "onClick", on_click.as_ref());
        on_click.forget();

        js_call0(&main_button, "show");
    }
}
