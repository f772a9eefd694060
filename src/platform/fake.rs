//! In-memory collaborator stand-ins
//!
//! Back the test suite and the native headless demo. The scheduler is
//! manual: frames fire only when the caller pumps them, which makes loop
//! lifecycles (including cancellation) observable.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{
    FrameCallback, FrameHandle, HostBridge, InputCallback, InputSource, InputSubscription,
    Scheduler, ScoreStore, Surface, SurfaceProvider, Theme,
};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: String,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: String,
    },
}

/// Surface that records every call into a shared log
pub struct RecordingSurface {
    calls: Rc<RefCell<Vec<DrawCall>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shared handle onto the call log, usable after the surface is given away
    pub fn log(&self) -> Rc<RefCell<Vec<DrawCall>>> {
        Rc::clone(&self.calls)
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.calls.borrow_mut().push(DrawCall::Clear);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str) {
        self.calls.borrow_mut().push(DrawCall::Rect {
            x,
            y,
            width,
            height,
            color: color.to_string(),
        });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: &str) {
        self.calls.borrow_mut().push(DrawCall::Circle {
            cx,
            cy,
            radius,
            color: color.to_string(),
        });
    }
}

/// Provider handing out [`RecordingSurface`]s that share one call log.
/// Flip `set_available(false)` to emulate a missing rendering context.
pub struct FakeSurfaces {
    calls: Rc<RefCell<Vec<DrawCall>>>,
    available: Cell<bool>,
}

impl FakeSurfaces {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            available: Cell::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn log(&self) -> Rc<RefCell<Vec<DrawCall>>> {
        Rc::clone(&self.calls)
    }
}

impl Default for FakeSurfaces {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceProvider for FakeSurfaces {
    fn acquire(&self, _game_id: &str) -> Option<Box<dyn Surface>> {
        if !self.available.get() {
            return None;
        }
        Some(Box::new(RecordingSurface {
            calls: Rc::clone(&self.calls),
        }))
    }
}

/// Manually pumped scheduler. `run_frame` fires everything currently
/// pending; callbacks scheduled during a frame wait for the next pump,
/// mirroring how animation frames behave.
pub struct ManualScheduler {
    inner: RefCell<ManualSchedulerInner>,
}

struct ManualSchedulerInner {
    next_handle: u64,
    pending: Vec<(FrameHandle, FrameCallback)>,
    now: f64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(ManualSchedulerInner {
                next_handle: 1,
                pending: Vec::new(),
                now: 1_000.0,
            }),
        }
    }

    /// Fire all currently pending frames; returns how many ran
    pub fn run_frame(&self) -> usize {
        let due = {
            let mut inner = self.inner.borrow_mut();
            inner.now += 16.0;
            std::mem::take(&mut inner.pending)
        };
        let count = due.len();
        let now = self.inner.borrow().now;
        for (_, callback) in due {
            callback(now);
        }
        count
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn advance(&self, ms: f64) {
        self.inner.borrow_mut().now += ms;
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        let handle = FrameHandle(inner.next_handle);
        inner.next_handle += 1;
        inner.pending.push((handle, callback));
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.inner
            .borrow_mut()
            .pending
            .retain(|(pending, _)| *pending != handle);
    }

    fn now(&self) -> f64 {
        self.inner.borrow().now
    }
}

/// Input source pressed by hand from tests
pub struct ManualInput {
    subscribers: RefCell<HashMap<u64, InputCallback>>,
    next_id: Cell<u64>,
}

impl ManualInput {
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    /// Deliver one primary press to every subscriber
    pub fn press(&self) {
        let ids: Vec<u64> = self.subscribers.borrow().keys().copied().collect();
        for id in ids {
            if let Some(callback) = self.subscribers.borrow_mut().get_mut(&id) {
                callback();
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl Default for ManualInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for ManualInput {
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

/// Plain in-memory key-value store
pub struct MemoryStore {
    values: RefCell<HashMap<String, u64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.values.borrow().get(key).copied()
    }

    fn set(&self, key: &str, value: u64) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }
}

/// Bridge with a fixed theme that records the installed dismiss action
pub struct FakeBridge {
    theme: Theme,
    dismiss_label: RefCell<Option<String>>,
}

impl FakeBridge {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            dismiss_label: RefCell::new(None),
        }
    }

    pub fn dismiss_label(&self) -> Option<String> {
        self.dismiss_label.borrow().clone()
    }
}

impl HostBridge for FakeBridge {
    fn theme(&self) -> Theme {
        self.theme
    }

    fn install_dismiss_action(&self, label: &str) {
        *self.dismiss_label.borrow_mut() = Some(label.to_string());
    }
}
