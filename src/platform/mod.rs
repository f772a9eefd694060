//! Platform abstraction layer
//!
//! Everything the games need from the host environment arrives through the
//! traits here: a drawing surface, a frame scheduler, an input event source,
//! best-score storage, and the host chrome bridge. The browser
//! implementations live in [`web`]; the in-memory stand-ins in [`fake`] back
//! the test suite and the headless demo. No module reaches for a global.

pub mod fake;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// Host color scheme, read once when the hub comes up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Drawing surface with the fixed logical playfield resolution. The host
/// scales presentation to physical pixels.
pub trait Surface {
    /// Wipe the previous frame
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str);
    /// Filled circle centered at (cx, cy)
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: &str);
}

/// Hands out per-game drawing surfaces. `None` means the rendering context
/// could not be acquired; the caller must idle rather than fail.
pub trait SurfaceProvider {
    fn acquire(&self, game_id: &str) -> Option<Box<dyn Surface>>;
}

/// Identifies one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub u64);

pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Frame-callback scheduler, nominally the host's render cadence (~60 Hz).
/// Callbacks fire once; a running loop reschedules itself every frame.
pub trait Scheduler {
    fn schedule_frame(&self, callback: FrameCallback) -> FrameHandle;
    /// Cancel a pending frame. Unknown or already-fired handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
    /// Milliseconds timestamp; also the seed source for fresh runs
    fn now(&self) -> f64;
}

/// Identifies one input subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSubscription(pub u64);

pub type InputCallback = Box<dyn FnMut()>;

/// Delivers primary presses (pointer down on the playfield, or the
/// designated key) to subscribers, outside the frame schedule.
pub trait InputSource {
    fn subscribe(&self, callback: InputCallback) -> InputSubscription;
    fn unsubscribe(&self, subscription: InputSubscription);
}

/// Best-score persistence: bare integers keyed by a per-game string
/// constant. Implementations must treat storage failure as non-fatal.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<u64>;
    fn set(&self, key: &str, value: u64);
}

/// Host chrome integration. Entirely optional; the hub runs standalone
/// without one.
pub trait HostBridge {
    fn theme(&self) -> Theme;
    /// Register the host-chrome primary action (a "Close" button that
    /// dismisses the whole container)
    fn install_dismiss_action(&self, label: &str);
}
