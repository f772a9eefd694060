//! Frame-loop driver for the JumpBall engine
//!
//! Owns the tick + render schedule, the run/game-over/restart lifecycle, and
//! input wiring. Every collaborator is injected, so the whole loop runs
//! headless under the fakes.
//!
//! Invariants:
//! - at most one frame callback is outstanding at any time
//! - after [`LoopDriver::shutdown`] returns, no tick fires and no input
//!   reaches the simulation

use std::cell::RefCell;
use std::rc::Rc;

use crate::platform::{FrameHandle, InputSource, InputSubscription, Scheduler, Surface};
use crate::render;
use crate::sim::{self, JumpState, RunState};

/// Driver lifecycle. `Over` keeps the terminal frame visible while mounted;
/// `Stopped` means unmounted for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Idle,
    Running,
    Over,
    Stopped,
}

/// Called after every tick with the current score and run state, so the host
/// UI is never more than one tick stale. Must not call back into the driver.
pub type StatusCallback = Box<dyn FnMut(u32, RunState)>;

struct DriverInner {
    state: JumpState,
    surface: Box<dyn Surface>,
    pending: Option<FrameHandle>,
    phase: DriverPhase,
    on_status: StatusCallback,
}

pub struct LoopDriver {
    inner: Rc<RefCell<DriverInner>>,
    scheduler: Rc<dyn Scheduler>,
    input: Rc<dyn InputSource>,
    subscription: Option<InputSubscription>,
}

impl LoopDriver {
    pub fn new(
        surface: Box<dyn Surface>,
        scheduler: Rc<dyn Scheduler>,
        input: Rc<dyn InputSource>,
        seed: u64,
        on_status: StatusCallback,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DriverInner {
                state: JumpState::new(seed),
                surface,
                pending: None,
                phase: DriverPhase::Idle,
                on_status,
            })),
            scheduler,
            input,
            subscription: None,
        }
    }

    /// Wire input and begin ticking. Only valid from `Idle`.
    pub fn start(&mut self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.phase != DriverPhase::Idle {
                return;
            }
            inner.phase = DriverPhase::Running;
        }

        // Presses reach the simulation directly, not through the tick
        // schedule, so jump latency is sub-tick
        let inner = Rc::clone(&self.inner);
        self.subscription = Some(self.input.subscribe(Box::new(move || {
            inner.borrow_mut().state.jump();
        })));

        self.schedule_next();
    }

    /// Throw the run away and start fresh. Valid while running or over.
    pub fn restart(&mut self, seed: u64) {
        {
            let mut inner = self.inner.borrow_mut();
            match inner.phase {
                DriverPhase::Running | DriverPhase::Over => {}
                DriverPhase::Idle | DriverPhase::Stopped => return,
            }
            if let Some(handle) = inner.pending.take() {
                self.scheduler.cancel_frame(handle);
            }
            inner.state = JumpState::new(seed);
            inner.phase = DriverPhase::Running;
        }
        log::info!("jumpball: restart with seed {seed}");
        self.schedule_next();
    }

    /// Unmount. Cancels the pending frame and drops the input subscription
    /// before returning; nothing runs afterwards.
    pub fn shutdown(&mut self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == DriverPhase::Stopped {
                return;
            }
            if let Some(handle) = inner.pending.take() {
                self.scheduler.cancel_frame(handle);
            }
            inner.phase = DriverPhase::Stopped;
        }
        if let Some(subscription) = self.subscription.take() {
            self.input.unsubscribe(subscription);
        }
        log::info!("jumpball: shut down");
    }

    pub fn jump(&self) {
        self.inner.borrow_mut().state.jump();
    }

    pub fn phase(&self) -> DriverPhase {
        self.inner.borrow().phase
    }

    pub fn score(&self) -> u32 {
        self.inner.borrow().state.score
    }

    pub fn run_state(&self) -> RunState {
        self.inner.borrow().state.run_state
    }

    fn schedule_next(&self) {
        Self::schedule_frame(&self.inner, &self.scheduler);
    }

    fn schedule_frame(inner: &Rc<RefCell<DriverInner>>, scheduler: &Rc<dyn Scheduler>) {
        let frame_inner = Rc::clone(inner);
        let frame_scheduler = Rc::clone(scheduler);
        let handle = scheduler.schedule_frame(Box::new(move |_timestamp| {
            Self::on_frame(&frame_inner, &frame_scheduler);
        }));

        let mut guard = inner.borrow_mut();
        debug_assert!(guard.pending.is_none(), "one outstanding frame at most");
        guard.pending = Some(handle);
    }

    fn on_frame(inner: &Rc<RefCell<DriverInner>>, scheduler: &Rc<dyn Scheduler>) {
        let mut guard = inner.borrow_mut();
        guard.pending = None;
        if guard.phase != DriverPhase::Running {
            return;
        }

        sim::tick(&mut guard.state);
        let over = guard.state.is_over();
        {
            let DriverInner {
                state,
                surface,
                on_status,
                ..
            } = &mut *guard;
            render::draw_frame(surface.as_mut(), state);
            (on_status)(state.score, state.run_state);
        }

        if over {
            // The loop stops but the terminal frame stays mounted
            guard.phase = DriverPhase::Over;
            return;
        }

        drop(guard);
        Self::schedule_frame(inner, scheduler);
    }
}

impl Drop for LoopDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
