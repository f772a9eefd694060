//! JumpBall - jump and avoid obstacles
//!
//! The only module with a simulation loop. Mounting wires a [`LoopDriver`]
//! to the host collaborators; unmounting shuts it down.

use std::cell::RefCell;
use std::rc::Rc;

use crate::driver::{DriverPhase, LoopDriver, StatusCallback};
use crate::hub::{GameModule, HostServices};
use crate::platform::Scheduler;
use crate::sim::RunState;

pub const JUMPBALL_ID: &str = "jumpball";

pub struct JumpBallModule {
    driver: Option<LoopDriver>,
    scheduler: Option<Rc<dyn Scheduler>>,
    /// Shared with each mounted driver so the callback survives remounts
    on_status: Rc<RefCell<StatusCallback>>,
}

impl JumpBallModule {
    /// `on_status` receives `(score, run_state)` after every tick
    pub fn new(on_status: StatusCallback) -> Self {
        Self {
            driver: None,
            scheduler: None,
            on_status: Rc::new(RefCell::new(on_status)),
        }
    }

    /// Forward a press when the shell handles input itself (the usual path
    /// is the injected input source)
    pub fn jump(&self) {
        if let Some(driver) = &self.driver {
            driver.jump();
        }
    }

    /// Fresh run after a game over, seeded from the scheduler clock
    pub fn restart(&mut self) {
        let Some(scheduler) = &self.scheduler else {
            return;
        };
        let seed = scheduler.now() as u64;
        if let Some(driver) = &mut self.driver {
            driver.restart(seed);
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.driver
            .as_ref()
            .map(|driver| driver.phase())
            .unwrap_or(DriverPhase::Idle)
    }

    pub fn score(&self) -> u32 {
        self.driver.as_ref().map(|driver| driver.score()).unwrap_or(0)
    }

    pub fn run_state(&self) -> RunState {
        self.driver
            .as_ref()
            .map(|driver| driver.run_state())
            .unwrap_or(RunState::Running)
    }
}

impl GameModule for JumpBallModule {
    fn id(&self) -> &'static str {
        JUMPBALL_ID
    }

    fn display_name(&self) -> &'static str {
        "JumpBall"
    }

    fn mount(&mut self, services: &HostServices) {
        let Some(surface) = services.surfaces.acquire(JUMPBALL_ID) else {
            log::warn!("jumpball: no drawing surface, staying idle");
            return;
        };

        let seed = services.scheduler.now() as u64;
        let status = Rc::clone(&self.on_status);
        let mut driver = LoopDriver::new(
            surface,
            Rc::clone(&services.scheduler),
            Rc::clone(&services.input),
            seed,
            Box::new(move |score, run_state| (status.borrow_mut())(score, run_state)),
        );
        driver.start();
        log::info!("jumpball: mounted with seed {seed}");

        self.scheduler = Some(Rc::clone(&services.scheduler));
        self.driver = Some(driver);
    }

    fn unmount(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            driver.shutdown();
        }
        self.scheduler = None;
    }
}
