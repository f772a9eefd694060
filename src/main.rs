//! GameHub entry point
//!
//! Browser builds wire the DOM shell around the hub; native builds run a
//! short headless demo of the engine under the in-memory collaborators.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_shell {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::Document;

    use gamehub::games::jumpball::{JUMPBALL_ID, JumpBallModule};
    use gamehub::games::memory::{CARD_COUNT, CardState, MemoryGame};
    use gamehub::games::tapper::TapperGame;
    use gamehub::hub::{HostServices, Hub};
    use gamehub::platform::web::{
        CanvasSurfaces, DomInputSource, LocalScoreStore, RafScheduler, TelegramBridge,
    };
    use gamehub::platform::{HostBridge, InputSource, Scheduler, ScoreStore, SurfaceProvider, Theme};
    use gamehub::sim::RunState;

    /// Flip-back delay after revealing a mismatched pair
    const FLIP_BACK_MS: i32 = 600;

    struct Shell {
        document: Document,
        hub: RefCell<Hub>,
        jumpball: Rc<RefCell<JumpBallModule>>,
        tapper: Rc<RefCell<TapperGame>>,
        memory: Rc<RefCell<MemoryGame>>,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("GameHub starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("no document, cannot start");
            return;
        };

        let scheduler: Rc<dyn Scheduler> = Rc::new(RafScheduler::new());
        let input: Rc<dyn InputSource> =
            Rc::new(DomInputSource::install(&format!("{JUMPBALL_ID}-canvas")));
        let surfaces: Rc<dyn SurfaceProvider> = Rc::new(CanvasSurfaces);
        let store = LocalScoreStore::open().map(|store| Rc::new(store) as Rc<dyn ScoreStore>);
        if store.is_none() {
            log::warn!("localStorage unavailable, best scores are session-only");
        }
        let bridge = TelegramBridge::detect().map(|bridge| Rc::new(bridge) as Rc<dyn HostBridge>);

        let jumpball = Rc::new(RefCell::new(JumpBallModule::new(Box::new(
            update_jumpball_hud,
        ))));
        let tapper = Rc::new(RefCell::new(TapperGame::new()));
        let memory = Rc::new(RefCell::new(MemoryGame::new()));

        let mut hub = Hub::new(HostServices {
            scheduler,
            input,
            surfaces,
            store,
            bridge,
        });
        hub.register(Box::new(Rc::clone(&jumpball)));
        hub.register(Box::new(Rc::clone(&tapper)));
        hub.register(Box::new(Rc::clone(&memory)));

        apply_theme(&document, hub.theme());

        let shell = Rc::new(Shell {
            document,
            hub: RefCell::new(hub),
            jumpball,
            tapper,
            memory,
        });

        build_tabs(&shell);
        wire_jumpball(&shell);
        wire_tapper(&shell);
        wire_memory(&shell);

        activate(&shell, JUMPBALL_ID);
        log::info!("GameHub running");
    }

    fn apply_theme(document: &Document, theme: Theme) {
        if let Some(body) = document.body() {
            let _ = body.set_attribute(
                "data-theme",
                match theme {
                    Theme::Dark => "dark",
                    Theme::Light => "light",
                },
            );
        }
    }

    /// Runs off the loop driver's status callback, so it re-acquires the
    /// document rather than borrowing the shell
    fn update_jumpball_hud(score: u32, run_state: RunState) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(element) = document.get_element_by_id("jumpball-score") {
            element.set_text_content(Some(&score.to_string()));
        }
        if let Some(element) = document.get_element_by_id("jumpball-over") {
            let class = if run_state == RunState::GameOver {
                "banner"
            } else {
                "banner hidden"
            };
            let _ = element.set_attribute("class", class);
        }
    }

    fn build_tabs(shell: &Rc<Shell>) {
        let Some(container) = shell.document.get_element_by_id("tabs") else {
            log::warn!("missing element #tabs");
            return;
        };
        for entry in shell.hub.borrow().entries() {
            let Ok(button) = shell.document.create_element("button") else {
                continue;
            };
            button.set_id(&format!("tab-{}", entry.id));
            let _ = button.set_attribute("class", "tab");
            button.set_text_content(Some(entry.display_name));

            let shell = Rc::clone(shell);
            let id = entry.id;
            let on_click = Closure::<dyn FnMut()>::new(move || activate(&shell, id));
            let _ =
                button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
            on_click.forget();

            let _ = container.append_child(&button);
        }
    }

    fn on_click(shell: &Rc<Shell>, id: &str, handler: fn(&Rc<Shell>)) {
        let Some(element) = shell.document.get_element_by_id(id) else {
            log::warn!("missing element #{id}");
            return;
        };
        let shell = Rc::clone(shell);
        let on_click = Closure::<dyn FnMut()>::new(move || handler(&shell));
        let _ = element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
        on_click.forget();
    }

    fn wire_jumpball(shell: &Rc<Shell>) {
        on_click(shell, "jumpball-restart", |shell| {
            shell.jumpball.borrow_mut().restart();
            update_jumpball_hud(0, RunState::Running);
        });
    }

    fn wire_tapper(shell: &Rc<Shell>) {
        on_click(shell, "tapper-button", |shell| {
            shell.tapper.borrow_mut().tap();
            shell.render_tapper();
        });
        on_click(shell, "tapper-reset", |shell| {
            shell.tapper.borrow_mut().reset();
            shell.render_tapper();
        });
    }

    fn wire_memory(shell: &Rc<Shell>) {
        for index in 0..CARD_COUNT {
            let id = format!("memory-card-{index}");
            let Some(button) = shell.document.get_element_by_id(&id) else {
                log::warn!("missing element #{id}");
                continue;
            };
            let shell = Rc::clone(shell);
            let on_press = Closure::<dyn FnMut()>::new(move || reveal_card(&shell, index));
            let _ =
                button.add_event_listener_with_callback("click", on_press.as_ref().unchecked_ref());
            on_press.forget();
        }
    }

    fn activate(shell: &Rc<Shell>, id: &str) {
        shell.hub.borrow_mut().activate(id);
        shell.refresh_tabs();
        shell.render_tapper();
        shell.render_memory();
    }

    fn reveal_card(shell: &Rc<Shell>, index: usize) {
        shell.memory.borrow_mut().reveal(index);
        shell.render_memory();
        if shell.memory.borrow().awaiting_resolve() {
            schedule_flip_back(shell);
        }
    }

    /// Settle the open pair after a short delay so the player sees both faces
    fn schedule_flip_back(shell: &Rc<Shell>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let timer_shell = Rc::clone(shell);
        let callback = Closure::once_into_js(move || {
            timer_shell.memory.borrow_mut().resolve();
            timer_shell.render_memory();
        });
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                FLIP_BACK_MS,
            )
            .is_err()
        {
            // No timer: settle immediately rather than wedge the board
            shell.memory.borrow_mut().resolve();
            shell.render_memory();
        }
    }

    impl Shell {
        fn refresh_tabs(&self) {
            let hub = self.hub.borrow();
            let active = hub.active_id();
            for entry in hub.entries() {
                let selected = active == Some(entry.id);
                if let Some(tab) = self.document.get_element_by_id(&format!("tab-{}", entry.id)) {
                    let _ = tab.set_attribute("class", if selected { "tab active" } else { "tab" });
                }
                if let Some(panel) = self.document.get_element_by_id(&format!("panel-{}", entry.id))
                {
                    let _ =
                        panel.set_attribute("class", if selected { "panel" } else { "panel hidden" });
                }
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(element) = self.document.get_element_by_id(id) {
                element.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(element) = self.document.get_element_by_id(id) {
                let _ = element.set_attribute("class", if hidden { "banner hidden" } else { "banner" });
            }
        }

        fn render_tapper(&self) {
            let tapper = self.tapper.borrow();
            self.set_text("tapper-button", &format!("TAP - {}", tapper.score()));
            self.set_text("tapper-best", &tapper.best().to_string());
        }

        fn render_memory(&self) {
            let memory = self.memory.borrow();
            for index in 0..CARD_COUNT {
                let Some(button) = self
                    .document
                    .get_element_by_id(&format!("memory-card-{index}"))
                else {
                    continue;
                };
                button.set_text_content(Some(memory.face(index).unwrap_or("\u{2753}")));
                let cleared = memory.card_state(index) == CardState::Cleared;
                if cleared || memory.awaiting_resolve() {
                    let _ = button.set_attribute("disabled", "disabled");
                } else {
                    let _ = button.remove_attribute("disabled");
                }
                let _ = button.set_attribute("class", if cleared { "card cleared" } else { "card" });
            }
            self.set_text("memory-moves", &memory.moves().to_string());
            self.set_hidden("memory-done", !memory.is_complete());
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_shell::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gamehub::games::jumpball::{JUMPBALL_ID, JumpBallModule};
    use gamehub::games::memory::MemoryGame;
    use gamehub::games::tapper::TapperGame;
    use gamehub::hub::{HostServices, Hub};
    use gamehub::platform::fake::{FakeSurfaces, ManualInput, ManualScheduler, MemoryStore};
    use gamehub::platform::{InputSource, Scheduler, ScoreStore, SurfaceProvider};
    use gamehub::sim::RunState;

    env_logger::init();
    log::info!("GameHub (native) starting - headless demo");

    let scheduler = Rc::new(ManualScheduler::new());
    let input = Rc::new(ManualInput::new());
    let surfaces = Rc::new(FakeSurfaces::new());

    let status = Rc::new(RefCell::new((0u32, RunState::Running)));
    let status_sink = Rc::clone(&status);
    let jumpball = Rc::new(RefCell::new(JumpBallModule::new(Box::new(
        move |score, run_state| {
            *status_sink.borrow_mut() = (score, run_state);
        },
    ))));

    let mut hub = Hub::new(HostServices {
        scheduler: Rc::clone(&scheduler) as Rc<dyn Scheduler>,
        input: Rc::clone(&input) as Rc<dyn InputSource>,
        surfaces: Rc::clone(&surfaces) as Rc<dyn SurfaceProvider>,
        store: Some(Rc::new(MemoryStore::new()) as Rc<dyn ScoreStore>),
        bridge: None,
    });
    hub.register(Box::new(Rc::clone(&jumpball)));
    hub.register(Box::new(Rc::new(RefCell::new(TapperGame::new()))));
    hub.register(Box::new(Rc::new(RefCell::new(MemoryGame::new()))));
    hub.activate(JUMPBALL_ID);

    // Tap twice a second until the run ends or we give up
    let mut frames = 0u32;
    while scheduler.pending_count() > 0 && frames < 3_600 {
        if frames % 30 == 0 {
            input.press();
        }
        scheduler.run_frame();
        frames += 1;
    }

    let (score, run_state) = *status.borrow();
    println!("jumpball demo: {frames} frames, score {score}, {run_state:?}");
    hub.shutdown();
}
