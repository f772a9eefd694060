//! Game module contract and the hub that hosts it
//!
//! Every mini-game exposes the same small surface to the host shell: an id,
//! a display name, and a mount/unmount lifecycle tied to being the active
//! tab. The hub owns the ordered module list and guarantees at most one
//! module is mounted at a time.

use std::cell::RefCell;
use std::rc::Rc;

use crate::platform::{HostBridge, InputSource, Scheduler, ScoreStore, SurfaceProvider, Theme};

/// Collaborator handles passed to a module when it mounts. Storage and the
/// host bridge are optional; their absence degrades features, never startup.
pub struct HostServices {
    pub scheduler: Rc<dyn Scheduler>,
    pub input: Rc<dyn InputSource>,
    pub surfaces: Rc<dyn SurfaceProvider>,
    pub store: Option<Rc<dyn ScoreStore>>,
    pub bridge: Option<Rc<dyn HostBridge>>,
}

/// Contract between a mini-game and the host shell
pub trait GameModule {
    /// Stable id; also keys the module's persisted data
    fn id(&self) -> &'static str;
    fn display_name(&self) -> &'static str;
    /// Called when the module becomes the active tab
    fn mount(&mut self, services: &HostServices);
    /// Must leave no scheduled work or input wiring behind
    fn unmount(&mut self);
}

/// Lets the shell keep a concrete handle to a module while the hub owns it
/// as a trait object
impl<M: GameModule> GameModule for Rc<RefCell<M>> {
    fn id(&self) -> &'static str {
        self.borrow().id()
    }

    fn display_name(&self) -> &'static str {
        self.borrow().display_name()
    }

    fn mount(&mut self, services: &HostServices) {
        self.borrow_mut().mount(services);
    }

    fn unmount(&mut self) {
        self.borrow_mut().unmount();
    }
}

/// Entry the host UI renders a tab for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub id: &'static str,
    pub display_name: &'static str,
}

pub struct Hub {
    services: HostServices,
    modules: Vec<Box<dyn GameModule>>,
    active: Option<usize>,
    theme: Theme,
}

impl Hub {
    /// Reads the host theme once and installs the dismiss affordance. With
    /// no bridge the hub runs standalone on the default theme.
    pub fn new(services: HostServices) -> Self {
        let theme = match &services.bridge {
            Some(bridge) => bridge.theme(),
            None => {
                log::info!("hub: no host bridge, running standalone");
                Theme::default()
            }
        };
        if let Some(bridge) = &services.bridge {
            bridge.install_dismiss_action("Close");
        }
        Self {
            services,
            modules: Vec::new(),
            active: None,
            theme,
        }
    }

    /// Registration order is presentation order
    pub fn register(&mut self, module: Box<dyn GameModule>) {
        self.modules.push(module);
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn entries(&self) -> Vec<ModuleEntry> {
        self.modules
            .iter()
            .map(|module| ModuleEntry {
                id: module.id(),
                display_name: module.display_name(),
            })
            .collect()
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.active.map(|index| self.modules[index].id())
    }

    /// Make `id` the active module. The previous module unmounts before the
    /// new one mounts; unknown ids leave the selection untouched.
    pub fn activate(&mut self, id: &str) -> bool {
        let Some(index) = self.modules.iter().position(|module| module.id() == id) else {
            log::warn!("hub: unknown game id {id:?}");
            return false;
        };
        if self.active == Some(index) {
            return true;
        }
        if let Some(current) = self.active.take() {
            self.modules[current].unmount();
        }
        log::info!("hub: activating {id}");
        self.modules[index].mount(&self.services);
        self.active = Some(index);
        true
    }

    /// Unmount whatever is active (the host dismissal path)
    pub fn shutdown(&mut self) {
        if let Some(index) = self.active.take() {
            self.modules[index].unmount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::{FakeBridge, FakeSurfaces, ManualInput, ManualScheduler, MemoryStore};

    fn services(bridge: Option<Rc<dyn HostBridge>>) -> HostServices {
        HostServices {
            scheduler: Rc::new(ManualScheduler::new()),
            input: Rc::new(ManualInput::new()),
            surfaces: Rc::new(FakeSurfaces::new()),
            store: Some(Rc::new(MemoryStore::new())),
            bridge,
        }
    }

    struct ProbeModule {
        id: &'static str,
        events: Rc<RefCell<Vec<String>>>,
    }

    impl GameModule for ProbeModule {
        fn id(&self) -> &'static str {
            self.id
        }

        fn display_name(&self) -> &'static str {
            "Probe"
        }

        fn mount(&mut self, _services: &HostServices) {
            self.events.borrow_mut().push(format!("mount {}", self.id));
        }

        fn unmount(&mut self) {
            self.events.borrow_mut().push(format!("unmount {}", self.id));
        }
    }

    fn probe_hub() -> (Hub, Rc<RefCell<Vec<String>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut hub = Hub::new(services(None));
        for id in ["a", "b"] {
            hub.register(Box::new(ProbeModule {
                id,
                events: Rc::clone(&events),
            }));
        }
        (hub, events)
    }

    #[test]
    fn exactly_one_module_is_active() {
        let (mut hub, events) = probe_hub();
        assert_eq!(hub.active_id(), None);

        assert!(hub.activate("a"));
        assert_eq!(hub.active_id(), Some("a"));

        assert!(hub.activate("b"));
        assert_eq!(hub.active_id(), Some("b"));
        assert_eq!(
            *events.borrow(),
            vec!["mount a", "unmount a", "mount b"]
        );
    }

    #[test]
    fn reactivating_the_active_module_is_a_no_op() {
        let (mut hub, events) = probe_hub();
        hub.activate("a");
        hub.activate("a");
        assert_eq!(*events.borrow(), vec!["mount a"]);
    }

    #[test]
    fn unknown_id_keeps_the_selection() {
        let (mut hub, events) = probe_hub();
        hub.activate("a");
        assert!(!hub.activate("nope"));
        assert_eq!(hub.active_id(), Some("a"));
        assert_eq!(*events.borrow(), vec!["mount a"]);
    }

    #[test]
    fn shutdown_unmounts_the_active_module() {
        let (mut hub, events) = probe_hub();
        hub.activate("b");
        hub.shutdown();
        assert_eq!(hub.active_id(), None);
        assert_eq!(*events.borrow(), vec!["mount b", "unmount b"]);
    }

    #[test]
    fn entries_preserve_registration_order() {
        let (hub, _) = probe_hub();
        let ids: Vec<_> = hub.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn theme_and_dismiss_come_from_the_bridge() {
        let bridge = Rc::new(FakeBridge::new(Theme::Dark));
        let hub = Hub::new(services(Some(Rc::clone(&bridge) as Rc<dyn HostBridge>)));
        assert_eq!(hub.theme(), Theme::Dark);
        assert_eq!(bridge.dismiss_label(), Some("Close".to_string()));
    }

    #[test]
    fn missing_bridge_defaults_to_light() {
        let hub = Hub::new(services(None));
        assert_eq!(hub.theme(), Theme::Light);
    }
}
