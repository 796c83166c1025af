use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::StudioApi;
use crate::config::PortalConfig;
use crate::models::NavState;

/// Shared portal state: session store handle, config and the API client.
/// `nav` carries the class-booking handoff between steps in one process.
pub struct PortalState {
    pub db: Arc<Mutex<Connection>>,
    pub config: PortalConfig,
    pub api: Box<dyn StudioApi>,
    pub nav: Mutex<Option<NavState>>,
}

impl PortalState {
    pub fn new(conn: Connection, config: PortalConfig, api: Box<dyn StudioApi>) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
            api,
            nav: Mutex::new(None),
        }
    }

    pub fn set_nav(&self, nav: NavState) {
        if let Ok(mut slot) = self.nav.lock() {
            *slot = Some(nav);
        }
    }

    pub fn take_nav(&self) -> Option<NavState> {
        self.nav.lock().ok().and_then(|mut slot| slot.take())
    }
}
