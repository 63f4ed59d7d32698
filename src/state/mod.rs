mod collection;
mod shell;

pub(crate) use collection::NoteCollection;
pub(crate) use shell::NoteShell;

use crate::config::EnvConfig;
use crate::store::RestStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: EnvConfig,
    pub shell: NoteShell<RestStore>,
}

impl AppState {
    pub fn new(config: EnvConfig) -> Self {
        let store = RestStore::new(&config);
        Self {
            config,
            shell: NoteShell::new(store),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
