//! Shared fixtures for engine tests

use std::sync::Arc;

use corpografo_client::testing::{RecordingShell, ScriptedTransport};
use corpografo_client::{EntityClient, SessionStore};

pub(crate) struct Harness {
    pub client: EntityClient,
    pub transport: Arc<ScriptedTransport>,
    pub shell: Arc<RecordingShell>,
}

pub(crate) fn harness() -> Harness {
    let transport = Arc::new(ScriptedTransport::new());
    let shell = Arc::new(RecordingShell::new());
    let client = EntityClient::new(transport.clone(), SessionStore::in_memory(), shell.clone());
    Harness {
        client,
        transport,
        shell,
    }
}
