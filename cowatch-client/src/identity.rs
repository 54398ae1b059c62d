//! Display name and roster handling
//!
//! Names are claimed, never negotiated: the client sends `set_name` and
//! the authority's next roster snapshot is the truth. The authority
//! assigns each connection a default name, which is only suggested to
//! the user here, not claimed on their behalf. Persistence lives behind
//! [`NameStore`] so the embedder decides where (or whether) a claimed
//! name survives restarts.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::error::{Error, Result};
use cowatch_common::{ClientMessage, Participant, SessionId};

/// Persistence seam for the claimed display name
pub trait NameStore: Send + Sync {
    /// Previously stored name, if any
    fn load(&self) -> Option<String>;

    /// Remember `name` for future sessions
    fn store(&self, name: &str);
}

/// In-memory [`NameStore`]; the name lives as long as the process
#[derive(Default)]
pub struct MemoryNameStore {
    name: Mutex<Option<String>>,
}

impl MemoryNameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NameStore for MemoryNameStore {
    fn load(&self) -> Option<String> {
        self.name.lock().unwrap().clone()
    }

    fn store(&self, name: &str) {
        *self.name.lock().unwrap() = Some(name.to_string());
    }
}

/// One renderable roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Participant from the snapshot
    pub participant: Participant,

    /// Whether this participant is the local session itself
    pub is_self: bool,
}

/// Tracks who this client is: claimed name, suggested default, own
/// session id, and the latest roster
pub struct SessionIdentity {
    store: Arc<dyn NameStore>,

    /// Name the user (or config) claimed; re-asserted on every connect
    claimed: Option<String>,

    /// Authority-assigned default, offered to the user but never claimed
    /// automatically
    suggested: Option<String>,

    /// Own connection id, learned from the transport on connect
    session_id: Option<SessionId>,

    /// Latest roster snapshot
    roster: Vec<Participant>,
}

impl SessionIdentity {
    /// `preclaimed` comes from configuration; it is asserted on the
    /// first connect as if the user had claimed it.
    pub fn new(store: Arc<dyn NameStore>, preclaimed: Option<String>) -> Self {
        Self {
            store,
            claimed: preclaimed,
            suggested: None,
            session_id: None,
            roster: Vec::new(),
        }
    }

    /// Name currently claimed, if any
    pub fn display_name(&self) -> Option<&str> {
        self.claimed.as_deref()
    }

    /// Authority-suggested default name, if one arrived
    pub fn suggested_name(&self) -> Option<&str> {
        self.suggested.as_deref()
    }

    /// Own session id for the current connection
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// The transport (re)connected under `session_id`
    ///
    /// Returns the `set_name` message to re-assert the remembered name,
    /// if one is remembered (claimed this run, or found in the store).
    /// Everything else arrives from the authority unprompted.
    pub fn on_connected(&mut self, session_id: SessionId) -> Option<ClientMessage> {
        info!("Connected as session {}", session_id);
        self.session_id = Some(session_id);

        let name = self.claimed.clone().or_else(|| self.store.load())?;
        debug!("Re-asserting display name {:?}", name);
        self.claimed = Some(name.clone());
        Some(ClientMessage::SetName { name })
    }

    /// Authority suggested a default name for this connection
    pub fn suggest_default(&mut self, name: String) {
        debug!("Default name suggested: {:?}", name);
        self.suggested = Some(name);
    }

    /// Claim a display name from raw user input
    ///
    /// Rejections carry user-facing text; a successful claim is stored
    /// and returned as the outbound `set_name`.
    pub fn claim(&mut self, raw: &str) -> Result<ClientMessage> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Please enter a name.".to_string()));
        }

        self.claimed = Some(name.to_string());
        self.store.store(name);
        info!("Claimed display name {:?}", name);

        Ok(ClientMessage::SetName {
            name: name.to_string(),
        })
    }

    /// Replace the roster with a fresh snapshot, returning renderable
    /// entries with the local participant flagged
    pub fn apply_roster(&mut self, users: Vec<Participant>) -> Vec<RosterEntry> {
        self.roster = users;
        self.render_roster()
    }

    /// Render the held roster against the current session id
    ///
    /// Self flags depend on the id, which can change on reconnect, so
    /// entries handed out earlier go stale.
    pub fn render_roster(&self) -> Vec<RosterEntry> {
        self.roster
            .iter()
            .map(|participant| RosterEntry {
                is_self: Some(&participant.id) == self.session_id.as_ref(),
                participant: participant.clone(),
            })
            .collect()
    }
}
