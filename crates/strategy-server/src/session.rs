//! Wizard Sessions
//!
//! One `StrategyWizard` per browser session, kept in memory. Each wizard sits
//! behind its own async mutex so a long generation call on one session never
//! blocks another.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use strategy_builder::{SectionNumbering, StrategyWizard, WizardLayout};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type SharedWizard = Arc<Mutex<StrategyWizard>>;

struct Entry {
    wizard: SharedWizard,
    updated_at: DateTime<Utc>,
}

/// In-memory wizard store
pub struct WizardSessions {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    layout: WizardLayout,
    numbering: SectionNumbering,
}

impl WizardSessions {
    /// Every wizard created here gets `layout` and `numbering`
    pub fn new(layout: WizardLayout, numbering: SectionNumbering) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            layout,
            numbering,
        }
    }

    pub fn create(&self) -> (SessionId, SharedWizard) {
        let id = SessionId::new();
        let wizard = Arc::new(Mutex::new(
            StrategyWizard::new(self.layout.clone()).with_numbering(self.numbering),
        ));
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(
            id.clone(),
            Entry {
                wizard: wizard.clone(),
                updated_at: Utc::now(),
            },
        );
        (id, wizard)
    }

    /// Look up a wizard and mark the session active
    pub fn get(&self, id: &SessionId) -> Option<SharedWizard> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.get_mut(id).map(|entry| {
            entry.updated_at = Utc::now();
            entry.wizard.clone()
        })
    }

    pub fn remove(&self, id: &SessionId) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop sessions idle for longer than `idle`; returns how many went
    pub fn prune_idle(&self, idle: Duration) -> usize {
        let Ok(idle) = chrono::Duration::from_std(idle) else {
            return 0;
        };
        let cutoff = Utc::now() - idle;
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let before = sessions.len();
        sessions.retain(|_, entry| entry.updated_at > cutoff);
        before - sessions.len()
    }
}
