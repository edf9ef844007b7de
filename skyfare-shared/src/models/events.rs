use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Notifications published by a search session to its observers
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    SearchStarted {
        session_id: Uuid,
        route: String,
        started_at: DateTime<Utc>,
    },
    ResultsReady {
        session_id: Uuid,
        offer_count: usize,
        generated_at: DateTime<Utc>,
    },
    PricesRefreshed {
        session_id: Uuid,
        tick: u64,
        updated_at: DateTime<Utc>,
    },
    AutoUpdateChanged {
        enabled: bool,
    },
    SortChanged {
        sort_key: String,
    },
    TornDown {
        session_id: Uuid,
    },
}

impl SessionEvent {
    /// Session the event belongs to, if any
    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            SessionEvent::SearchStarted { session_id, .. }
            | SessionEvent::ResultsReady { session_id, .. }
            | SessionEvent::PricesRefreshed { session_id, .. }
            | SessionEvent::TornDown { session_id } => Some(*session_id),
            SessionEvent::AutoUpdateChanged { .. } | SessionEvent::SortChanged { .. } => None,
        }
    }
}

/// Notifications published by the static "live prices" band
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreviewEvent {
    Updating {
        started_at: DateTime<Utc>,
    },
    Refreshed {
        tick: u64,
        updated_at: DateTime<Utc>,
    },
}
