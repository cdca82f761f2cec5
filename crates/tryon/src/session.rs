use {
    crate::{GarmentCategory, SizeBucket},
    serde::Serialize,
    std::{collections::HashMap, fmt, sync::Mutex},
};

/// One completed try-on in a user's history. Never holds image data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user_id: String,
    pub product_id: Option<String>,
    pub category: GarmentCategory,
    pub size: SizeBucket,
    pub fit_score: f32,
    /// Milliseconds since the UNIX epoch.
    pub recorded_at: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// User and session history collaborator. The engine only appends and
/// reads; persistence format belongs to the implementation.
pub trait SessionStore: Send + Sync {
    fn append(&self, record: SessionRecord) -> Result<(), StoreError>;

    /// The user's records, oldest first.
    fn history(&self, user_id: &str) -> Result<Vec<SessionRecord>, StoreError>;
}

/// Process-local store, lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Vec<SessionRecord>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn append(&self, record: SessionRecord) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .entry(record.user_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    fn history(&self, user_id: &str) -> Result<Vec<SessionRecord>, StoreError> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        Ok(sessions.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, size: SizeBucket) -> SessionRecord {
        SessionRecord {
            user_id: user.to_string(),
            product_id: None,
            category: GarmentCategory::Top,
            size,
            fit_score: 0.8,
            recorded_at: 0,
        }
    }

    #[test]
    fn test_history_is_per_user_and_ordered() {
        let store = InMemorySessionStore::new();
        store.append(record("a", SizeBucket::S)).unwrap();
        store.append(record("b", SizeBucket::L)).unwrap();
        store.append(record("a", SizeBucket::M)).unwrap();
        let history = store.history("a").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].size, SizeBucket::S);
        assert_eq!(history[1].size, SizeBucket::M);
        assert!(store.history("nobody").unwrap().is_empty());
    }
}
