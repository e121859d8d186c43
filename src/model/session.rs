//! Persisted auth session and the per-run report stash.
//!
//! The session (token + profile) survives restarts in `.cache/session.json`.
//! Generated calculator reports are stashed in memory under fixed keys so a
//! detail view can recover them after navigation within the run.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

const SESSION_FILE: &str = ".cache/session.json";

/// Stash key for the most recently generated calculator report.
pub const REPORT_KEY: &str = "generated_report";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub profile: Value,
}

#[derive(Clone)]
pub struct SessionStore {
    path: PathBuf,
    session: Arc<RwLock<Option<AuthSession>>>,
    reports: Arc<RwLock<HashMap<String, Value>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::at(PathBuf::from(SESSION_FILE))
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            session: Arc::new(RwLock::new(None)),
            reports: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn load_from_disk(&self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let session: AuthSession = serde_json::from_str(&content)?;
            *self.session.write().await = Some(session);
        }
        Ok(())
    }

    pub async fn save_to_disk(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let session = self.session.read().await;
        match session.as_ref() {
            Some(session) => {
                let content = serde_json::to_string(session)?;
                std::fs::write(&self.path, content)?;
            }
            None => {
                if self.path.exists() {
                    std::fs::remove_file(&self.path)?;
                }
            }
        }
        Ok(())
    }

    pub async fn session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }

    pub async fn set_session(&self, session: AuthSession) {
        *self.session.write().await = Some(session);
    }

    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    pub async fn stash_report(&self, key: &str, report: Value) {
        self.reports.write().await.insert(key.to_string(), report);
    }

    pub async fn recover_report(&self, key: &str) -> Option<Value> {
        self.reports.read().await.get(key).cloned()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn session_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::at(path.clone());
        store
            .set_session(AuthSession {
                token: "tok-123".to_string(),
                profile: json!({"name": "Asha", "email": "asha@example.com"}),
            })
            .await;
        store.save_to_disk().await.unwrap();

        let restored = SessionStore::at(path);
        restored.load_from_disk().await.unwrap();
        let session = restored.session().await.unwrap();
        assert_eq!(session.token, "tok-123");
        assert_eq!(session.profile["name"], "Asha");
    }

    #[tokio::test]
    async fn clearing_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::at(path.clone());
        store
            .set_session(AuthSession { token: "t".into(), profile: Value::Null })
            .await;
        store.save_to_disk().await.unwrap();
        assert!(path.exists());

        store.clear_session().await;
        store.save_to_disk().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn report_survives_navigation_within_the_run() {
        let store = SessionStore::at(PathBuf::from("/nonexistent/session.json"));
        store
            .stash_report(REPORT_KEY, json!({"heading": "Taurus"}))
            .await;

        // A clone models the detail view recovering state after navigation.
        let detail_view = store.clone();
        let report = detail_view.recover_report(REPORT_KEY).await.unwrap();
        assert_eq!(report["heading"], "Taurus");
        assert!(detail_view.recover_report("other").await.is_none());
    }
}
