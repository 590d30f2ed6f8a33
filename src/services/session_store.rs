// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token storage.
//!
//! Handlers and the token manager only see [`TokenStore`]; the in-memory
//! backend is the default and loses all sessions on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::models::{Session, SessionId};

#[derive(Debug, thiserror::Error)]
#[error("token store error: {0}")]
pub struct StoreError(pub String);

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;
    async fn put(&self, id: &SessionId, session: Session) -> Result<(), StoreError>;
    async fn delete(&self, id: &SessionId) -> Result<(), StoreError>;
    /// Drop every session past its lifetime at `now`; returns how many.
    async fn purge_stale(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// Process-local store keyed by session id.
#[derive(Default)]
pub struct InMemoryTokenStore {
    sessions: DashMap<SessionId, Session>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.get(id).map(|entry| entry.value().clone()))
    }

    async fn put(&self, id: &SessionId, session: Session) -> Result<(), StoreError> {
        self.sessions.insert(id.clone(), session);
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        self.sessions.remove(id);
        Ok(())
    }

    async fn purge_stale(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_stale(now));
        Ok(before.saturating_sub(self.sessions.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::SESSION_LIFETIME_SECS;

    fn session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: 1_700_000_000,
            created_at: 1_699_990_000,
        }
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemoryTokenStore::new();
        let id = SessionId::from("abc".to_string());

        assert_eq!(store.get(&id).await.unwrap(), None);

        store.put(&id, session("one")).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), Some(session("one")));

        store.put(&id, session("two")).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).await.unwrap().unwrap().access_token, "two");

        store.delete(&id).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = InMemoryTokenStore::new();
        let a = SessionId::from("a".to_string());
        let b = SessionId::from("b".to_string());

        store.put(&a, session("token-a")).await.unwrap();

        assert!(store.get(&b).await.unwrap().is_none());
        store.delete(&b).await.unwrap();
        assert!(store.get(&a).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_stale_drops_only_old_sessions() {
        let store = InMemoryTokenStore::new();
        let old = SessionId::from("old".to_string());
        let fresh = SessionId::from("fresh".to_string());
        store.put(&old, session("a")).await.unwrap();
        store
            .put(
                &fresh,
                Session {
                    created_at: 1_699_990_000 + 10,
                    ..session("b")
                },
            )
            .await
            .unwrap();

        let now = DateTime::from_timestamp(1_699_990_000 + SESSION_LIFETIME_SECS, 0).unwrap();
        let purged = store.purge_stale(now).await.unwrap();

        assert_eq!(purged, 1);
        assert!(store.get(&old).await.unwrap().is_none());
        assert!(store.get(&fresh).await.unwrap().is_some());
    }
}
