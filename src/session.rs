// ABOUTME: Client session state and the bounded in-memory session store
// ABOUTME: Holds the per-client selected-enterprise key consumed by the tenant resolver
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! # Session State
//!
//! A [`Session`] is ephemeral, request-scoped state for one client: the
//! authenticated user id plus a single optional scalar - the selected
//! enterprise. It is never a persisted business entity.
//!
//! The selected value is stored as a *string*, not a typed id, so that
//! malformed or legacy values are representable; the tenant resolver
//! normalizes anything unparsable to "absent" instead of failing.
//!
//! [`MemorySessionStore`] bounds the number of live sessions with an LRU
//! cache so an unauthenticated client cannot grow process memory without
//! limit. Within one request a session is read once, mutated on the owned
//! copy, and written back exactly once, so later requests never observe a
//! partially-applied update.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use lru::LruCache;
use uuid::Uuid;

use crate::models::EnterpriseId;

/// Ephemeral per-client session state
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque token carried in the session cookie
    pub token: String,
    /// Authenticated user this session belongs to
    pub user_id: Uuid,
    /// When the session was established
    pub created_at: DateTime<Utc>,
    selected_enterprise: Option<String>,
}

impl Session {
    /// Create a fresh session for an authenticated user
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        Self {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            created_at: Utc::now(),
            selected_enterprise: None,
        }
    }

    /// The raw selected-enterprise value, if any
    ///
    /// Absence and explicit deletion are semantically equivalent. The value
    /// is untrusted until the resolver has re-verified it against the
    /// employment registry.
    #[must_use]
    pub fn selected_enterprise(&self) -> Option<&str> {
        self.selected_enterprise.as_deref()
    }

    /// Store a raw selected-enterprise value
    pub fn set_selected_enterprise(&mut self, value: impl Into<String>) {
        self.selected_enterprise = Some(value.into());
    }

    /// Store a validated enterprise selection
    pub fn select(&mut self, enterprise_id: EnterpriseId) {
        self.selected_enterprise = Some(enterprise_id.to_string());
    }

    /// Discard the selected enterprise, if any
    pub fn clear_selection(&mut self) {
        self.selected_enterprise = None;
    }
}

/// Bounded in-memory session store keyed by session token
///
/// Single-writer-per-client is assumed; if a client races two requests on
/// the same session, the last write-back wins.
pub struct MemorySessionStore {
    sessions: Mutex<LruCache<String, Session>>,
}

impl MemorySessionStore {
    /// Create a store bounded to `capacity` live sessions
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Establish a new session for a user and return it
    pub fn create(&self, user_id: Uuid) -> Session {
        let session = Session::new(user_id);
        self.lock().put(session.token.clone(), session.clone());
        session
    }

    /// Fetch a snapshot of a session by token
    #[must_use]
    pub fn get(&self, token: &str) -> Option<Session> {
        self.lock().get(token).cloned()
    }

    /// Write a session back, replacing the stored state atomically
    pub fn store(&self, session: Session) {
        self.lock().put(session.token.clone(), session);
    }

    /// Remove a session (logout); returns the removed state if it existed
    pub fn remove(&self, token: &str) -> Option<Session> {
        self.lock().pop(token)
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no sessions are live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
