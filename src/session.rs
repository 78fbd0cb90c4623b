//! Per-user conversation state.
//!
//! Idle sessions are never stored: resetting a session removes its entry, and
//! an absent entry reads back as Idle. Non-idle sessions expire after the
//! configured TTL of inactivity.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, TimeDelta, Utc};
use strum::IntoStaticStr;
use teloxide::types::{ChatId, Message, UserId};
use tokio::sync::Mutex;

use crate::video::Catalog;

/// Identifies one user inside one chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
}

impl SessionKey {
    pub fn new(chat_id: ChatId, user_id: Option<UserId>) -> Self {
        Self { chat_id, user_id }
    }

    pub fn from_message(msg: &Message) -> Self {
        Self::new(msg.chat.id, msg.from.as_ref().map(|user| user.id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    #[default]
    Idle,
    AwaitingLink,
    /// Formats probed from `url`, waiting for the user to pick one
    AwaitingFormat { url: String, catalog: Catalog },
}

#[derive(Debug, Clone)]
pub struct Session {
    pub step: Step,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(step: Step) -> Self {
        Self {
            step,
            updated_at: Utc::now(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.step == Step::Idle
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.updated_at > ttl
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Step::Idle)
    }
}

/// In-memory session map shared by all handlers
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionKey, Session>>>,
    ttl: TimeDelta,
}

impl SessionStore {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn get(&self, key: SessionKey) -> Session {
        self.get_at(key, Utc::now()).await
    }

    async fn get_at(&self, key: SessionKey, now: DateTime<Utc>) -> Session {
        let mut sessions = self.sessions.lock().await;
        let session = match sessions.get(&key) {
            Some(session) => session.clone(),
            None => return Session::default(),
        };

        if session.is_expired(now, self.ttl) {
            log::info!(
                "Session {:?} expired while {}",
                key,
                <&str>::from(&session.step)
            );
            sessions.remove(&key);
            return Session::default();
        }

        session
    }

    pub async fn set(&self, key: SessionKey, mut session: Session) {
        let mut sessions = self.sessions.lock().await;
        if session.is_idle() {
            sessions.remove(&key);
        } else {
            session.updated_at = Utc::now();
            sessions.insert(key, session);
        }
    }

    pub async fn set_step(&self, key: SessionKey, step: Step) {
        self.set(key, Session::new(step)).await;
    }

    pub async fn reset(&self, key: SessionKey) {
        self.set_step(key, Step::Idle).await;
    }

    /// Drop every session untouched for longer than the TTL
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now()).await
    }

    async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.ttl));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
