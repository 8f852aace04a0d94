use crate::security::secret::secrets_match;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "SESSION";

/// Idle time after which a session is dropped.
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    /// Set once the user has logged in through the form.
    pub username: Option<String>,
    pub csrf_token: Option<String>,
}

impl SessionData {
    pub fn csrf_matches(&self, provided: Option<&str>) -> bool {
        match (self.csrf_token.as_deref(), provided) {
            (Some(expected), Some(provided)) => secrets_match(expected, provided),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
struct SessionEntry {
    data: SessionData,
    last_accessed: Instant,
}

/// In-memory sessions keyed by the random id carried in the `SESSION` cookie.
/// Shared by every worker, so it lives behind one `web::Data`.
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SESSION_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            timeout,
        }
    }

    pub fn create(&self, data: SessionData) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.insert(
            id.clone(),
            SessionEntry {
                data,
                last_accessed: Instant::now(),
            },
        );
        id
    }

    /// Returns the live session and refreshes its idle timer. Expired
    /// sessions are removed on the way.
    pub fn get(&self, id: &str) -> Option<SessionData> {
        let now = Instant::now();
        {
            let mut entry = self.sessions.get_mut(id)?;
            if now.duration_since(entry.last_accessed) <= self.timeout {
                entry.last_accessed = now;
                return Some(entry.data.clone());
            }
        }
        self.sessions.remove(id);
        None
    }

    pub fn remove(&self, id: &str) -> Option<SessionData> {
        self.sessions.remove(id).map(|(_, entry)| entry.data)
    }

    /// Returns the CSRF token of the session, issuing one (and a session if
    /// `id` is missing or stale) when there is none yet. The returned id is
    /// the session the token belongs to.
    pub fn csrf_token(&self, id: Option<&str>) -> (String, String) {
        if let Some(id) = id {
            if self.get(id).is_some() {
                if let Some(mut entry) = self.sessions.get_mut(id) {
                    let token = entry
                        .data
                        .csrf_token
                        .get_or_insert_with(new_token)
                        .clone();
                    return (id.to_string(), token);
                }
            }
        }

        let token = new_token();
        let id = self.create(SessionData {
            username: None,
            csrf_token: Some(token.clone()),
        });
        (id, token)
    }

    /// Replaces the session with a fresh id holding the logged-in user and a
    /// new CSRF token. The old id stops working.
    pub fn authenticate(&self, previous: Option<&str>, username: &str) -> String {
        if let Some(previous) = previous {
            self.remove(previous);
        }
        self.create(SessionData {
            username: Some(username.to_string()),
            csrf_token: Some(new_token()),
        })
    }
}

fn new_token() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csrf_token_is_stable_within_a_session() {
        let store = SessionStore::default();

        let (id, token) = store.csrf_token(None);
        let (same_id, same_token) = store.csrf_token(Some(&id));

        assert_eq!(id, same_id);
        assert_eq!(token, same_token);
        assert_eq!(store.sessions.len(), 1);
    }

    #[test]
    fn unknown_session_gets_a_fresh_one() {
        let store = SessionStore::default();

        let (id, _) = store.csrf_token(Some("not-a-session"));

        assert_ne!(id, "not-a-session");
        assert!(store.get(&id).is_some());
    }

    #[test]
    fn authenticate_rotates_the_session() {
        let store = SessionStore::default();
        let (anonymous, token) = store.csrf_token(None);

        let id = store.authenticate(Some(&anonymous), "user");

        assert_ne!(id, anonymous);
        assert!(store.get(&anonymous).is_none());
        let data = store.get(&id).unwrap();
        assert_eq!(data.username.as_deref(), Some("user"));
        assert_ne!(data.csrf_token, Some(token));
    }

    #[test]
    fn csrf_match_needs_a_token_on_both_sides() {
        let session = SessionData {
            username: None,
            csrf_token: Some("token".to_string()),
        };

        assert!(session.csrf_matches(Some("token")));
        assert!(!session.csrf_matches(Some("other")));
        assert!(!session.csrf_matches(None));
        assert!(!SessionData::default().csrf_matches(Some("")));
    }

    #[test]
    fn idle_sessions_expire() {
        let store = SessionStore::new(Duration::ZERO);
        let id = store.create(SessionData::default());

        std::thread::sleep(Duration::from_millis(5));

        assert!(store.get(&id).is_none());
        assert!(store.sessions.is_empty());
    }
}
