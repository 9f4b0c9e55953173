use std::fmt;

use tokio_util::sync::CancellationToken;

/// Generation number of a query session. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tracks the one active query session.
///
/// Starting a session cancels the previous one. A completion is applied only
/// if its id is still the active one, so late responses from superseded
/// sessions are dropped regardless of whether they succeeded.
#[derive(Debug, Default)]
pub struct QuerySessions {
    next: u64,
    active: Option<Active>,
}

#[derive(Debug)]
struct Active {
    id: SessionId,
    token: CancellationToken,
}

impl QuerySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the active session (if any) and start a new one.
    pub fn begin(&mut self) -> (SessionId, CancellationToken) {
        self.cancel_active();

        self.next += 1;
        let id = SessionId(self.next);
        let token = CancellationToken::new();
        self.active = Some(Active {
            id,
            token: token.clone(),
        });

        (id, token)
    }

    /// Signal the active session's token and forget it. Returns its id.
    pub fn cancel_active(&mut self) -> Option<SessionId> {
        let a = self.active.take()?;
        a.token.cancel();
        Some(a.id)
    }

    pub fn active(&self) -> Option<SessionId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn is_current(&self, id: SessionId) -> bool {
        self.active() == Some(id)
    }

    /// Mark `id` as completed. Returns false (and changes nothing) when `id`
    /// is not the active session.
    pub fn finish(&mut self, id: SessionId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.active = None;
        true
    }
}

impl Drop for QuerySessions {
    fn drop(&mut self) {
        self.cancel_active();
    }
}
