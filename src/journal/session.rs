/// Who is acting
///
/// Authentication lives outside this crate; the journal only needs to know
/// the current user's id.

use crate::domain::UserId;

pub trait SessionProvider: Send + Sync {
    /// The signed-in user, if any
    fn current_user_id(&self) -> Option<UserId>;
}

/// A session fixed at startup, e.g. from a command line flag
#[derive(Debug, Clone)]
pub struct StaticSession {
    user_id: Option<UserId>,
}

impl StaticSession {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id: Some(user_id) }
    }

    /// A session with nobody signed in
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }
}

impl SessionProvider for StaticSession {
    fn current_user_id(&self) -> Option<UserId> {
        self.user_id.clone()
    }
}
