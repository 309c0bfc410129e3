use crate::uac::UserSummary;
use std::sync::Arc;

/// What the client knows about the current session.
///
/// `Uninitialized` means the persisted state has not been read yet, consumers
/// must not treat that as logged out or they will redirect before hydration
/// finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    LoadedEmpty,
    Loaded(Arc<UserSummary>),
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    pub fn user(&self) -> Option<Arc<UserSummary>> {
        match self {
            Self::Loaded(user) => Some(Arc::clone(user)),
            Self::Uninitialized | Self::LoadedEmpty => None,
        }
    }

    /// Returns `None` until the state is ready
    pub fn is_authenticated(&self) -> Option<bool> {
        match self {
            Self::Uninitialized => None,
            Self::LoadedEmpty => Some(false),
            Self::Loaded(_) => Some(true),
        }
    }
}

impl From<Option<UserSummary>> for SessionState {
    fn from(value: Option<UserSummary>) -> Self {
        match value {
            Some(user) => Self::Loaded(Arc::new(user)),
            None => Self::LoadedEmpty,
        }
    }
}
