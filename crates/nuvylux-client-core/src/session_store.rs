use anyhow::Context;
use nuvylux_shared::{log_err_as_warn, session::SessionState, uac::UserSummary};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::watch;
use tracing::{info, warn};

/// Process wide holder of the logged in user.
///
/// Starts out [`SessionState::Uninitialized`] and only becomes ready once
/// [`SessionStore::hydrate`] has run (or a user has been set). If a session
/// file is configured the user is persisted there as RON
#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<SessionState>,
    session_file: Option<PathBuf>,
}

impl SessionStore {
    pub fn new(session_file: Option<PathBuf>) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            state,
            session_file,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// Loads the persisted user if any. Does nothing if the state is already
    /// ready (a login that finished first wins over the file)
    #[tracing::instrument(ret)]
    pub fn hydrate(&self) -> SessionState {
        let loaded: SessionState = match &self.session_file {
            Some(path) => match read_session_file(path) {
                Ok(user) => user.into(),
                Err(err) => {
                    warn!(?err, "discarding unreadable session file");
                    SessionState::LoadedEmpty
                }
            },
            None => SessionState::LoadedEmpty,
        };
        self.state.send_if_modified(|state| {
            if state.is_ready() {
                false
            } else {
                *state = loaded;
                true
            }
        });
        self.state()
    }

    #[tracing::instrument(skip(user), fields(user_id = %user.id))]
    pub fn set_user(&self, user: UserSummary) -> Arc<UserSummary> {
        if let Some(path) = &self.session_file {
            log_err_as_warn!(write_session_file(path, &user));
        }
        let user = Arc::new(user);
        self.state.send_replace(SessionState::Loaded(Arc::clone(&user)));
        user
    }

    /// Returns `true` if there was a user to clear
    #[tracing::instrument]
    pub fn clear(&self) -> bool {
        if let Some(path) = &self.session_file {
            if path.exists() {
                log_err_as_warn!(std::fs::remove_file(path));
            }
        }
        let mut had_user = false;
        self.state.send_if_modified(|state| {
            had_user = matches!(state, SessionState::Loaded(_));
            let changed = had_user || !state.is_ready();
            *state = SessionState::LoadedEmpty;
            changed
        });
        if had_user {
            info!("session cleared");
        }
        had_user
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<Arc<UserSummary>> {
        self.state.borrow().user()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    /// `None` until the state is ready
    pub fn is_authenticated(&self) -> Option<bool> {
        self.state.borrow().is_authenticated()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

fn read_session_file(path: &Path) -> anyhow::Result<Option<UserSummary>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session file: {path:?}"))?;
    let user = ron::from_str(&contents).context("failed to parse session file")?;
    Ok(Some(user))
}

fn write_session_file(path: &Path, user: &UserSummary) -> anyhow::Result<()> {
    let contents = ron::ser::to_string_pretty(user, ron::ser::PrettyConfig::default())
        .context("failed to serialize session")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create folder for session file: {parent:?}"))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write session file: {path:?}"))
}
