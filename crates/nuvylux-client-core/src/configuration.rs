use nuvylux_shared::const_config::{
    client::{CLIENT_DEFAULT_BASE_URL, CLIENT_REFRESH_TIMEOUT, CLIENT_REQUEST_TIMEOUT},
    route::{ROUTE_LANDING, ROUTE_LOGIN},
};
use serde_aux::field_attributes::deserialize_number_from_string;
use std::{
    convert::{TryFrom, TryInto},
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    /// Origin of the backend, every request path is appended to it
    pub base_url: String,
    /// Applied to every request, in milliseconds
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_millis: u64,
    /// Upper bound on one call to the refresh endpoint, in milliseconds
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub refresh_timeout_millis: u64,
    /// Where to send the user when the session cannot be refreshed
    pub landing_route: String,
    /// Where to send the user when access is denied
    pub login_route: String,
    /// If set the logged in user is persisted here between runs
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::new(CLIENT_DEFAULT_BASE_URL)
    }
}

impl ClientSettings {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_millis: duration_to_millis(CLIENT_REQUEST_TIMEOUT),
            refresh_timeout_millis: duration_to_millis(CLIENT_REFRESH_TIMEOUT),
            landing_route: ROUTE_LANDING.to_string(),
            login_route: ROUTE_LOGIN.to_string(),
            session_file: None,
        }
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout_millis = duration_to_millis(timeout);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_millis = duration_to_millis(timeout);
        self
    }

    pub fn with_session_file(mut self, session_file: Option<PathBuf>) -> Self {
        self.session_file = session_file;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_millis)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_millis)
    }
}

/// Saturates instead of wrapping for absurdly long durations
fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Loads the settings from the `configuration` folder in the current
/// directory using the environment in `APP_ENVIRONMENT` (default `local`)
pub fn get_configuration() -> anyhow::Result<ClientSettings> {
    let base_path = std::env::current_dir()?;
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;
    Ok(get_configuration_from(
        &base_path.join("configuration"),
        environment,
    )?)
}

/// Layers, lowest priority first: built in defaults, `base.toml`,
/// `{environment}.toml`, then environment variables prefixed with `APP`.
///
/// E.g. `APP_BASE_URL=https://api.nuvylux.com` sets
/// [`ClientSettings::base_url`]
pub fn get_configuration_from(
    configuration_directory: &Path,
    environment: Environment,
) -> Result<ClientSettings, config::ConfigError> {
    let defaults = ClientSettings::default();
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .set_default("base_url", defaults.base_url)?
        .set_default("request_timeout_millis", defaults.request_timeout_millis)?
        .set_default("refresh_timeout_millis", defaults.refresh_timeout_millis)?
        .set_default("landing_route", defaults.landing_route)?
        .set_default("login_route", defaults.login_route)?
        .add_source(config::File::from(configuration_directory.join("base.toml")).required(false))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<ClientSettings>()
}

/// The possible runtime environment for our application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
