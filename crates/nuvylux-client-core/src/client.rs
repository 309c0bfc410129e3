use anyhow::{bail, Context};
use futures::channel::oneshot;
use nuvylux_shared::{
    const_config::path::{PathSpec, PATH_AUTH_REFRESH, PATH_HEALTH_CHECK},
    errors::NotLoggedInError,
    uac::UserSummary,
};
use reqwest::Method;
use std::{fmt::Debug, future::Future, sync::Arc, time::Duration};
use tracing::{debug, info, warn, Instrument as _};

use crate::{
    ClientSettings, GatewayError, Navigator, RefreshFailed, ResponseFailure, SessionStore,
    TracingNavigator,
};
use coordinator::{classify, Disposition, RefreshCoordinator, Settled};

pub mod api;
mod coordinator;
mod public_routes;

pub use public_routes::is_public_route;

/// Argument to pass when an endpoint takes no arguments
pub const NO_ARGUMENT: &() = &();

/// Entry point for every call to the backend.
///
/// Cheap to clone, all clones share the same cookie store, session state and
/// refresh coordinator
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    base_url: String,
    refresh_timeout: Duration,
    landing_route: String,
    login_route: String,
    session: SessionStore,
    coordinator: RefreshCoordinator,
    navigator: Arc<dyn Navigator>,
}

/// Everything needed to send (and resend) a request
#[derive(Debug, Clone)]
struct RequestDescriptor {
    path_spec: PathSpec,
    payload: serde_json::Value,
    /// Set once a refresh has been attempted for this request
    retried: bool,
}

impl RequestDescriptor {
    fn new<T: serde::Serialize>(path_spec: PathSpec, args: &T) -> Result<Self, GatewayError> {
        Ok(Self {
            path_spec,
            payload: serde_json::to_value(args)?,
            retried: false,
        })
    }
}

/// The refresh endpoint may send back the user, nothing else is used
#[derive(Debug, Default, serde::Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    user: Option<UserSummary>,
}

impl Client {
    pub fn new(settings: ClientSettings) -> anyhow::Result<Self> {
        Self::with_navigator(settings, Arc::new(TracingNavigator))
    }

    #[tracing::instrument(name = "NEW CLIENT-CORE", skip(navigator))]
    pub fn with_navigator(
        settings: ClientSettings,
        navigator: Arc<dyn Navigator>,
    ) -> anyhow::Result<Self> {
        let base_url = reqwest::Url::parse(&settings.base_url)
            .with_context(|| format!("invalid base url: {:?}", settings.base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("base url must use http or https but found: {base_url}");
        }
        if settings.request_timeout().is_zero() || settings.refresh_timeout().is_zero() {
            bail!(
                "timeouts must be at least 1ms but found request: {:?} and refresh: {:?}",
                settings.request_timeout(),
                settings.refresh_timeout()
            );
        }
        let api_client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(settings.request_timeout())
            .build()
            .context("unable to create reqwest client")?;
        Ok(Self {
            api_client,
            inner: Arc::new(ClientInner {
                base_url: settings.base_url.trim_end_matches('/').to_string(),
                refresh_timeout: settings.refresh_timeout(),
                landing_route: settings.landing_route,
                login_route: settings.login_route,
                session: SessionStore::new(settings.session_file),
                coordinator: RefreshCoordinator::default(),
                navigator,
            }),
        })
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn health_check<F>(&self, ui_notify: F) -> oneshot::Receiver<anyhow::Result<()>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_empty(PATH_HEALTH_CHECK, NO_ARGUMENT, ui_notify)
    }

    /// Sends `args` as the query string for GET and as a JSON body otherwise
    #[tracing::instrument(skip(args, ui_notify))]
    pub fn send_request_expect_json<F, T, U>(
        &self,
        path_spec: PathSpec,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<U>>
    where
        T: serde::Serialize,
        F: UiCallBack,
        U: Send + Debug + serde::de::DeserializeOwned + 'static,
    {
        self.spawn_request(
            path_spec,
            args,
            |_, response| process_json_body(response),
            ui_notify,
        )
    }

    #[tracing::instrument(skip(args, ui_notify))]
    pub fn send_request_expect_empty<F, T>(
        &self,
        path_spec: PathSpec,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>>
    where
        T: serde::Serialize,
        F: UiCallBack,
    {
        self.spawn_request(
            path_spec,
            args,
            |_, response| process_empty(response),
            ui_notify,
        )
    }

    fn send_request_no_wait<T>(&self, path_spec: PathSpec, args: &T)
    where
        T: serde::Serialize,
    {
        let _ = self.spawn_request(
            path_spec,
            args,
            |_, response| process_empty(response),
            || {},
        );
    }

    // WARNING: Must skip args as it may contain sensitive info and "safe"
    // versions would usually already be logged by the caller
    fn spawn_request<T, P, Fut, O, F>(
        &self,
        path_spec: PathSpec,
        args: &T,
        process: P,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<O>>
    where
        T: serde::Serialize,
        P: FnOnce(Client, Result<reqwest::Response, GatewayError>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send,
        O: Send + 'static,
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let request = RequestDescriptor::new(path_spec, args);
        let client = self.clone();
        let task = async move {
            let response = match request {
                Ok(request) => client.execute(request).await,
                Err(err) => Err(err),
            };
            let msg = process(client, response).await;
            if tx.send(msg).is_err() {
                debug!("receiver dropped before the response was processed");
            }
            ui_notify();
        };
        tokio::spawn(task.in_current_span());
        rx
    }

    /// Sends the request and recovers from an expired session if possible.
    ///
    /// Only responses with a client or server error status are inspected,
    /// everything else is returned to the caller as is
    #[tracing::instrument(skip(self, request), fields(path = %request.path_spec))]
    async fn execute(
        &self,
        mut request: RequestDescriptor,
    ) -> Result<reqwest::Response, GatewayError> {
        loop {
            let response = self.send_once(&request).await?;
            let status = response.status();
            if !status.is_client_error() && !status.is_server_error() {
                return Ok(response);
            }
            let failure = ResponseFailure::from_response(response).await;
            match classify(&request.path_spec.path, request.retried, &failure) {
                Disposition::Propagate => return Err(GatewayError::Status(failure)),
                Disposition::EndSession => {
                    warn!(status = %failure.status, "authorization denied, ending session");
                    self.end_session(&self.inner.login_route);
                    return Err(GatewayError::Forbidden(failure));
                }
                Disposition::RefreshAndReplay => {
                    request.retried = true;
                    // The session must be gone before any queued request
                    // sees the failure
                    let Settled { outcome, led } = self
                        .inner
                        .coordinator
                        .refresh_once(
                            || self.call_refresh(),
                            |err| {
                                warn!(?err, "session refresh failed, ending session");
                                self.end_session(&self.inner.landing_route);
                            },
                        )
                        .await;
                    debug!(led, refreshed = outcome.is_ok(), "refresh settled");
                    if let Err(err) = outcome {
                        return Err(GatewayError::SessionExpired(err));
                    }
                    debug!("session refreshed, replaying request");
                }
            }
        }
    }

    async fn send_once(
        &self,
        request: &RequestDescriptor,
    ) -> Result<reqwest::Response, GatewayError> {
        let PathSpec { path, method } = &request.path_spec;
        let builder = self
            .api_client
            .request(method.clone(), self.path_to_url(path));
        let builder = match &request.payload {
            serde_json::Value::Null => builder,
            payload if *method == Method::GET => builder.query(payload),
            payload => builder.json(payload),
        };
        Ok(builder.send().await?)
    }

    /// Bounded by the refresh timeout so a stuck refresh cannot hold the
    /// queue forever
    #[tracing::instrument(skip(self))]
    async fn call_refresh(&self) -> Result<(), RefreshFailed> {
        let refresh_timeout = self.inner.refresh_timeout;
        let request = self
            .api_client
            .request(
                PATH_AUTH_REFRESH.method,
                self.path_to_url(&PATH_AUTH_REFRESH.path),
            )
            .send();
        let response = match tokio::time::timeout(refresh_timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(RefreshFailed::Transport(err.to_string())),
            Err(_elapsed) => return Err(RefreshFailed::TimedOut(refresh_timeout)),
        };
        let status = response.status();
        if !status.is_success() {
            return Err(RefreshFailed::Rejected(status));
        }
        match response.json::<RefreshResponse>().await {
            Ok(RefreshResponse { user: Some(user) }) => {
                self.inner.session.set_user(user);
            }
            Ok(RefreshResponse { user: None }) => {}
            Err(err) => debug!(?err, "refresh response did not include a user"),
        }
        info!("session refreshed");
        Ok(())
    }

    fn end_session(&self, route: &str) {
        self.inner.session.clear();
        self.inner.navigator.hard_redirect(route);
    }

    #[tracing::instrument(skip(self), ret)]
    fn path_to_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.inner.base_url)
        } else {
            format!("{}/{path}", self.inner.base_url)
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn user_info(&self) -> Option<Arc<UserSummary>> {
        self.inner.session.user()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_info().is_some()
    }

    /// For callers that cannot go on without a user
    pub fn require_user(&self) -> Result<Arc<UserSummary>, NotLoggedInError> {
        self.user_info().ok_or(NotLoggedInError)
    }

    pub fn is_refresh_in_flight(&self) -> bool {
        self.inner.coordinator.is_refresh_in_flight()
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_empty(response: Result<reqwest::Response, GatewayError>) -> anyhow::Result<()> {
    response?;
    Ok(())
}

#[tracing::instrument(ret, err(Debug))]
async fn process_json_body<T>(
    response: Result<reqwest::Response, GatewayError>,
) -> anyhow::Result<T>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let response = response?;
    Ok(response
        .json()
        .await
        .context("failed to parse result as json")?)
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}
