use futures::channel::oneshot;
use nuvylux_shared::{
    const_config::path::{
        PATH_AUTH_FORGOT_PASSWORD, PATH_AUTH_LOGIN, PATH_AUTH_LOGOUT, PATH_AUTH_ME,
        PATH_AUTH_REGISTER, PATH_AUTH_RESET_PASSWORD,
    },
    req_args::{ForgotPasswordReqArgs, LoginReqArgs, RegisterReqArgs, ResetPasswordReqArgs},
    uac::{LoginResponse, MessageResponse, UserSummary},
};
use secrecy::ExposeSecret as _;
use std::sync::Arc;

use crate::{
    client::{process_json_body, UiCallBack, NO_ARGUMENT},
    Client, GatewayError,
};

impl Client {
    /// Stores the returned user in the session on success
    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F: UiCallBack>(
        &self,
        args: LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Arc<UserSummary>>> {
        let args = serde_json::json!({
            "email": args.email,
            "password": args.password.expose_secret(),
        });
        self.spawn_request(
            PATH_AUTH_LOGIN,
            &args,
            |client, response| async move {
                let login_response: LoginResponse = process_json_body(response).await?;
                anyhow::Ok(client.inner.session.set_user(login_response.user))
            },
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn register<F: UiCallBack>(
        &self,
        args: RegisterReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<MessageResponse>> {
        let args = serde_json::json!({
            "email": args.email,
            "password": args.password.expose_secret(),
            "firstName": args.first_name,
            "lastName": args.last_name,
            "role": args.role,
        });
        self.send_request_expect_json(PATH_AUTH_REGISTER, &args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn forgot_password<F: UiCallBack>(
        &self,
        args: ForgotPasswordReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<MessageResponse>> {
        self.send_request_expect_json(PATH_AUTH_FORGOT_PASSWORD, &args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn reset_password<F: UiCallBack>(
        &self,
        args: ResetPasswordReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<MessageResponse>> {
        let args = serde_json::json!({
            "token": args.token.expose_secret(),
            "password": args.password.expose_secret(),
        });
        self.send_request_expect_json(PATH_AUTH_RESET_PASSWORD, &args, ui_notify)
    }

    /// Asks the backend who is logged in and updates the session to match.
    /// A rejected session leaves the session cleared
    #[tracing::instrument(skip(ui_notify))]
    pub fn fetch_current_user<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Arc<UserSummary>>> {
        self.spawn_request(
            PATH_AUTH_ME,
            NO_ARGUMENT,
            |client, response| async move {
                match process_json_body::<UserSummary>(response).await {
                    Ok(user) => Ok(client.inner.session.set_user(user)),
                    Err(err) => {
                        if is_unauthenticated(&err) {
                            client.inner.session.clear();
                        }
                        Err(err)
                    }
                }
            },
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn logout<F: UiCallBack>(&self, ui_notify: F) -> oneshot::Receiver<anyhow::Result<()>> {
        self.clear_user_info(); // Clear user info even if logout fails
        self.send_request_expect_empty(PATH_AUTH_LOGOUT, NO_ARGUMENT, ui_notify)
    }

    #[tracing::instrument]
    pub fn logout_no_wait(&self) {
        self.clear_user_info(); // Clear user info even if logout fails
        self.send_request_no_wait(PATH_AUTH_LOGOUT, NO_ARGUMENT);
    }

    fn clear_user_info(&self) {
        self.inner.session.clear();
    }
}

/// The backend no longer recognizes the session (as opposed to a network
/// failure where the last known user is kept)
fn is_unauthenticated(err: &anyhow::Error) -> bool {
    err.downcast_ref::<GatewayError>()
        .and_then(GatewayError::status)
        .is_some_and(|status| status == reqwest::StatusCode::UNAUTHORIZED)
}
