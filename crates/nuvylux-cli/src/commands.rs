use anyhow::Context as _;
use futures::channel::oneshot;
use nuvylux_client_core::{get_configuration, Client, ClientSettings, NO_ARGUMENT};
use nuvylux_shared::{
    const_config::path::PathSpec,
    req_args::{ForgotPasswordReqArgs, LoginReqArgs, RegisterReqArgs, ResetPasswordReqArgs},
    uac::UserSummary,
};
use reqwest::Method;
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::{Cli, Command};

/// Nothing to repaint on the command line
fn no_cb() {}

async fn recv<T>(rx: oneshot::Receiver<anyhow::Result<T>>) -> anyhow::Result<T> {
    rx.await
        .context("request task ended without sending a result")?
}

/// Command line flags win over the configuration files
fn apply_overrides(mut settings: ClientSettings, cli: &Cli) -> ClientSettings {
    if let Some(base_url) = &cli.base_url {
        settings.base_url.clone_from(base_url);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        settings = settings.with_request_timeout(Duration::from_millis(timeout_ms));
    }
    settings
}

fn print_user(user: &UserSummary) {
    println!("{} <{}> ({})", user.display_name(), user.email, user.role);
}

#[tracing::instrument(skip_all)]
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = apply_overrides(
        get_configuration().context("failed to read configuration")?,
        &cli,
    );
    info!(base_url = %settings.base_url, "starting");
    let client = Client::new(settings)?;
    client.session().hydrate();

    match cli.command {
        Command::Health => {
            recv(client.health_check(no_cb)).await?;
            println!("Backend is up");
        }
        Command::Login {
            email,
            password,
            me,
            paths,
        } => {
            let user = recv(client.login(LoginReqArgs::new(email, password.into()), no_cb)).await?;
            print!("Logged in as ");
            print_user(&user);
            println!("Next route: {}", user.post_login_route());
            if me {
                let current = recv(client.fetch_current_user(no_cb)).await?;
                print!("Backend reports ");
                print_user(&current);
            }
            for path in paths {
                let body: serde_json::Value = recv(client.send_request_expect_json(
                    PathSpec::new(Method::GET, path),
                    NO_ARGUMENT,
                    no_cb,
                ))
                .await?;
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
        }
        Command::Register {
            email,
            password,
            first_name,
            last_name,
            role,
        } => {
            let args = RegisterReqArgs {
                email,
                password: password.into(),
                first_name,
                last_name,
                role,
            };
            let response = recv(client.register(args, no_cb)).await?;
            println!("{}", response.message);
        }
        Command::ForgotPassword { email } => {
            let response =
                recv(client.forgot_password(ForgotPasswordReqArgs { email }, no_cb)).await?;
            println!("{}", response.message);
        }
        Command::ResetPassword { token, password } => {
            let args = ResetPasswordReqArgs {
                token: token.into(),
                password: password.into(),
            };
            let response = recv(client.reset_password(args, no_cb)).await?;
            println!("{}", response.message);
        }
        Command::Whoami => match client.require_user() {
            Ok(user) => print_user(&user),
            Err(err) => println!("{err}"),
        },
        Command::Logout => {
            // The saved user is cleared even if the backend cannot be reached
            if let Err(err) = recv(client.logout(no_cb)).await {
                warn!(?err, "backend logout failed");
                eprintln!("Backend logout failed: {err}");
            }
            println!("Logged out");
        }
    }
    Ok(())
}
