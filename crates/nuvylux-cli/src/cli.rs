use clap::{Parser, Subcommand};
use nuvylux_shared::uac::Role;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    /// Overrides the backend origin from the configuration files
    #[arg(long)]
    pub base_url: Option<String>,

    /// Overrides the per request timeout from the configuration files
    #[arg(long, value_name = "MILLISECONDS")]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Checks that the backend is reachable
    Health,
    /// Logs in then optionally calls protected endpoints with the new session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "NUVYLUX_PASSWORD", hide_env_values = true)]
        password: String,
        /// Also fetch the current user from the backend
        #[arg(long)]
        me: bool,
        /// Path to GET after logging in (e.g. `/orders`), may be repeated
        #[arg(long = "get", value_name = "PATH", value_parser = parse_api_path)]
        paths: Vec<String>,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "NUVYLUX_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// One of client, architect, brand or admin
        #[arg(long, default_value = "client")]
        role: Role,
    },
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    ResetPassword {
        /// Token from the password reset email
        #[arg(long, env = "NUVYLUX_RESET_TOKEN", hide_env_values = true)]
        token: String,
        #[arg(long, env = "NUVYLUX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Shows the user saved by the last login
    Whoami,
    /// Forgets the saved user and tells the backend to end the session
    Logout,
}

/// Only paths on the configured backend are accepted, never full URLs
fn parse_api_path(value: &str) -> Result<String, String> {
    if value.starts_with('/') && !value.starts_with("//") {
        Ok(value.to_string())
    } else {
        Err(format!(
            "expected a path starting with `/` on the configured backend but found: {value:?}"
        ))
    }
}
