//! Stores functionality that should be shared between different clients.
//! Every request to the backend goes through [`Client`], which transparently
//! refreshes an expired session and replays the request.
//! NB: The assumption is made that the tokio runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod client;
pub mod configuration;
mod errors;
mod navigator;
mod session_store;

pub use client::{is_public_route, Client, UiCallBack, NO_ARGUMENT};
pub use configuration::{get_configuration, ClientSettings, Environment};
pub use errors::{GatewayError, RefreshFailed, ResponseFailure};
pub use navigator::{Navigator, TracingNavigator};
pub use session_store::SessionStore;
