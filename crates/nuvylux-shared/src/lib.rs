//! Code shared between the different Nuvylux clients

#![warn(unused_crate_dependencies)]

pub mod const_config;
pub mod errors;
mod macros;
pub mod req_args;
pub mod session;
pub mod uac;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
