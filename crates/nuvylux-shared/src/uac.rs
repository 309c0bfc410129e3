//! Shared items related to user account control

mod responses;
mod role;
mod user;

pub use responses::{ApiErrorBody, ErrorMessage, LoginResponse, MessageResponse};
pub use role::Role;
pub use user::{Email, UserSummary};
