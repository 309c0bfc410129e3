//! This module stores the expected format of the arguments for the requests.
//! These are not serializable because they hold secrets, the client builds
//! the request body from them explicitly

use crate::uac::Role;
use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

#[derive(serde::Deserialize, Clone)]
pub struct LoginReqArgs {
    pub email: String,
    pub password: SecretString,
}

#[derive(serde::Deserialize, Clone)]
pub struct RegisterReqArgs {
    pub email: String,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ForgotPasswordReqArgs {
    pub email: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct ResetPasswordReqArgs {
    /// Token from the password reset email
    pub token: SecretString,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(email: S, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }

    pub fn password(mut self, password: SecretString) -> Self {
        self.password = password;
        self
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("email", &self.email)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}

impl Debug for RegisterReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterReqArgs")
            .field("email", &self.email)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("role", &self.role)
            .finish()
    }
}

impl Debug for ResetPasswordReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordReqArgs")
            .field("has_token", &!self.token.expose_secret().is_empty())
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}
