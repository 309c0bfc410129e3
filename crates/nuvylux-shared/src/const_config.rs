//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

use std::time::Duration;

pub mod client {
    use super::*;

    pub const CLIENT_DEFAULT_BASE_URL: &str = "http://localhost:4000";
    /// Applied to every request sent by the transport
    pub const CLIENT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    /// Upper bound on a single call to the refresh endpoint. Every request
    /// queued behind the refresh waits at most this long
    pub const CLIENT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Front end routes used for navigation decisions
pub mod route {
    pub const ROUTE_LANDING: &str = "/";
    pub const ROUTE_LOGIN: &str = "/auth/login";
    pub const ROUTE_ONBOARDING: &str = "/onboarding";
    pub const ROUTE_DASHBOARD_CLIENT: &str = "/dashboard/client";
    pub const ROUTE_DASHBOARD_ARCHITECT: &str = "/dashboard/architect";
    pub const ROUTE_DASHBOARD_BRAND: &str = "/dashboard/brand";
    pub const ROUTE_ADMIN: &str = "/admin";
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_AUTH_FORGOT_PASSWORD: PathSpec = PathSpec::post("/auth/forgot-password");
    pub const PATH_AUTH_LOGIN: PathSpec = PathSpec::post("/auth/login");
    pub const PATH_AUTH_LOGOUT: PathSpec = PathSpec::post("/auth/logout");
    pub const PATH_AUTH_ME: PathSpec = PathSpec::get("/auth/me");
    pub const PATH_AUTH_REFRESH: PathSpec = PathSpec::post("/auth/refresh");
    pub const PATH_AUTH_REGISTER: PathSpec = PathSpec::post("/auth/register");
    pub const PATH_AUTH_RESET_PASSWORD: PathSpec = PathSpec::post("/auth/reset-password");
    pub const PATH_HEALTH_CHECK: PathSpec = PathSpec::get("/health");

    /// Endpoints reachable without a session. A 401 from any path containing
    /// one of these is a credential error and must never trigger a refresh
    pub const PATH_PUBLIC_PREFIXES: &[&str] = &[
        "/auth/login",
        "/auth/register",
        "/auth/forgot-password",
        "/auth/reset-password",
        "/auth/verify-email",
    ];
}
