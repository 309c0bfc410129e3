use crate::const_config::route::{
    ROUTE_ADMIN, ROUTE_DASHBOARD_ARCHITECT, ROUTE_DASHBOARD_BRAND, ROUTE_DASHBOARD_CLIENT,
};

/// The kind of account. Only used to decide where to navigate, the backend
/// enforces what each role may do
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum Role {
    #[strum(serialize = "client")]
    Client,
    /// Shown to users as "architect"
    #[strum(serialize = "architect")]
    Professional,
    #[strum(serialize = "brand")]
    Brand,
    #[strum(serialize = "admin")]
    Admin,
}

impl Role {
    pub fn dashboard_route(&self) -> &'static str {
        match self {
            Role::Client => ROUTE_DASHBOARD_CLIENT,
            Role::Professional => ROUTE_DASHBOARD_ARCHITECT,
            Role::Brand => ROUTE_DASHBOARD_BRAND,
            Role::Admin => ROUTE_ADMIN,
        }
    }

    /// Returns `true` if the role is [`Admin`].
    ///
    /// [`Admin`]: Role::Admin
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}
