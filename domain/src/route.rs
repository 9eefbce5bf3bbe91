//! Where a user lands after their token has been read.

use crate::role::Role;
use serde::Serialize;
use service::config::{
    Config, DEFAULT_ADMIN_DASHBOARD_PATH, DEFAULT_LANDLORD_DASHBOARD_PATH, DEFAULT_LOGIN_PATH,
    DEFAULT_SEEKER_DASHBOARD_PATH,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    SeekerDashboard,
    LandlordDashboard,
    AdminDashboard,
    Login,
}

impl Route {
    /// Roles without a dashboard, and the absence of a role, both lead to login.
    pub fn for_role(role: Option<&Role>) -> Route {
        match role.map(Role::as_str) {
            Some(Role::SEEKER) => Route::SeekerDashboard,
            Some(Role::LANDLORD) => Route::LandlordDashboard,
            Some(Role::ADMIN) => Route::AdminDashboard,
            _ => Route::Login,
        }
    }

    pub fn is_login(&self) -> bool {
        *self == Route::Login
    }
}

impl fmt::Display for Route {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::SeekerDashboard => write!(fmt, "seeker_dashboard"),
            Route::LandlordDashboard => write!(fmt, "landlord_dashboard"),
            Route::AdminDashboard => write!(fmt, "admin_dashboard"),
            Route::Login => write!(fmt, "login"),
        }
    }
}

/// URL paths for each `Route`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePaths {
    pub login: String,
    pub seeker_dashboard: String,
    pub landlord_dashboard: String,
    pub admin_dashboard: String,
}

impl RoutePaths {
    pub fn path(&self, route: Route) -> &str {
        match route {
            Route::SeekerDashboard => &self.seeker_dashboard,
            Route::LandlordDashboard => &self.landlord_dashboard,
            Route::AdminDashboard => &self.admin_dashboard,
            Route::Login => &self.login,
        }
    }
}

impl Default for RoutePaths {
    fn default() -> Self {
        RoutePaths {
            login: DEFAULT_LOGIN_PATH.to_string(),
            seeker_dashboard: DEFAULT_SEEKER_DASHBOARD_PATH.to_string(),
            landlord_dashboard: DEFAULT_LANDLORD_DASHBOARD_PATH.to_string(),
            admin_dashboard: DEFAULT_ADMIN_DASHBOARD_PATH.to_string(),
        }
    }
}

impl From<&Config> for RoutePaths {
    fn from(config: &Config) -> Self {
        RoutePaths {
            login: config.login_path().to_string(),
            seeker_dashboard: config.seeker_dashboard_path().to_string(),
            landlord_dashboard: config.landlord_dashboard_path().to_string(),
            admin_dashboard: config.admin_dashboard_path().to_string(),
        }
    }
}
