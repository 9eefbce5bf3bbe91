//! Authentication gate of the rental portal.
//!
//! [`jwt`] reads claims, role and username out of the bearer tokens issued by the rental API,
//! [`route`] turns a role into the dashboard the user should land on, and [`session`] keeps a
//! token between runs in whatever store the caller provides.

pub use role::Role;
pub use route::{Route, RoutePaths};

pub mod error;
pub mod jwt;
pub mod role;
pub mod route;
pub mod session;
