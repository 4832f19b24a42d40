//! Page-level views, one module per route.

pub mod admin;
pub mod dashboard;
pub mod home;
pub mod login;
pub mod payment_result;
pub mod premium;
pub mod register;
pub mod unauthorized;
