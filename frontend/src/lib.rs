//! Client state layer for the payment retry system dashboard.
//!
//! `store` holds one slice per resource, `services` talks to the backend,
//! `views` turn user input into slice operations and toasts, and `router`
//! decides which page a session may see.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod router;
pub mod services;
pub mod store;
pub mod views;

#[cfg(test)]
pub(crate) mod test_utils;
