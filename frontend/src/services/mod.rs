pub mod api;
pub mod date_utils;
pub mod logging;
pub mod notifications;
pub mod session_storage;
pub mod transport;
