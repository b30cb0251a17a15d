//! Page view models.
//!
//! Each view owns its local form state, dispatches slice operations
//! through [`Dashboard`](crate::app::Dashboard), and reports outcomes as
//! toasts. Views never touch the cache directly.

pub mod admin_users;
pub mod auth;
pub mod dashboard;
pub mod error_logs;
pub mod new_transaction;
pub mod payment_methods;
pub mod profile;
pub mod retry_config;
pub mod transaction_detail;
pub mod transactions;
pub mod validation;

use crate::services::notifications::Toaster;
use validation::ValidationError;

/// Raise a toast for rejected input and hand back the message
pub(crate) fn report_invalid(toaster: &mut Toaster, error: &ValidationError) -> String {
    let message = error.to_string();
    toaster.error("Invalid Input", message.clone());
    message
}
