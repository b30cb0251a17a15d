//! # Store
//!
//! Client-side cache of server state, split into one slice per resource.
//!
//! Every async slice operation follows the same contract:
//!
//! - it starts by setting `loading` and clearing `error`
//! - on success it clears `loading` and overwrites the cached snapshot
//! - on failure it clears `loading` and stores the server's message, or a
//!   fixed per-operation fallback, in `error`
//!
//! and returns `Result<_, String>` so the calling view can raise a toast.
//! Nothing is updated optimistically; writes wait for the server response
//! and then merge by id.

pub mod analytics;
pub mod auth;
pub mod error_logs;
pub mod payment_methods;
pub mod retry_config;
pub mod transactions;
pub mod users;

use shared::PagedResponse;
use tracing::warn;

use crate::error::ApiError;
use crate::services::api::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::services::session_storage::SessionStorage;

pub use analytics::AnalyticsState;
pub use auth::AuthState;
pub use error_logs::ErrorLogState;
pub use payment_methods::PaymentMethodState;
pub use retry_config::RetryConfigState;
pub use transactions::TransactionState;
pub use users::UserState;

/// In-flight flag and last error shared by every slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestState {
    pub loading: bool,
    pub error: Option<String>,
}

impl RequestState {
    pub fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Finish a request, recording `fallback` (or the server's message) on
    /// failure
    pub fn settle<T>(&mut self, result: Result<T, ApiError>, fallback: &str) -> Result<T, String> {
        self.loading = false;
        result.map_err(|e| {
            let message = e.user_message(fallback);
            warn!(error = %e, "{}", fallback);
            self.error = Some(message.clone());
            message
        })
    }
}

/// Pagination metadata of the last page fetched
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub is_last: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            total_items: 0,
            total_pages: 0,
            is_last: true,
        }
    }
}

impl Pagination {
    pub fn from_page<T>(page: &PagedResponse<T>) -> Self {
        Self {
            page: page.page,
            size: page.size,
            total_items: page.total_elements,
            total_pages: page.total_pages,
            is_last: page.last,
        }
    }

    pub fn has_next(&self) -> bool {
        !self.is_last
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}

/// Replace the cached entry with the same id, if there is one
pub(crate) fn replace_by_id<T, F>(items: &mut [T], updated: &T, id_of: F) -> bool
where
    T: Clone,
    F: Fn(&T) -> Option<i64>,
{
    let target = id_of(updated);
    match items.iter_mut().find(|item| target.is_some() && id_of(item) == target) {
        Some(item) => {
            *item = updated.clone();
            true
        }
        None => false,
    }
}

/// Root of the client state
#[derive(Debug)]
pub struct Store {
    pub auth: AuthState,
    pub transactions: TransactionState,
    pub payment_methods: PaymentMethodState,
    pub users: UserState,
    pub error_logs: ErrorLogState,
    pub analytics: AnalyticsState,
    pub retry_config: RetryConfigState,
}

impl Store {
    /// Build the initial state; only the auth token is read from storage
    pub fn new(session: &dyn SessionStorage) -> Self {
        Self {
            auth: AuthState::new(session),
            transactions: TransactionState::default(),
            payment_methods: PaymentMethodState::default(),
            users: UserState::default(),
            error_logs: ErrorLogState::default(),
            analytics: AnalyticsState::default(),
            retry_config: RetryConfigState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pagination() {
        let pagination = Pagination::default();
        assert_eq!(pagination.page, 0);
        assert_eq!(pagination.size, 10);
        assert_eq!(pagination.total_items, 0);
        assert!(pagination.is_last);
        assert!(!pagination.has_next());
        assert!(!pagination.has_previous());
    }

    #[test]
    fn test_pagination_from_page() {
        let page = PagedResponse::<i64> {
            content: vec![],
            page: 0,
            size: 10,
            total_elements: 23,
            total_pages: 3,
            last: false,
        };
        let pagination = Pagination::from_page(&page);
        assert_eq!(pagination.total_items, 23);
        assert!(!pagination.is_last);
        assert!(pagination.has_next());
        assert!(!pagination.has_previous());
    }

    #[test]
    fn test_settle_records_fallback() {
        let mut request = RequestState::default();
        request.start();
        assert!(request.loading);

        let result: Result<(), String> = request.settle(
            Err(ApiError::Transport("connection refused".to_string())),
            "Failed to fetch users",
        );
        assert_eq!(result.unwrap_err(), "Failed to fetch users");
        assert!(!request.loading);
        assert_eq!(request.error.as_deref(), Some("Failed to fetch users"));

        request.start();
        assert_eq!(request.error, None);
    }

    #[test]
    fn test_replace_by_id() {
        let mut items = vec![(Some(1), "a"), (Some(2), "b")];
        assert!(replace_by_id(&mut items, &(Some(2), "B"), |item| item.0));
        assert_eq!(items[1].1, "B");
        assert!(!replace_by_id(&mut items, &(Some(3), "c"), |item| item.0));
        assert!(!replace_by_id(&mut items, &(None, "x"), |item| item.0));
    }
}
