use shared::TransactionStatus;

use crate::app::Dashboard;
use crate::services::api::{TransactionQuery, DEFAULT_PAGE_SIZE};

/// Whose transactions the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionScope {
    /// The logged-in user's transactions
    Own,
    /// Every user's transactions (admin)
    All,
}

/// Paged transaction list with server-side filters
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListView {
    pub scope: TransactionScope,
    pub status_filter: Option<TransactionStatus>,
    /// Only applied in [`TransactionScope::All`]
    pub user_id_filter: Option<i64>,
    pub page: u32,
    pub size: u32,
}

impl TransactionListView {
    pub fn new(scope: TransactionScope) -> Self {
        Self {
            scope,
            status_filter: None,
            user_id_filter: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn query(&self) -> TransactionQuery {
        TransactionQuery {
            status: self.status_filter,
            user_id: match self.scope {
                TransactionScope::All => self.user_id_filter,
                TransactionScope::Own => None,
            },
            page: self.page,
            size: self.size,
        }
    }

    /// Fetch the current page into the transaction slice
    pub async fn load(&self, dashboard: &mut Dashboard) -> Result<(), String> {
        let query = self.query();
        let transactions = &mut dashboard.store.transactions;
        match self.scope {
            TransactionScope::Own => transactions.fetch_user_transactions(&dashboard.api, &query).await,
            TransactionScope::All => transactions.fetch_all_transactions(&dashboard.api, &query).await,
        }
    }

    /// Filter changes always restart from the first page
    pub async fn set_status_filter(
        &mut self,
        dashboard: &mut Dashboard,
        status: Option<TransactionStatus>,
    ) -> Result<(), String> {
        self.status_filter = status;
        self.page = 0;
        self.load(dashboard).await
    }

    pub async fn set_user_filter(&mut self, dashboard: &mut Dashboard, user_id: Option<i64>) -> Result<(), String> {
        self.user_id_filter = user_id;
        self.page = 0;
        self.load(dashboard).await
    }

    pub fn can_go_next(&self, dashboard: &Dashboard) -> bool {
        dashboard.store.transactions.pagination.has_next()
    }

    pub fn can_go_previous(&self, dashboard: &Dashboard) -> bool {
        dashboard.store.transactions.pagination.has_previous()
    }

    /// Returns `Ok(false)` when already on the last page
    pub async fn next_page(&mut self, dashboard: &mut Dashboard) -> Result<bool, String> {
        if !self.can_go_next(dashboard) {
            return Ok(false);
        }
        self.page = dashboard.store.transactions.pagination.page + 1;
        self.load(dashboard).await.map(|_| true)
    }

    pub async fn previous_page(&mut self, dashboard: &mut Dashboard) -> Result<bool, String> {
        if !self.can_go_previous(dashboard) {
            return Ok(false);
        }
        self.page = dashboard.store.transactions.pagination.page - 1;
        self.load(dashboard).await.map(|_| true)
    }
}
