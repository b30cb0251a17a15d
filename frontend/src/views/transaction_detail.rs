use shared::{Transaction, TransactionStatus};
use tracing::debug;

use crate::app::Dashboard;
use crate::router::Route;
use crate::views::report_invalid;
use crate::views::retry_config::RetryConfigForm;

/// Single transaction page, for its owner or for an admin
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDetailView {
    pub id: i64,
    /// Opened from the admin tree; enables retry configuration editing
    pub admin_view: bool,
    pub retry_form: RetryConfigForm,
}

/// Only failed transactions may be retried by hand
pub fn can_retry(transaction: &Transaction) -> bool {
    transaction.status == TransactionStatus::Failed
}

impl TransactionDetailView {
    pub fn new(id: i64, admin_view: bool) -> Self {
        Self {
            id,
            admin_view,
            retry_form: RetryConfigForm::default(),
        }
    }

    pub fn for_route(route: Route) -> Option<Self> {
        match route {
            Route::UserTransactionDetail(id) => Some(Self::new(id, false)),
            Route::AdminTransactionDetail(id) => Some(Self::new(id, true)),
            _ => None,
        }
    }

    /// Fetch the transaction and reseed the retry form from it
    pub async fn load(&mut self, dashboard: &mut Dashboard) -> Result<Transaction, String> {
        let transaction = dashboard
            .store
            .transactions
            .fetch_transaction_by_id(&dashboard.api, self.id)
            .await?;
        self.retry_form = transaction
            .retry_config
            .as_ref()
            .map(RetryConfigForm::from_config)
            .unwrap_or_default();
        Ok(transaction)
    }

    pub fn transaction<'a>(&self, dashboard: &'a Dashboard) -> Option<&'a Transaction> {
        dashboard
            .store
            .transactions
            .current_transaction
            .as_ref()
            .filter(|transaction| transaction.id == self.id)
    }

    pub fn can_retry(&self, dashboard: &Dashboard) -> bool {
        self.transaction(dashboard).is_some_and(can_retry)
    }

    pub fn can_edit_retry_config(&self, dashboard: &Dashboard) -> bool {
        self.admin_view && dashboard.store.auth.is_admin()
    }

    /// Ask the server to retry, then refresh so the new status shows
    pub async fn retry(&mut self, dashboard: &mut Dashboard) -> Result<(), String> {
        if !self.can_retry(dashboard) {
            let message = "Only failed transactions can be retried".to_string();
            dashboard.toaster.error("Retry Failed", message.clone());
            return Err(message);
        }

        match dashboard
            .store
            .transactions
            .retry_transaction(&dashboard.api, self.id)
            .await
        {
            Ok(response) => {
                debug!(id = self.id, message = %response.message, "retry accepted");
                dashboard
                    .toaster
                    .success("Retry Initiated", "The transaction retry has been scheduled.");
                self.load(dashboard).await.map(|_| ())
            }
            Err(error) => {
                dashboard.toaster.error("Retry Failed", error.clone());
                Err(error)
            }
        }
    }

    pub async fn save_retry_config(&mut self, dashboard: &mut Dashboard) -> Result<(), String> {
        if !self.can_edit_retry_config(dashboard) {
            let message = "Only administrators can change retry configuration".to_string();
            dashboard.toaster.error("Update Failed", message.clone());
            return Err(message);
        }
        let request = self
            .retry_form
            .validate()
            .map_err(|e| report_invalid(&mut dashboard.toaster, &e))?;

        match dashboard
            .store
            .retry_config
            .update_transaction_retry_config(&dashboard.api, self.id, &request)
            .await
        {
            Ok(_) => {
                dashboard.toaster.success(
                    "Configuration Updated",
                    "The retry configuration has been updated successfully.",
                );
                self.load(dashboard).await.map(|_| ())
            }
            Err(error) => {
                dashboard.toaster.error("Update Failed", error.clone());
                Err(error)
            }
        }
    }
}
