use shared::{TransactionStatus, TransactionSummary};

use crate::app::Dashboard;
use crate::services::api::TransactionQuery;
use crate::store::analytics::{DEFAULT_ERROR_CODE_LIMIT, DEFAULT_TREND_DAYS};

pub const RECENT_TRANSACTIONS: u32 = 5;

/// Status tallies shown on the user dashboard cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub successful: usize,
    pub failed: usize,
    pub pending: usize,
    /// Scheduled plus in progress
    pub retrying: usize,
}

impl StatusCounts {
    pub fn from_summaries(summaries: &[TransactionSummary]) -> Self {
        summaries.iter().fold(Self::default(), |mut counts, summary| {
            match summary.status {
                TransactionStatus::Success => counts.successful += 1,
                TransactionStatus::Failed => counts.failed += 1,
                TransactionStatus::Pending => counts.pending += 1,
                TransactionStatus::RetryScheduled | TransactionStatus::RetryInProgress => {
                    counts.retrying += 1
                }
            }
            counts
        })
    }
}

/// Run every loader even if an earlier one failed; report the first error
fn first_error(results: impl IntoIterator<Item = Result<(), String>>) -> Result<(), String> {
    results.into_iter().find(|result| result.is_err()).unwrap_or(Ok(()))
}

/// Landing page for regular users
pub struct UserDashboardView;

impl UserDashboardView {
    pub async fn load(dashboard: &mut Dashboard) -> Result<(), String> {
        let summaries = dashboard
            .store
            .analytics
            .fetch_transaction_summaries(&dashboard.api, RECENT_TRANSACTIONS)
            .await;
        let methods = dashboard
            .store
            .payment_methods
            .fetch_payment_methods(&dashboard.api)
            .await;
        first_error([summaries, methods])
    }

    pub fn status_counts(dashboard: &Dashboard) -> StatusCounts {
        StatusCounts::from_summaries(&dashboard.store.analytics.transaction_summaries)
    }
}

/// Landing page for admins
pub struct AdminDashboardView;

impl AdminDashboardView {
    pub async fn load(dashboard: &mut Dashboard) -> Result<(), String> {
        let api = &dashboard.api;
        let analytics = &mut dashboard.store.analytics;
        let trend = analytics.fetch_transaction_trend(api, DEFAULT_TREND_DAYS).await;
        let rate = analytics.fetch_retry_success_rate(api).await.map(|_| ());
        let errors = analytics
            .fetch_common_error_codes(api, DEFAULT_ERROR_CODE_LIMIT)
            .await;
        let attempts = analytics.fetch_average_retry_attempts(api).await.map(|_| ());

        let recent = TransactionQuery {
            size: RECENT_TRANSACTIONS,
            ..TransactionQuery::default()
        };
        let latest = dashboard
            .store
            .transactions
            .fetch_all_transactions(api, &recent)
            .await;

        first_error([trend, rate, errors, attempts, latest])
    }

    pub fn trend_total(dashboard: &Dashboard) -> u64 {
        dashboard.store.analytics.trend_total()
    }
}
