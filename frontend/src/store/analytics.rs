use shared::{ErrorCodeCount, TransactionSummary, TransactionTrend};

use crate::services::api::ApiClient;
use crate::store::RequestState;

pub const DEFAULT_TREND_DAYS: u32 = 7;
pub const DEFAULT_ERROR_CODE_LIMIT: u32 = 5;
pub const DEFAULT_SUMMARY_LIMIT: u32 = 10;

/// Aggregates computed by the server for the dashboards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsState {
    pub transaction_trend: Vec<TransactionTrend>,
    /// Percentage in 0..=100
    pub retry_success_rate: Option<f64>,
    pub common_error_codes: Vec<ErrorCodeCount>,
    pub transaction_summaries: Vec<TransactionSummary>,
    pub average_retry_attempts: Option<f64>,
    pub request: RequestState,
}

impl AnalyticsState {
    pub async fn fetch_transaction_trend(&mut self, api: &ApiClient, days: u32) -> Result<(), String> {
        self.request.start();
        let result = api.get_transaction_trend(days).await;
        self.transaction_trend = self.request.settle(result, "Failed to fetch transaction trend")?;
        Ok(())
    }

    pub async fn fetch_retry_success_rate(&mut self, api: &ApiClient) -> Result<f64, String> {
        self.request.start();
        let result = api.get_retry_success_rate().await;
        let rate = self.request.settle(result, "Failed to fetch retry success rate")?;
        self.retry_success_rate = Some(rate);
        Ok(rate)
    }

    pub async fn fetch_common_error_codes(&mut self, api: &ApiClient, limit: u32) -> Result<(), String> {
        self.request.start();
        let result = api.get_most_common_errors(limit).await;
        self.common_error_codes = self.request.settle(result, "Failed to fetch common error codes")?;
        Ok(())
    }

    pub async fn fetch_transaction_summaries(&mut self, api: &ApiClient, limit: u32) -> Result<(), String> {
        self.request.start();
        let result = api.get_transaction_summary(limit).await;
        self.transaction_summaries =
            self.request.settle(result, "Failed to fetch transaction summaries")?;
        Ok(())
    }

    pub async fn fetch_average_retry_attempts(&mut self, api: &ApiClient) -> Result<f64, String> {
        self.request.start();
        let result = api.get_average_attempts_for_success().await;
        let average = self.request.settle(result, "Failed to fetch average retry attempts")?;
        self.average_retry_attempts = Some(average);
        Ok(average)
    }

    /// Sum of the daily totals in the cached trend
    pub fn trend_total(&self) -> u64 {
        self.transaction_trend.iter().map(|day| day.total).sum()
    }
}
