use crate::app::Dashboard;
use crate::services::api::{ErrorLogQuery, DEFAULT_PAGE_SIZE};
use crate::store::analytics::DEFAULT_ERROR_CODE_LIMIT;
use crate::views::report_invalid;
use crate::views::validation::{optional_date, ValidationError};

/// Raw filter inputs; blank fields mean "no filter"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorLogFilters {
    pub error_code: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
}

impl ErrorLogFilters {
    pub fn to_query(&self, page: u32, size: u32) -> Result<ErrorLogQuery, ValidationError> {
        let start = optional_date("Start date", &self.start_date)?;
        let end = optional_date("End date", &self.end_date)?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ValidationError::DateRangeReversed);
            }
        }

        let error_code = self.error_code.trim();
        Ok(ErrorLogQuery {
            error_code: (!error_code.is_empty()).then(|| error_code.to_string()),
            start_date: start.map(|date| date.format("%Y-%m-%d").to_string()),
            end_date: end.map(|date| date.format("%Y-%m-%d").to_string()),
            page,
            size,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorLogView {
    pub filters: ErrorLogFilters,
    pub page: u32,
    pub size: u32,
}

impl Default for ErrorLogView {
    fn default() -> Self {
        Self {
            filters: ErrorLogFilters::default(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ErrorLogView {
    pub async fn load(&self, dashboard: &mut Dashboard) -> Result<(), String> {
        let query = self
            .filters
            .to_query(self.page, self.size)
            .map_err(|e| report_invalid(&mut dashboard.toaster, &e))?;
        dashboard
            .store
            .error_logs
            .fetch_error_logs(&dashboard.api, &query)
            .await
    }

    /// Apply new filters: back to page 0, plus a refresh of the top codes
    pub async fn apply_filters(&mut self, dashboard: &mut Dashboard, filters: ErrorLogFilters) -> Result<(), String> {
        filters
            .to_query(0, self.size)
            .map_err(|e| report_invalid(&mut dashboard.toaster, &e))?;
        self.filters = filters;
        self.page = 0;
        self.load(dashboard).await?;
        dashboard
            .store
            .error_logs
            .fetch_most_common_error_codes(&dashboard.api, DEFAULT_ERROR_CODE_LIMIT)
            .await
            .map(|_| ())
    }

    pub async fn go_to_page(&mut self, dashboard: &mut Dashboard, page: u32) -> Result<(), String> {
        self.page = page;
        self.load(dashboard).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{client_with, paged_json, sample_error_log, MockTransport};
    use serde_json::json;
    use std::sync::Arc;

    fn filters(code: &str, start: &str, end: &str) -> ErrorLogFilters {
        ErrorLogFilters {
            error_code: code.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test]
    fn test_blank_filters_are_omitted() {
        let query = ErrorLogFilters::default().to_query(0, 10).unwrap();
        assert_eq!(query, ErrorLogQuery::default());
    }

    #[test]
    fn test_date_validation() {
        assert_eq!(
            filters("", "2025-02-01", "2025-01-01").to_query(0, 10),
            Err(ValidationError::DateRangeReversed)
        );
        assert!(matches!(
            filters("", "01/02/2025", "").to_query(0, 10),
            Err(ValidationError::InvalidDate { field: "Start date", .. })
        ));
        assert!(filters("", "2025-01-01", "2025-01-01").to_query(0, 10).is_ok());
    }

    #[tokio::test]
    async fn test_apply_filters_refetches_page_zero_and_common_codes() {
        let transport = Arc::new(MockTransport::new());
        let logs = vec![sample_error_log(1, 4, "INSUFFICIENT_FUNDS")];
        transport.respond_json(200, paged_json(&logs, 0, 10, 1, 1, true));
        transport.respond_json(200, json!([{"errorCode": "INSUFFICIENT_FUNDS", "count": 9}]));
        let (api, _session) = client_with(transport.clone());
        let mut dashboard = Dashboard::new(api);

        let mut view = ErrorLogView {
            page: 3,
            ..ErrorLogView::default()
        };
        view.apply_filters(&mut dashboard, filters(" INSUFFICIENT_FUNDS ", "2025-01-01", ""))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].query_value("page"), Some("0"));
        assert_eq!(requests[0].query_value("errorCode"), Some("INSUFFICIENT_FUNDS"));
        assert_eq!(requests[0].query_value("endDate"), None);
        assert_eq!(requests[1].path, "/api/error-logs/common");
        assert_eq!(requests[1].query_value("limit"), Some("5"));
        assert_eq!(dashboard.store.error_logs.error_logs, logs);
        assert_eq!(dashboard.store.error_logs.common_error_codes.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_filters_keep_previous() {
        let transport = Arc::new(MockTransport::new());
        let (api, _session) = client_with(transport.clone());
        let mut dashboard = Dashboard::new(api);

        let mut view = ErrorLogView::default();
        let result = view
            .apply_filters(&mut dashboard, filters("", "2025-03-01", "2025-02-01"))
            .await;

        assert!(result.is_err());
        assert_eq!(view.filters, ErrorLogFilters::default());
        assert!(transport.requests().is_empty());
        assert_eq!(transport.pending_responses(), 0);
    }
}
