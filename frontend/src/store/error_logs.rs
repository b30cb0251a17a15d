use shared::{ErrorCodeCount, ErrorLog};

use crate::services::api::{ApiClient, ErrorLogQuery};
use crate::store::{Pagination, RequestState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorLogState {
    pub error_logs: Vec<ErrorLog>,
    /// Most frequent error codes, for the filter shortcuts
    pub common_error_codes: Vec<ErrorCodeCount>,
    pub pagination: Pagination,
    pub request: RequestState,
}

impl ErrorLogState {
    pub async fn fetch_error_logs(&mut self, api: &ApiClient, query: &ErrorLogQuery) -> Result<(), String> {
        self.request.start();
        let result = api.get_error_logs(query).await;
        let page = self.request.settle(result, "Failed to fetch error logs")?;
        self.pagination = Pagination::from_page(&page);
        self.error_logs = page.content;
        Ok(())
    }

    pub async fn fetch_most_common_error_codes(
        &mut self,
        api: &ApiClient,
        limit: u32,
    ) -> Result<Vec<ErrorCodeCount>, String> {
        self.request.start();
        let result = api.get_most_common_error_codes(limit).await;
        let codes = self.request.settle(result, "Failed to fetch common error codes")?;
        self.common_error_codes = codes.clone();
        Ok(codes)
    }
}
