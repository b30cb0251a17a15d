use shared::{RetryConfig, RetryConfigRequest};

use crate::services::api::ApiClient;
use crate::store::RequestState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryConfigState {
    pub global_config: Option<RetryConfig>,
    pub request: RequestState,
}

impl RetryConfigState {
    pub async fn fetch_global_retry_config(&mut self, api: &ApiClient) -> Result<RetryConfig, String> {
        self.request.start();
        let result = api.get_global_retry_config().await;
        let config = self.request.settle(result, "Failed to fetch global retry config")?;
        self.global_config = Some(config.clone());
        Ok(config)
    }

    pub async fn update_global_retry_config(
        &mut self,
        api: &ApiClient,
        config: &RetryConfigRequest,
    ) -> Result<RetryConfig, String> {
        self.request.start();
        let result = api.update_global_retry_config(config).await;
        let updated = self.request.settle(result, "Failed to update global retry config")?;
        self.global_config = Some(updated.clone());
        Ok(updated)
    }

    /// The transaction's own copy is refreshed by refetching the transaction
    pub async fn update_transaction_retry_config(
        &mut self,
        api: &ApiClient,
        transaction_id: i64,
        config: &RetryConfigRequest,
    ) -> Result<RetryConfig, String> {
        self.request.start();
        let result = api.update_transaction_retry_config(transaction_id, config).await;
        self.request
            .settle(result, "Failed to update transaction retry config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::RetryStrategy;
    use std::sync::Arc;

    use crate::test_utils::{client_with, MockTransport};

    fn request() -> RetryConfigRequest {
        RetryConfigRequest {
            max_retries: 4,
            retry_interval: 90,
            strategy: RetryStrategy::Fixed,
        }
    }

    #[tokio::test]
    async fn test_update_global_replaces_cache() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(
            200,
            json!({"id": 1, "maxRetries": 3, "retryInterval": 60, "strategy": "EXPONENTIAL"}),
        );
        transport.respond_json(
            200,
            json!({"id": 1, "maxRetries": 4, "retryInterval": 90, "strategy": "FIXED"}),
        );
        let (api, _session) = client_with(transport);

        let mut state = RetryConfigState::default();
        let fetched = state.fetch_global_retry_config(&api).await.unwrap();
        assert_eq!(fetched.strategy, RetryStrategy::Exponential);

        state.update_global_retry_config(&api, &request()).await.unwrap();
        let cached = state.global_config.unwrap();
        assert_eq!(cached.max_retries, 4);
        assert_eq!(cached.strategy, RetryStrategy::Fixed);
    }

    #[tokio::test]
    async fn test_transaction_update_leaves_global_untouched() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(
            200,
            json!({"maxRetries": 4, "retryInterval": 90, "strategy": "FIXED"}),
        );
        let (api, _session) = client_with(transport);

        let mut state = RetryConfigState::default();
        state
            .update_transaction_retry_config(&api, 12, &request())
            .await
            .unwrap();
        assert_eq!(state.global_config, None);
        assert!(!state.request.loading);
    }

    #[tokio::test]
    async fn test_update_failure_message() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(400, json!({"message": "Max retries must be between 1 and 10"}));
        let (api, _session) = client_with(transport);

        let mut state = RetryConfigState::default();
        let error = state
            .update_global_retry_config(&api, &request())
            .await
            .unwrap_err();
        assert_eq!(error, "Max retries must be between 1 and 10");
        assert_eq!(state.request.error.as_deref(), Some(error.as_str()));
    }
}
