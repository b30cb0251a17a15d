use shared::{RetryConfig, RetryConfigRequest, RetryStrategy};

use crate::app::Dashboard;
use crate::views::report_invalid;
use crate::views::validation::{parse_number, ValidationError};

pub const MIN_RETRIES: u32 = 1;
pub const MAX_RETRIES: u32 = 10;
/// Retry interval floor, in seconds
pub const MIN_RETRY_INTERVAL_SECS: u64 = 30;

/// Explanation shown next to the strategy picker. The schedule itself is
/// computed by the server.
pub fn strategy_description(strategy: RetryStrategy) -> &'static str {
    match strategy {
        RetryStrategy::Fixed => {
            "Fixed Interval: retries happen at a constant interval. With a 60 second \
             interval, each retry runs 60 seconds after the previous attempt."
        }
        RetryStrategy::Exponential => {
            "Exponential Backoff: the wait between retries grows after every attempt, \
             e.g. 60, 120, then 240 seconds."
        }
    }
}

/// Edit form for a retry configuration, global or per transaction
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfigForm {
    pub max_retries: String,
    /// Seconds
    pub retry_interval: String,
    pub strategy: RetryStrategy,
}

impl Default for RetryConfigForm {
    fn default() -> Self {
        Self {
            max_retries: "3".to_string(),
            retry_interval: "60".to_string(),
            strategy: RetryStrategy::Exponential,
        }
    }
}

impl RetryConfigForm {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries.to_string(),
            retry_interval: config.retry_interval.to_string(),
            strategy: config.strategy,
        }
    }

    pub fn validate(&self) -> Result<RetryConfigRequest, ValidationError> {
        let max_retries: u32 = parse_number("Maximum retries", &self.max_retries)?;
        if max_retries < MIN_RETRIES {
            return Err(ValidationError::TooSmall {
                field: "Maximum retries",
                min: MIN_RETRIES.to_string(),
            });
        }
        if max_retries > MAX_RETRIES {
            return Err(ValidationError::TooLarge {
                field: "Maximum retries",
                max: MAX_RETRIES.to_string(),
            });
        }

        let retry_interval: u64 = parse_number("Retry interval", &self.retry_interval)?;
        if retry_interval < MIN_RETRY_INTERVAL_SECS {
            return Err(ValidationError::TooSmall {
                field: "Retry interval",
                min: format!("{} seconds", MIN_RETRY_INTERVAL_SECS),
            });
        }

        Ok(RetryConfigRequest {
            max_retries,
            retry_interval,
            strategy: self.strategy,
        })
    }

    pub fn strategy_description(&self) -> &'static str {
        strategy_description(self.strategy)
    }
}

/// Admin page for the global retry configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalRetryConfigView {
    pub form: RetryConfigForm,
}

impl GlobalRetryConfigView {
    /// Fetch the global configuration and seed the form from it
    pub async fn load(&mut self, dashboard: &mut Dashboard) -> Result<RetryConfig, String> {
        let config = dashboard
            .store
            .retry_config
            .fetch_global_retry_config(&dashboard.api)
            .await?;
        self.form = RetryConfigForm::from_config(&config);
        Ok(config)
    }

    pub async fn save(&mut self, dashboard: &mut Dashboard) -> Result<RetryConfig, String> {
        let request = self
            .form
            .validate()
            .map_err(|e| report_invalid(&mut dashboard.toaster, &e))?;

        match dashboard
            .store
            .retry_config
            .update_global_retry_config(&dashboard.api, &request)
            .await
        {
            Ok(config) => {
                self.form = RetryConfigForm::from_config(&config);
                dashboard.toaster.success(
                    "Configuration Updated",
                    "The global retry configuration has been updated successfully.",
                );
                Ok(config)
            }
            Err(error) => {
                dashboard.toaster.error("Update Failed", error.clone());
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{client_with, MockTransport};
    use serde_json::json;
    use std::sync::Arc;

    fn form(max_retries: &str, retry_interval: &str) -> RetryConfigForm {
        RetryConfigForm {
            max_retries: max_retries.to_string(),
            retry_interval: retry_interval.to_string(),
            strategy: RetryStrategy::Fixed,
        }
    }

    #[test]
    fn test_defaults() {
        let request = RetryConfigForm::default().validate().unwrap();
        assert_eq!(request.max_retries, 3);
        assert_eq!(request.retry_interval, 60);
        assert_eq!(request.strategy, RetryStrategy::Exponential);
    }

    #[test]
    fn test_bounds() {
        assert!(form("1", "30").validate().is_ok());
        assert!(form("10", "30").validate().is_ok());
        assert!(matches!(
            form("0", "60").validate(),
            Err(ValidationError::TooSmall { field: "Maximum retries", .. })
        ));
        assert!(matches!(
            form("11", "60").validate(),
            Err(ValidationError::TooLarge { field: "Maximum retries", .. })
        ));
        assert!(matches!(
            form("3", "29").validate(),
            Err(ValidationError::TooSmall { field: "Retry interval", .. })
        ));
        assert!(matches!(
            form("three", "60").validate(),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_strategy_descriptions_differ() {
        assert!(strategy_description(RetryStrategy::Fixed).starts_with("Fixed Interval"));
        assert!(form("3", "60").strategy_description().starts_with("Fixed Interval"));
        assert!(strategy_description(RetryStrategy::Exponential).starts_with("Exponential Backoff"));
    }

    #[tokio::test]
    async fn test_load_seeds_form_and_save_toasts() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(
            200,
            json!({"id": 1, "maxRetries": 5, "retryInterval": 120, "strategy": "FIXED"}),
        );
        transport.respond_json(
            200,
            json!({"id": 1, "maxRetries": 6, "retryInterval": 120, "strategy": "FIXED"}),
        );
        let (api, _session) = client_with(transport.clone());
        let mut dashboard = Dashboard::new(api);

        let mut view = GlobalRetryConfigView::default();
        view.load(&mut dashboard).await.unwrap();
        assert_eq!(view.form, form("5", "120"));

        view.form.max_retries = "6".to_string();
        view.save(&mut dashboard).await.unwrap();

        let body = transport.last_request().unwrap().body.unwrap();
        assert_eq!(body, json!({"maxRetries": 6, "retryInterval": 120, "strategy": "FIXED"}));
        assert_eq!(dashboard.toaster.last().unwrap().title, "Configuration Updated");
        assert_eq!(view.form.max_retries, "6");
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let transport = Arc::new(MockTransport::new());
        let (api, _session) = client_with(transport.clone());
        let mut dashboard = Dashboard::new(api);

        let mut view = GlobalRetryConfigView {
            form: form("3", "10"),
        };
        assert!(view.save(&mut dashboard).await.is_err());
        assert!(transport.requests().is_empty());
        assert_eq!(dashboard.toaster.last().unwrap().title, "Invalid Input");
    }
}
