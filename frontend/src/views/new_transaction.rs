use shared::TransactionRequest;

use crate::app::Dashboard;
use crate::router::Route;
use crate::views::report_invalid;
use crate::views::validation::{parse_number, ValidationError};

pub const SUPPORTED_CURRENCIES: [&str; 6] = ["USD", "EUR", "GBP", "JPY", "CAD", "AUD"];
pub const MIN_AMOUNT: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionForm {
    pub amount: String,
    pub currency: String,
    pub payment_method_id: Option<i64>,
    pub allow_retry: bool,
}

impl Default for NewTransactionForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            currency: "USD".to_string(),
            payment_method_id: None,
            allow_retry: true,
        }
    }
}

impl NewTransactionForm {
    /// Load the payment methods to pick from, preselecting the default one
    pub async fn prepare(&mut self, dashboard: &mut Dashboard) -> Result<(), String> {
        let methods = &mut dashboard.store.payment_methods;
        methods.fetch_payment_methods(&dashboard.api).await?;
        if self.payment_method_id.is_none() {
            self.payment_method_id = methods.default_method().map(|method| method.id);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<TransactionRequest, ValidationError> {
        let amount: f64 = parse_number("Amount", &self.amount)?;
        if !amount.is_finite() || amount < MIN_AMOUNT {
            return Err(ValidationError::TooSmall {
                field: "Amount",
                min: MIN_AMOUNT.to_string(),
            });
        }

        let currency = self.currency.trim().to_ascii_uppercase();
        if !SUPPORTED_CURRENCIES.contains(&currency.as_str()) {
            return Err(ValidationError::UnsupportedCurrency(self.currency.clone()));
        }

        let payment_method_id = self
            .payment_method_id
            .ok_or(ValidationError::Required("Payment method"))?;

        Ok(TransactionRequest {
            amount,
            currency,
            payment_method_id,
            allow_retry: self.allow_retry,
        })
    }

    /// Create the transaction and return the detail route to show next
    pub async fn submit(&self, dashboard: &mut Dashboard) -> Result<Route, String> {
        if self.payment_method_id.is_none() {
            let message = "Please select a payment method to continue.".to_string();
            dashboard.toaster.error("Payment Method Required", message.clone());
            return Err(message);
        }
        let request = self
            .validate()
            .map_err(|e| report_invalid(&mut dashboard.toaster, &e))?;

        match dashboard
            .store
            .transactions
            .create_transaction(&dashboard.api, &request)
            .await
        {
            Ok(transaction) => {
                dashboard.toaster.success(
                    "Transaction Created",
                    "Your transaction has been created successfully.",
                );
                let route = Route::UserTransactionDetail(transaction.id);
                dashboard.navigate(&route.path());
                Ok(route)
            }
            Err(error) => {
                dashboard.toaster.error("Transaction Failed", error.clone());
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session_storage::{SessionStorage, TOKEN_KEY, USER_KEY};
    use crate::test_utils::{client_with, sample_payment_method, sample_transaction, MockTransport};
    use serde_json::json;
    use shared::TransactionStatus;
    use std::sync::Arc;

    fn form(amount: &str, currency: &str, method: Option<i64>) -> NewTransactionForm {
        NewTransactionForm {
            amount: amount.to_string(),
            currency: currency.to_string(),
            payment_method_id: method,
            allow_retry: true,
        }
    }

    #[test]
    fn test_defaults() {
        let form = NewTransactionForm::default();
        assert_eq!(form.currency, "USD");
        assert!(form.allow_retry);
        assert_eq!(form.payment_method_id, None);
    }

    #[test]
    fn test_validation() {
        assert!(form("0.01", "usd", Some(1)).validate().is_ok());
        assert_eq!(form("0.01", "usd", Some(1)).validate().unwrap().currency, "USD");
        assert!(matches!(
            form("0.001", "USD", Some(1)).validate(),
            Err(ValidationError::TooSmall { field: "Amount", .. })
        ));
        assert!(matches!(
            form("-5", "USD", Some(1)).validate(),
            Err(ValidationError::TooSmall { .. })
        ));
        assert_eq!(
            form("10", "XYZ", Some(1)).validate(),
            Err(ValidationError::UnsupportedCurrency("XYZ".to_string()))
        );
        assert_eq!(
            form("10", "EUR", None).validate(),
            Err(ValidationError::Required("Payment method"))
        );
    }

    #[tokio::test]
    async fn test_prepare_preselects_default_method() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(
            200,
            json!([
                sample_payment_method(1, "Visa", false),
                sample_payment_method(2, "Amex", true)
            ]),
        );
        let (api, _session) = client_with(transport);
        let mut dashboard = Dashboard::new(api);

        let mut form = NewTransactionForm::default();
        form.prepare(&mut dashboard).await.unwrap();
        assert_eq!(form.payment_method_id, Some(2));
    }

    #[tokio::test]
    async fn test_missing_payment_method_toast() {
        let transport = Arc::new(MockTransport::new());
        let (api, _session) = client_with(transport.clone());
        let mut dashboard = Dashboard::new(api);

        let result = form("10", "USD", None).submit(&mut dashboard).await;
        assert!(result.is_err());
        assert_eq!(dashboard.toaster.last().unwrap().title, "Payment Method Required");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_submit_navigates_to_detail() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(
            201,
            serde_json::to_value(sample_transaction(77, TransactionStatus::Pending)).unwrap(),
        );
        let (api, session) = client_with(transport.clone());
        session.set_item(TOKEN_KEY, "jwt").unwrap();
        session
            .set_item(USER_KEY, r#"{"name":"Bo","email":"bo@example.com","phone":"1","role":"USER"}"#)
            .unwrap();
        let mut dashboard = Dashboard::new(api);
        dashboard.bootstrap();

        let route = form("25.50", "GBP", Some(3)).submit(&mut dashboard).await.unwrap();

        assert_eq!(route, Route::UserTransactionDetail(77));
        assert_eq!(dashboard.current_route(), Some(route));
        let body = transport.last_request().unwrap().body.unwrap();
        assert_eq!(
            body,
            json!({"amount": 25.5, "currency": "GBP", "paymentMethodId": 3, "allowRetry": true})
        );
        assert_eq!(dashboard.toaster.last().unwrap().title, "Transaction Created");
    }
}
