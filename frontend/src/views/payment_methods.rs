use shared::{PaymentMethod, PaymentMethodRequest};

use crate::app::Dashboard;
use crate::views::report_invalid;
use crate::views::validation::{parse_number, required, ValidationError};

/// Shared add/edit form; `editing_id` selects update over create
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethodForm {
    pub editing_id: Option<i64>,
    pub method_name: String,
    pub details: String,
    pub priority: String,
    pub is_default: bool,
}

impl Default for PaymentMethodForm {
    fn default() -> Self {
        Self {
            editing_id: None,
            method_name: String::new(),
            details: String::new(),
            priority: "1".to_string(),
            is_default: false,
        }
    }
}

impl PaymentMethodForm {
    pub fn edit(method: &PaymentMethod) -> Self {
        Self {
            editing_id: Some(method.id),
            method_name: method.method_name.clone(),
            details: method.details.clone(),
            priority: method.priority.to_string(),
            is_default: method.is_default,
        }
    }

    pub fn validate(&self) -> Result<PaymentMethodRequest, ValidationError> {
        let method_name = required("Method name", &self.method_name)?;
        let details = required("Details", &self.details)?;
        let priority: i32 = parse_number("Priority", &self.priority)?;
        if priority < 1 {
            return Err(ValidationError::TooSmall {
                field: "Priority",
                min: "1".to_string(),
            });
        }
        Ok(PaymentMethodRequest {
            method_name,
            details,
            priority,
            is_default: self.is_default,
        })
    }

    pub async fn submit(&self, dashboard: &mut Dashboard) -> Result<PaymentMethod, String> {
        let request = self
            .validate()
            .map_err(|e| report_invalid(&mut dashboard.toaster, &e))?;

        let slice = &mut dashboard.store.payment_methods;
        let result = match self.editing_id {
            Some(id) => slice.update_payment_method(&dashboard.api, id, &request).await,
            None => slice.create_payment_method(&dashboard.api, &request).await,
        };

        match result {
            Ok(method) => {
                if self.editing_id.is_some() {
                    dashboard.toaster.success(
                        "Payment Method Updated",
                        "Your payment method has been updated successfully.",
                    );
                } else {
                    dashboard.toaster.success(
                        "Payment Method Added",
                        "Your new payment method has been added successfully.",
                    );
                }
                Ok(method)
            }
            Err(error) => {
                dashboard.toaster.error("Action Failed", error.clone());
                Err(error)
            }
        }
    }
}

pub async fn load_payment_methods(dashboard: &mut Dashboard) -> Result<(), String> {
    dashboard
        .store
        .payment_methods
        .fetch_payment_methods(&dashboard.api)
        .await
}

pub async fn delete_payment_method(dashboard: &mut Dashboard, id: i64) -> Result<(), String> {
    match dashboard
        .store
        .payment_methods
        .delete_payment_method(&dashboard.api, id)
        .await
    {
        Ok(()) => {
            dashboard.toaster.success(
                "Payment Method Deleted",
                "The payment method has been deleted successfully.",
            );
            Ok(())
        }
        Err(error) => {
            dashboard.toaster.error("Delete Failed", error.clone());
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{client_with, sample_payment_method, MockTransport};
    use serde_json::json;
    use std::sync::Arc;

    fn filled() -> PaymentMethodForm {
        PaymentMethodForm {
            method_name: "Visa".to_string(),
            details: "**** 4242".to_string(),
            ..PaymentMethodForm::default()
        }
    }

    #[test]
    fn test_validation() {
        assert_eq!(filled().validate().unwrap().priority, 1);
        assert_eq!(
            PaymentMethodForm::default().validate(),
            Err(ValidationError::Required("Method name"))
        );
        let zero = PaymentMethodForm {
            priority: "0".to_string(),
            ..filled()
        };
        assert!(matches!(
            zero.validate(),
            Err(ValidationError::TooSmall { field: "Priority", .. })
        ));
    }

    #[test]
    fn test_edit_seeds_form() {
        let method = sample_payment_method(9, "Amex", true);
        let form = PaymentMethodForm::edit(&method);
        assert_eq!(form.editing_id, Some(9));
        assert!(form.is_default);
        assert_eq!(form.priority, "1");
    }

    #[tokio::test]
    async fn test_add_then_edit_then_delete() {
        let transport = Arc::new(MockTransport::new());
        let created = sample_payment_method(4, "Visa", false);
        let mut renamed = created.clone();
        renamed.method_name = "Travel Visa".to_string();
        transport.respond_json(201, serde_json::to_value(&created).unwrap());
        transport.respond_json(200, serde_json::to_value(&renamed).unwrap());
        transport.respond_text(204, "");
        let (api, _session) = client_with(transport.clone());
        let mut dashboard = Dashboard::new(api);

        filled().submit(&mut dashboard).await.unwrap();
        assert_eq!(dashboard.toaster.last().unwrap().title, "Payment Method Added");
        assert_eq!(dashboard.store.payment_methods.payment_methods, vec![created.clone()]);

        let mut form = PaymentMethodForm::edit(&created);
        form.method_name = "Travel Visa".to_string();
        form.submit(&mut dashboard).await.unwrap();
        assert_eq!(transport.last_request().unwrap().path, "/payment-methods/4");
        assert_eq!(dashboard.toaster.last().unwrap().title, "Payment Method Updated");
        assert_eq!(dashboard.store.payment_methods.payment_methods, vec![renamed]);

        delete_payment_method(&mut dashboard, 4).await.unwrap();
        assert!(dashboard.store.payment_methods.payment_methods.is_empty());
        assert_eq!(dashboard.toaster.last().unwrap().title, "Payment Method Deleted");
    }

    #[tokio::test]
    async fn test_failed_save_toasts_server_message() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(400, json!({"message": "Details are invalid"}));
        let (api, _session) = client_with(transport);
        let mut dashboard = Dashboard::new(api);

        assert_eq!(filled().submit(&mut dashboard).await.unwrap_err(), "Details are invalid");
        let toast = dashboard.toaster.last().unwrap();
        assert_eq!(toast.title, "Action Failed");
        assert_eq!(toast.description.as_deref(), Some("Details are invalid"));
    }
}
