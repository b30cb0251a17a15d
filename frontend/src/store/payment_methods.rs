use shared::{PaymentMethod, PaymentMethodRequest};

use crate::services::api::ApiClient;
use crate::store::{replace_by_id, RequestState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentMethodState {
    pub payment_methods: Vec<PaymentMethod>,
    pub current_payment_method: Option<PaymentMethod>,
    pub request: RequestState,
}

impl PaymentMethodState {
    pub async fn fetch_payment_methods(&mut self, api: &ApiClient) -> Result<(), String> {
        self.request.start();
        let result = api.get_payment_methods().await;
        self.payment_methods = self.request.settle(result, "Failed to fetch payment methods")?;
        Ok(())
    }

    pub async fn fetch_payment_method_by_id(
        &mut self,
        api: &ApiClient,
        id: i64,
    ) -> Result<PaymentMethod, String> {
        self.request.start();
        let result = api.get_payment_method_by_id(id).await;
        let method = self.request.settle(result, "Failed to fetch payment method")?;
        self.current_payment_method = Some(method.clone());
        Ok(method)
    }

    /// Cache the created method exactly once, even if a fetch already saw it
    pub async fn create_payment_method(
        &mut self,
        api: &ApiClient,
        request: &PaymentMethodRequest,
    ) -> Result<PaymentMethod, String> {
        self.request.start();
        let result = api.create_payment_method(request).await;
        let method = self.request.settle(result, "Failed to create payment method")?;
        if !replace_by_id(&mut self.payment_methods, &method, |m| Some(m.id)) {
            self.payment_methods.push(method.clone());
        }
        Ok(method)
    }

    pub async fn update_payment_method(
        &mut self,
        api: &ApiClient,
        id: i64,
        request: &PaymentMethodRequest,
    ) -> Result<PaymentMethod, String> {
        self.request.start();
        let result = api.update_payment_method(id, request).await;
        let method = self.request.settle(result, "Failed to update payment method")?;
        replace_by_id(&mut self.payment_methods, &method, |m| Some(m.id));
        self.current_payment_method = Some(method.clone());
        Ok(method)
    }

    pub async fn delete_payment_method(&mut self, api: &ApiClient, id: i64) -> Result<(), String> {
        self.request.start();
        let result = api.delete_payment_method(id).await;
        self.request.settle(result, "Failed to delete payment method")?;
        self.payment_methods.retain(|method| method.id != id);
        if self
            .current_payment_method
            .as_ref()
            .is_some_and(|method| method.id == id)
        {
            self.current_payment_method = None;
        }
        Ok(())
    }

    pub fn clear_current_payment_method(&mut self) {
        self.current_payment_method = None;
    }

    pub fn default_method(&self) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|method| method.is_default)
    }
}
