use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    ApiEnvelope, AuthResponse, ErrorCodeCount, ErrorLog, LoginRequest, MessageResponse,
    PagedResponse, PaymentMethod, PaymentMethodRequest, RegisterRequest, RetryConfig,
    RetryConfigRequest, Transaction, TransactionRequest, TransactionStatus, TransactionSummary,
    TransactionTrend, User, UserUpdateRequest,
};
use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::error::ApiError;
use crate::services::session_storage::{SessionStorage, TOKEN_KEY};
use crate::services::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Filter and page for transaction listings
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub status: Option<TransactionStatus>,
    /// Only honoured by the admin listing
    pub user_id: Option<i64>,
    pub page: u32,
    pub size: u32,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            status: None,
            user_id: None,
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Filter and page for the error log listing
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorLogQuery {
    pub error_code: Option<String>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
    pub page: u32,
    pub size: u32,
}

impl Default for ErrorLogQuery {
    fn default() -> Self {
        Self {
            error_code: None,
            start_date: None,
            end_date: None,
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// API client for the payment retry REST API
///
/// Attaches the stored bearer token to every request and maps non-2xx
/// responses to [`ApiError::Status`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: Arc<dyn SessionStorage>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>, session: Arc<dyn SessionStorage>) -> Self {
        Self { transport, session }
    }

    /// Create a client talking HTTP to the configured base URL
    pub fn from_config(
        config: &DashboardConfig,
        session: Arc<dyn SessionStorage>,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config.api_base_url, config.request_timeout())?;
        Ok(Self::new(Arc::new(transport), session))
    }

    /// Durable storage holding the session token and user snapshot
    pub fn session(&self) -> &dyn SessionStorage {
        self.session.as_ref()
    }

    // ----- auth -----

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.fetch(HttpRequest::post("/api/auth/login").json(encode(credentials)?))
            .await
    }

    pub async fn register(&self, user: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.fetch(HttpRequest::post("/api/auth/register").json(encode(user)?))
            .await
    }

    // ----- transactions -----

    pub async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<Transaction, ApiError> {
        self.fetch(HttpRequest::post("/transactions").json(encode(request)?))
            .await
    }

    /// Transactions owned by the logged-in user
    pub async fn get_user_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<PagedResponse<Transaction>, ApiError> {
        let request = HttpRequest::get("/transactions")
            .optional_param("status", query.status.map(|status| status.as_str()))
            .param("page", query.page)
            .param("size", query.size);
        self.fetch(request).await
    }

    pub async fn get_transaction_by_id(&self, id: i64) -> Result<Transaction, ApiError> {
        self.fetch(HttpRequest::get(format!("/transactions/{}", id)))
            .await
    }

    /// Ask the server to schedule a retry; the client does not retry itself
    pub async fn retry_transaction(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.fetch(HttpRequest::put(format!("/transactions/{}/retry", id)))
            .await
    }

    /// Admin listing across all users
    pub async fn get_all_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<PagedResponse<Transaction>, ApiError> {
        let request = HttpRequest::get("/transactions/all")
            .optional_param("status", query.status.map(|status| status.as_str()))
            .optional_param("userId", query.user_id)
            .param("page", query.page)
            .param("size", query.size);
        self.fetch(request).await
    }

    // ----- payment methods -----

    pub async fn get_payment_methods(&self) -> Result<Vec<PaymentMethod>, ApiError> {
        self.fetch(HttpRequest::get("/payment-methods")).await
    }

    pub async fn get_payment_method_by_id(&self, id: i64) -> Result<PaymentMethod, ApiError> {
        self.fetch(HttpRequest::get(format!("/payment-methods/{}", id)))
            .await
    }

    pub async fn create_payment_method(
        &self,
        request: &PaymentMethodRequest,
    ) -> Result<PaymentMethod, ApiError> {
        self.fetch(HttpRequest::post("/payment-methods").json(encode(request)?))
            .await
    }

    pub async fn update_payment_method(
        &self,
        id: i64,
        request: &PaymentMethodRequest,
    ) -> Result<PaymentMethod, ApiError> {
        let request = HttpRequest::put(format!("/payment-methods/{}", id)).json(encode(request)?);
        self.fetch(request).await
    }

    pub async fn delete_payment_method(&self, id: i64) -> Result<(), ApiError> {
        self.execute(HttpRequest::delete(format!("/payment-methods/{}", id)))
            .await
            .map(|_| ())
    }

    // ----- users -----

    pub async fn get_current_user(&self) -> Result<User, ApiError> {
        self.fetch(HttpRequest::get("/users/me")).await
    }

    pub async fn update_current_user(&self, update: &UserUpdateRequest) -> Result<User, ApiError> {
        self.fetch(HttpRequest::put("/users/me").json(encode(update)?))
            .await
    }

    pub async fn get_all_users(&self, page: u32, size: u32) -> Result<PagedResponse<User>, ApiError> {
        let request = HttpRequest::get("/users")
            .param("page", page)
            .param("size", size);
        self.fetch(request).await
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<User, ApiError> {
        self.fetch(HttpRequest::get(format!("/users/{}", id))).await
    }

    pub async fn update_user(&self, id: i64, update: &UserUpdateRequest) -> Result<User, ApiError> {
        self.fetch(HttpRequest::put(format!("/users/{}", id)).json(encode(update)?))
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.execute(HttpRequest::delete(format!("/users/{}", id)))
            .await
            .map(|_| ())
    }

    // ----- error logs -----

    pub async fn get_error_logs(
        &self,
        query: &ErrorLogQuery,
    ) -> Result<PagedResponse<ErrorLog>, ApiError> {
        let request = HttpRequest::get("/api/error-logs")
            .optional_param("errorCode", query.error_code.as_deref())
            .optional_param("startDate", query.start_date.as_deref())
            .optional_param("endDate", query.end_date.as_deref())
            .param("page", query.page)
            .param("size", query.size);
        self.fetch(request).await
    }

    pub async fn get_most_common_error_codes(
        &self,
        limit: u32,
    ) -> Result<Vec<ErrorCodeCount>, ApiError> {
        self.fetch(HttpRequest::get("/api/error-logs/common").param("limit", limit))
            .await
    }

    // ----- analytics -----

    pub async fn get_transaction_trend(&self, days: u32) -> Result<Vec<TransactionTrend>, ApiError> {
        self.fetch(HttpRequest::get("/api/analytics/transactions/trend").param("days", days))
            .await
    }

    pub async fn get_retry_success_rate(&self) -> Result<f64, ApiError> {
        self.fetch(HttpRequest::get("/api/analytics/retry/success-rate"))
            .await
    }

    pub async fn get_most_common_errors(&self, limit: u32) -> Result<Vec<ErrorCodeCount>, ApiError> {
        self.fetch(HttpRequest::get("/api/analytics/errors/common").param("limit", limit))
            .await
    }

    pub async fn get_transaction_summary(
        &self,
        limit: u32,
    ) -> Result<Vec<TransactionSummary>, ApiError> {
        self.fetch(HttpRequest::get("/api/analytics/transactions/summary").param("limit", limit))
            .await
    }

    pub async fn get_average_attempts_for_success(&self) -> Result<f64, ApiError> {
        self.fetch(HttpRequest::get("/api/analytics/retry/avg-attempts"))
            .await
    }

    // ----- retry configuration -----

    pub async fn get_global_retry_config(&self) -> Result<RetryConfig, ApiError> {
        self.fetch(HttpRequest::get("/api/retry-config/global")).await
    }

    pub async fn update_global_retry_config(
        &self,
        config: &RetryConfigRequest,
    ) -> Result<RetryConfig, ApiError> {
        self.fetch(HttpRequest::put("/api/retry-config/global").json(encode(config)?))
            .await
    }

    pub async fn update_transaction_retry_config(
        &self,
        transaction_id: i64,
        config: &RetryConfigRequest,
    ) -> Result<RetryConfig, ApiError> {
        let request = HttpRequest::put(format!("/api/retry-config/transaction/{}", transaction_id))
            .json(encode(config)?);
        self.fetch(request).await
    }

    // ----- plumbing -----

    async fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        decode_body(&response.body)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request = self.authorize(request);
        let method = request.method.as_str();
        let path = request.path.clone();

        let response = self.transport.send(request).await?;
        if response.is_success() {
            debug!(method, %path, status = response.status, "request succeeded");
            Ok(response)
        } else {
            warn!(method, %path, status = response.status, "request rejected");
            Err(ApiError::Status {
                status: response.status,
                message: extract_message(&response.body),
            })
        }
    }

    fn authorize(&self, mut request: HttpRequest) -> HttpRequest {
        match self.session.get_item(TOKEN_KEY) {
            Ok(token) => request.bearer_token = token,
            Err(e) => warn!(error = %e, "could not read session token; sending request anonymously"),
        }
        request
    }
}

/// Decode a success body, unwrapping the `data` field when the server sent
/// an [`ApiEnvelope`]
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let decode_error = |e: serde_json::Error| ApiError::Decode(e.to_string());
    let value: serde_json::Value = serde_json::from_str(body).map_err(decode_error)?;
    if value.get("data").is_some() {
        let envelope: ApiEnvelope<T> = serde_json::from_value(value).map_err(decode_error)?;
        return Ok(envelope.data);
    }
    serde_json::from_value(value).map_err(decode_error)
}

fn encode<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

/// Pull `message` out of an error body such as `{"message": "..."}`
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|message| message.as_str())
        .map(str::to_string)
}
