//! Scripted transport and fixtures shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use shared::{ErrorLog, PaymentMethod, Role, Transaction, TransactionStatus, User};

use crate::error::ApiError;
use crate::services::api::ApiClient;
use crate::services::session_storage::MemorySessionStorage;
use crate::services::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Replays queued responses in order and records every request it sees.
/// Running out of responses is reported as a transport failure.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_json(&self, status: u16, body: Value) {
        self.respond_text(status, &body.to_string());
    }

    pub fn respond_text(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn pending_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Transport(format!("no scripted response for {}", path)))
    }
}

/// API client over `transport` with a fresh in-memory session
pub fn client_with(transport: Arc<MockTransport>) -> (ApiClient, Arc<MemorySessionStorage>) {
    let session = Arc::new(MemorySessionStorage::new());
    let api = ApiClient::new(transport, session.clone());
    (api, session)
}

pub fn paged_json<T: Serialize>(
    content: &[T],
    page: u32,
    size: u32,
    total_elements: u64,
    total_pages: u32,
    last: bool,
) -> Value {
    json!({
        "content": content,
        "page": page,
        "size": size,
        "totalElements": total_elements,
        "totalPages": total_pages,
        "last": last,
    })
}

pub fn auth_response_json(token: &str, role: &str) -> Value {
    json!({
        "token": token,
        "name": "Ada",
        "email": "ada@example.com",
        "phone": "555-0100",
        "role": role,
    })
}

pub fn sample_payment_method(id: i64, name: &str, is_default: bool) -> PaymentMethod {
    PaymentMethod {
        id,
        method_name: name.to_string(),
        details: format!("**** {:04}", id),
        priority: 1,
        is_default,
        created_at: Some("2025-01-01T00:00:00".to_string()),
        updated_at: None,
    }
}

pub fn sample_transaction(id: i64, status: TransactionStatus) -> Transaction {
    Transaction {
        id,
        amount: 10.0 * id as f64,
        currency: "USD".to_string(),
        status,
        gateway: "stripe".to_string(),
        external_reference_id: Some(format!("ext-{}", id)),
        payment_method: Some(sample_payment_method(1, "Visa", true)),
        retry_config: None,
        user: None,
        created_at: "2025-01-01T12:00:00".to_string(),
        updated_at: None,
        completed_at: None,
    }
}

pub fn sample_user(id: i64, name: &str, role: Role) -> User {
    User {
        id: Some(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "555-0100".to_string(),
        role,
        enabled: Some(true),
        created_at: None,
        updated_at: None,
    }
}

pub fn sample_error_log(id: i64, transaction_id: i64, error_code: &str) -> ErrorLog {
    ErrorLog {
        id,
        transaction_id,
        error_code: error_code.to_string(),
        error_message: format!("{} reported by gateway", error_code),
        retry_eligible: true,
        retry_attempt: 1,
        created_at: "2025-01-15T08:00:00".to_string(),
    }
}
