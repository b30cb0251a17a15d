use shared::{MessageResponse, Transaction, TransactionRequest};

use crate::services::api::{ApiClient, TransactionQuery};
use crate::store::{Pagination, RequestState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionState {
    /// Latest page, replaced wholesale on every list fetch
    pub transactions: Vec<Transaction>,
    pub current_transaction: Option<Transaction>,
    pub pagination: Pagination,
    pub request: RequestState,
}

impl TransactionState {
    pub async fn fetch_user_transactions(
        &mut self,
        api: &ApiClient,
        query: &TransactionQuery,
    ) -> Result<(), String> {
        self.request.start();
        let result = api.get_user_transactions(query).await;
        let page = self.request.settle(result, "Failed to fetch transactions")?;
        self.pagination = Pagination::from_page(&page);
        self.transactions = page.content;
        Ok(())
    }

    /// Admin listing across every user
    pub async fn fetch_all_transactions(
        &mut self,
        api: &ApiClient,
        query: &TransactionQuery,
    ) -> Result<(), String> {
        self.request.start();
        let result = api.get_all_transactions(query).await;
        let page = self.request.settle(result, "Failed to fetch transactions")?;
        self.pagination = Pagination::from_page(&page);
        self.transactions = page.content;
        Ok(())
    }

    pub async fn fetch_transaction_by_id(
        &mut self,
        api: &ApiClient,
        id: i64,
    ) -> Result<Transaction, String> {
        self.request.start();
        let result = api.get_transaction_by_id(id).await;
        let transaction = self.request.settle(result, "Failed to fetch transaction")?;
        self.current_transaction = Some(transaction.clone());
        Ok(transaction)
    }

    pub async fn create_transaction(
        &mut self,
        api: &ApiClient,
        request: &TransactionRequest,
    ) -> Result<Transaction, String> {
        self.request.start();
        let result = api.create_transaction(request).await;
        let transaction = self.request.settle(result, "Failed to create transaction")?;
        self.current_transaction = Some(transaction.clone());
        Ok(transaction)
    }

    /// Ask the server to retry; cached transactions are untouched until the
    /// caller refetches
    pub async fn retry_transaction(
        &mut self,
        api: &ApiClient,
        id: i64,
    ) -> Result<MessageResponse, String> {
        self.request.start();
        let result = api.retry_transaction(id).await;
        self.request.settle(result, "Failed to retry transaction")
    }

    pub fn clear_current_transaction(&mut self) {
        self.current_transaction = None;
    }
}
