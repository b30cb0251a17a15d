use shared::{
    ErrorCodeCount, ErrorLog, PaymentMethod, RetryConfig, Transaction, TransactionSummary,
    TransactionTrend, User,
};

use crate::components::{format_amount, render_table, status_label};
use crate::services::date_utils::{format_date_for_display, format_timestamp};

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

pub fn transactions_table(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }
    let rows: Vec<Vec<String>> = transactions
        .iter()
        .map(|tx| {
            vec![
                tx.id.to_string(),
                format_amount(tx.amount, &tx.currency),
                status_label(tx.status),
                or_dash(tx.payment_method.as_ref().map(|m| m.method_name.as_str())),
                format_timestamp(&tx.created_at),
            ]
        })
        .collect();
    render_table(&["ID", "Amount", "Status", "Payment Method", "Created"], &rows)
}

pub fn transaction_detail(transaction: &Transaction) -> String {
    let gateway = if transaction.gateway.is_empty() {
        "-"
    } else {
        transaction.gateway.as_str()
    };
    let mut lines = vec![
        format!("Transaction #{}", transaction.id),
        format!("  Amount:     {}", format_amount(transaction.amount, &transaction.currency)),
        format!("  Status:     {}", status_label(transaction.status)),
        format!("  Gateway:    {}", gateway),
        format!(
            "  Reference:  {}",
            or_dash(transaction.external_reference_id.as_deref())
        ),
        format!("  Created:    {}", format_timestamp(&transaction.created_at)),
    ];
    if let Some(completed_at) = &transaction.completed_at {
        lines.push(format!("  Completed:  {}", format_timestamp(completed_at)));
    }
    if let Some(method) = &transaction.payment_method {
        lines.push(format!("  Method:     {} ({})", method.method_name, method.details));
    }
    if let Some(user) = &transaction.user {
        lines.push(format!("  Owner:      {} <{}>", user.name, user.email));
    }
    if let Some(config) = &transaction.retry_config {
        lines.push(String::new());
        lines.push(retry_config_summary(config));
    }
    lines.join("\n")
}

pub fn retry_config_summary(config: &RetryConfig) -> String {
    let mut lines = vec![
        "Retry configuration".to_string(),
        format!("  Max retries: {}", config.max_retries),
        format!("  Interval:    {} s", config.retry_interval),
        format!("  Strategy:    {}", config.strategy),
    ];
    if let Some(attempts) = config.current_attempts {
        lines.push(format!("  Attempts:    {}/{}", attempts, config.max_retries));
    }
    if let Some(next) = &config.next_retry_time {
        lines.push(format!("  Next retry:  {}", format_timestamp(next)));
    }
    lines.join("\n")
}

pub fn payment_methods_table(methods: &[PaymentMethod]) -> String {
    if methods.is_empty() {
        return "No payment methods yet.".to_string();
    }
    let rows: Vec<Vec<String>> = methods
        .iter()
        .map(|method| {
            vec![
                method.id.to_string(),
                method.method_name.clone(),
                method.details.clone(),
                method.priority.to_string(),
                if method.is_default { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    render_table(&["ID", "Name", "Details", "Priority", "Default"], &rows)
}

pub fn users_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            vec![
                user.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
                user.name.clone(),
                user.email.clone(),
                user.phone.clone(),
                user.role.as_str().to_string(),
                match user.enabled {
                    Some(false) => "disabled",
                    _ => "enabled",
                }
                .to_string(),
            ]
        })
        .collect();
    render_table(&["ID", "Name", "Email", "Phone", "Role", "Status"], &rows)
}

pub fn error_logs_table(logs: &[ErrorLog]) -> String {
    if logs.is_empty() {
        return "No error logs found.".to_string();
    }
    let rows: Vec<Vec<String>> = logs
        .iter()
        .map(|log| {
            vec![
                log.id.to_string(),
                log.transaction_id.to_string(),
                log.error_code.clone(),
                log.error_message.clone(),
                log.retry_attempt.to_string(),
                if log.retry_eligible { "yes" } else { "no" }.to_string(),
                format_timestamp(&log.created_at),
            ]
        })
        .collect();
    render_table(
        &["ID", "Transaction", "Code", "Message", "Attempt", "Retryable", "Logged"],
        &rows,
    )
}

pub fn error_codes_table(codes: &[ErrorCodeCount]) -> String {
    let rows: Vec<Vec<String>> = codes
        .iter()
        .map(|code| vec![code.error_code.clone(), code.count.to_string()])
        .collect();
    render_table(&["Error Code", "Count"], &rows)
}

pub fn summaries_table(summaries: &[TransactionSummary]) -> String {
    if summaries.is_empty() {
        return "No recent transactions.".to_string();
    }
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|summary| {
            vec![
                summary.id.to_string(),
                format_amount(summary.amount, &summary.currency),
                status_label(summary.status),
                or_dash(summary.payment_method_name.as_deref()),
                format!("{}/{}", summary.retry_attempts, summary.max_retries),
            ]
        })
        .collect();
    render_table(&["ID", "Amount", "Status", "Payment Method", "Retries"], &rows)
}

pub fn trend_table(trend: &[TransactionTrend]) -> String {
    let rows: Vec<Vec<String>> = trend
        .iter()
        .map(|day| {
            vec![
                format_date_for_display(&day.date),
                day.successful.to_string(),
                day.failed.to_string(),
                day.total.to_string(),
            ]
        })
        .collect();
    render_table(&["Date", "Successful", "Failed", "Total"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_payment_method, sample_transaction};
    use shared::TransactionStatus;

    #[test]
    fn test_empty_tables_have_placeholders() {
        assert_eq!(transactions_table(&[]), "No transactions found.");
        assert_eq!(payment_methods_table(&[]), "No payment methods yet.");
    }

    #[test]
    fn test_transaction_rows() {
        let table = transactions_table(&[sample_transaction(3, TransactionStatus::Failed)]);
        assert!(table.contains("USD 30.00"));
        assert!(table.contains("[Failed]"));
        assert!(table.contains("Visa"));
        assert!(table.contains("2025-01-01 12:00"));
    }

    #[test]
    fn test_default_method_flag() {
        let table = payment_methods_table(&[sample_payment_method(1, "Visa", true)]);
        assert!(table.lines().nth(2).unwrap().ends_with("yes"));
    }
}
