//! Plain-text rendering for the terminal front end.

pub mod tables;

use shared::TransactionStatus;

use crate::services::notifications::{Toast, ToastVariant};
use crate::store::Pagination;

/// Render rows under a header with left-aligned, padded columns
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let render_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render_row(headers.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(render_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

pub fn status_label(status: TransactionStatus) -> String {
    format!("[{}]", status.label())
}

pub fn format_amount(amount: f64, currency: &str) -> String {
    format!("{} {:.2}", currency, amount)
}

pub fn pagination_footer(pagination: &Pagination) -> String {
    let mut footer = format!(
        "Page {} of {} ({} total)",
        pagination.page + 1,
        pagination.total_pages.max(1),
        pagination.total_items
    );
    if pagination.has_previous() {
        footer.push_str(" | previous available");
    }
    if pagination.has_next() {
        footer.push_str(" | next available");
    }
    footer
}

pub fn render_toast(toast: &Toast) -> String {
    let marker = match toast.variant {
        ToastVariant::Default => "✓",
        ToastVariant::Destructive => "✗",
    };
    match &toast.description {
        Some(description) => format!("{} {}: {}", marker, toast.title, description),
        None => format!("{} {}", marker, toast.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_aligns_columns() {
        let table = render_table(
            &["ID", "Status"],
            &[
                vec!["1".to_string(), "[Failed]".to_string()],
                vec!["100".to_string(), "[Success]".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID   Status");
        assert_eq!(lines[1], "---  ---------");
        assert_eq!(lines[2], "1    [Failed]");
        assert_eq!(lines[3], "100  [Success]");
    }

    #[test]
    fn test_pagination_footer() {
        let pagination = Pagination {
            page: 1,
            size: 10,
            total_items: 23,
            total_pages: 3,
            is_last: false,
        };
        assert_eq!(
            pagination_footer(&pagination),
            "Page 2 of 3 (23 total) | previous available | next available"
        );
        assert_eq!(pagination_footer(&Pagination::default()), "Page 1 of 1 (0 total)");
    }

    #[test]
    fn test_labels() {
        assert_eq!(status_label(TransactionStatus::RetryScheduled), "[Retry Scheduled]");
        assert_eq!(format_amount(12.5, "EUR"), "EUR 12.50");
        let toast = Toast::new("Login Failed", Some("Bad credentials".to_string()), ToastVariant::Destructive);
        assert_eq!(render_toast(&toast), "✗ Login Failed: Bad credentials");
    }
}
