//! CSV export of the invoice list.
//!
//! Matches what the back office downloads: a fixed Spanish header row,
//! every field double-quoted, rows joined by `\n`. Amounts are raw minor
//! units so the file imports cleanly into a spreadsheet.

use std::fmt::Write;

use chrono::Utc;

use farmachelo_core::Invoice;

/// Header row, in the exact column order of the export.
const HEADERS: [&str; 7] = [
    "Número", "Cliente", "Fecha", "Subtotal", "IVA", "Total", "Estado",
];

/// Render the invoice list as CSV.
#[must_use]
pub fn invoices_to_csv(invoices: &[Invoice]) -> String {
    let mut rows = Vec::with_capacity(invoices.len() + 1);
    rows.push(quote_row(HEADERS.iter().map(ToString::to_string)));
    for invoice in invoices {
        rows.push(quote_row(
            [
                invoice.invoice_number.clone(),
                invoice.customer_info.name.clone(),
                invoice.issue_date.format("%d/%m/%Y").to_string(),
                invoice.subtotal.minor().to_string(),
                invoice.tax_amount.minor().to_string(),
                invoice.total_amount.minor().to_string(),
                invoice.status.to_string(),
            ]
            .into_iter(),
        ));
    }
    rows.join("\n")
}

/// Suggested download filename, dated with today's date.
#[must_use]
pub fn export_filename() -> String {
    format!("facturas-farmachelo-{}.csv", Utc::now().format("%Y-%m-%d"))
}

/// Quote every field and join with commas. Embedded quotes are doubled
/// per RFC 4180.
fn quote_row(fields: impl Iterator<Item = String>) -> String {
    let mut row = String::new();
    for (i, field) in fields.enumerate() {
        if i > 0 {
            row.push(',');
        }
        let _ = write!(row, "\"{}\"", field.replace('"', "\"\""));
    }
    row
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use farmachelo_core::{
        CustomerInfo, InvoiceId, InvoiceStatus, Price,
    };

    fn invoice(number: &str, customer: &str) -> Invoice {
        Invoice {
            id: InvoiceId::new("inv_1"),
            invoice_number: number.to_string(),
            issue_date: chrono::Utc.with_ymd_and_hms(2026, 8, 15, 10, 30, 0).unwrap(),
            status: InvoiceStatus::Paid,
            payment_method: "card".to_string(),
            items: vec![],
            subtotal: Price::from_minor(42_000),
            tax_amount: Price::from_minor(7_980),
            discount_amount: Price::ZERO,
            total_amount: Price::from_minor(49_980),
            customer_info: CustomerInfo {
                name: customer.to_string(),
                email: "c@example.com".to_string(),
                phone: String::new(),
                address: String::new(),
            },
            transaction_id: None,
        }
    }

    #[test]
    fn test_header_row() {
        let csv = invoices_to_csv(&[]);
        assert_eq!(
            csv,
            "\"Número\",\"Cliente\",\"Fecha\",\"Subtotal\",\"IVA\",\"Total\",\"Estado\""
        );
    }

    #[test]
    fn test_second_line_is_quoted_row_in_column_order() {
        let csv = invoices_to_csv(&[invoice("FAC-1", "Juan Pérez")]);
        let second = csv.lines().nth(1).unwrap();
        assert_eq!(
            second,
            "\"FAC-1\",\"Juan Pérez\",\"15/08/2026\",\"42000\",\"7980\",\"49980\",\"paid\""
        );
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let csv = invoices_to_csv(&[invoice("FAC-2", "Drogueria \"El Centro\"")]);
        assert!(csv.contains("\"Drogueria \"\"El Centro\"\"\""));
    }

    #[test]
    fn test_filename_shape() {
        let name = export_filename();
        assert!(name.starts_with("facturas-farmachelo-"));
        assert!(name.ends_with(".csv"));
        // facturas-farmachelo-YYYY-MM-DD.csv
        assert_eq!(name.len(), "facturas-farmachelo-2026-08-28.csv".len());
    }
}
