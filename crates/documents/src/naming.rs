//! Deterministic document file names.

use chrono::NaiveDate;

/// `{Prefix}_{sanitized customer}_{dd-MM-yyyy}_{counter:03}.pdf`
///
/// Every character outside `[A-Za-z0-9]` in the customer name becomes `-`.
/// The prefix is `Quote` when `doc_type` is "quote" (any case), else `Invoice`.
pub fn generate_file_name(
    customer_name: &str,
    date: NaiveDate,
    counter: u32,
    doc_type: &str,
) -> String {
    let sanitized: String = customer_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();

    let prefix = if doc_type.eq_ignore_ascii_case("quote") {
        "Quote"
    } else {
        "Invoice"
    };

    format!(
        "{prefix}_{sanitized}_{}_{counter:03}.pdf",
        date.format("%d-%m-%Y")
    )
}
