//! Deterministic rendering of marketplace records into Persian summary lines.

use serde_json::Value;
use tracing::debug;

use crate::domain::product::ProductRecord;

pub const MAX_SUMMARY_LINES: usize = 5;

const AVAILABLE: &str = "موجود است";
const NOT_AVAILABLE: &str = "در حال حاضر موجود نیست";
const FREE_SHIPPING: &str = "دارای ارسال رایگان می‌باشد";
const NO_FREE_SHIPPING: &str = "ارسال رایگان ندارد";

/// Formats at most [`MAX_SUMMARY_LINES`] records, in input order.
///
/// Never returns an empty list: an empty input and an input with no usable
/// record each produce their own one-line message.
pub fn format_products(records: &[Value], query: &str) -> Vec<String> {
    if records.is_empty() {
        return vec![no_results_message(query)];
    }

    let lines = records
        .iter()
        .take(MAX_SUMMARY_LINES)
        .enumerate()
        .filter_map(|(position, raw)| match ProductRecord::from_value(raw) {
            Ok(record) => Some(summary_line(&record)),
            Err(skip) => {
                debug!(
                    event_name = "format.record.skipped",
                    position,
                    reason = %skip,
                    "dropping malformed product record"
                );
                None
            }
        })
        .collect::<Vec<_>>();

    if lines.is_empty() {
        return vec![no_valid_results_message(query)];
    }
    lines
}

pub fn summary_line(record: &ProductRecord) -> String {
    let availability = if record.is_available { AVAILABLE } else { NOT_AVAILABLE };
    let shipping = if record.is_free_shipping { FREE_SHIPPING } else { NO_FREE_SHIPPING };

    format!(
        "محصول «{}» با قیمت {} تومان عرضه می‌شود. این کالا با امتیاز {} از کاربران، {} و {}.",
        record.name, record.price, record.rating, availability, shipping
    )
}

pub fn no_results_message(query: &str) -> String {
    format!("No products found for the query '{query}'.")
}

pub fn no_valid_results_message(query: &str) -> String {
    format!("هیچ محصول معتبری با عبارت «{query}» یافت نشد.")
}
