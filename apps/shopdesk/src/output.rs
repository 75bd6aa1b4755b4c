//! Plain-text rendering of list pages and totals.

use shopdesk_core::billing::{format_amount, InvoiceSummary, Quotation, QuotationSummary};
use shopdesk_core::record::FieldSource;
use shopdesk_core::ListPage;

/// Renders a page as an aligned table followed by a page footer.
pub fn render_page<R: FieldSource>(page: &ListPage<R>, columns: &[&str]) -> String {
    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|column| {
                    item.field(column)
                        .map(|v| v.display_text().into_owned())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_row(&mut out, columns.iter().copied(), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    if rows.is_empty() {
        out.push_str("(no records)\n");
    }
    out.push_str(&format!(
        "Page {} of {} ({} items)",
        page.page, page.total_pages, page.total_items
    ));
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

pub fn render_invoice_summary(summary: &InvoiceSummary) -> String {
    format!(
        "Subtotal: {}\nDiscount: {}\nTax: {}\nGrand total: {}",
        format_amount(summary.subtotal),
        format_amount(summary.discount_value),
        format_amount(summary.tax_amount),
        format_amount(summary.grand_total),
    )
}

pub fn render_quotation(quotation: &Quotation, summary: &QuotationSummary) -> String {
    let mut out = format!(
        "Quotation {} ({})\n",
        quotation.quotation_number, quotation.date
    );
    for item in &quotation.items {
        out.push_str(&format!(
            "  {} x{} @ {} = {}\n",
            item.product_name,
            item.quantity,
            format_amount(item.unit_price),
            format_amount(item.line_total()),
        ));
    }
    out.push_str(&format!(
        "Subtotal: {}\nTax: {}\nTotal: {}\n{}",
        format_amount(summary.subtotal),
        format_amount(summary.tax),
        format_amount(summary.total),
        quotation.terms,
    ));
    out
}
