//! Invoice and quotation arithmetic, and unit conversion.

mod invoice;
mod units;

pub use invoice::{
    compute_line_total, compute_quotation, compute_summary, format_amount, DiscountType, Invoice,
    InvoiceDraft, InvoiceLine, InvoiceSummary, LineItem, PaymentMode, Quotation,
    QuotationSummary,
};
pub use units::{convert, UnitConversion};
