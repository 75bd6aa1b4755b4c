//! Line items, invoice/quotation summaries, and the invoice form draft.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::record::{FieldSource, Product, RecordId, Value};

/// How the invoice discount is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountType {
    /// Absolute amount subtracted from the subtotal
    #[default]
    Direct,
    /// Percentage of the subtotal
    Percentage,
}

impl FromStr for DiscountType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Direct" | "direct" => Ok(DiscountType::Direct),
            "Percentage" | "percentage" => Ok(DiscountType::Percentage),
            other => Err(CoreError::validation(
                "discountType",
                format!("expected 'Direct' or 'Percentage', got '{}'", other),
            )),
        }
    }
}

/// How an invoice is paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    #[default]
    Cash,
    Card,
    Online,
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMode::Cash => f.write_str("Cash"),
            PaymentMode::Card => f.write_str("Card"),
            PaymentMode::Online => f.write_str("Online"),
        }
    }
}

impl FromStr for PaymentMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMode::Cash),
            "card" => Ok(PaymentMode::Card),
            "online" => Ok(PaymentMode::Online),
            other => Err(CoreError::validation(
                "paymentMode",
                format!("unknown payment mode '{}'", other),
            )),
        }
    }
}

/// One product entry on an invoice or quotation.
///
/// The line total is always computed from quantity and unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_ref: Option<RecordId>,
    #[serde(default)]
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl Default for LineItem {
    /// A fresh form row: no product, quantity 1, price 0.
    fn default() -> Self {
        Self {
            product_ref: None,
            product_name: String::new(),
            quantity: 1.0,
            unit_price: 0.0,
        }
    }
}

impl LineItem {
    pub fn new(quantity: f64, unit_price: f64) -> Self {
        Self {
            quantity,
            unit_price,
            ..Self::default()
        }
    }

    /// Builds a line for `quantity` units of `product` at its list price.
    pub fn for_product(product: &Product, quantity: f64) -> Self {
        Self {
            product_ref: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
        }
    }

    /// `quantity × unit_price`, unrounded.
    pub fn line_total(&self) -> f64 {
        compute_line_total(self.quantity, self.unit_price)
    }

    /// Returns a copy with a new quantity.
    pub fn with_quantity(&self, quantity: f64) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Returns a copy with a new unit price.
    pub fn with_unit_price(&self, unit_price: f64) -> Self {
        Self {
            unit_price,
            ..self.clone()
        }
    }

    /// Returns a copy pointing at `product`, keeping quantity and price.
    pub fn with_product(&self, id: RecordId, name: impl Into<String>) -> Self {
        Self {
            product_ref: Some(id),
            product_name: name.into(),
            ..self.clone()
        }
    }

    fn validate(&self, index: usize) -> Result<()> {
        ensure_non_negative(&format!("items[{}].quantity", index), self.quantity)?;
        ensure_non_negative(&format!("items[{}].unitPrice", index), self.unit_price)
    }
}

/// Derived invoice totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub subtotal: f64,
    pub discount_value: f64,
    pub tax_amount: f64,
    pub grand_total: f64,
}

/// `quantity × price`. Rounding happens only in [`format_amount`].
pub fn compute_line_total(quantity: f64, price: f64) -> f64 {
    quantity * price
}

/// Computes subtotal, discount, tax and grand total for a set of lines.
///
/// # Errors
/// `CoreError::Validation` for a negative or non-finite discount, tax amount,
/// quantity or unit price.
pub fn compute_summary(
    items: &[LineItem],
    discount: f64,
    discount_type: DiscountType,
    tax_amount: f64,
) -> Result<InvoiceSummary> {
    ensure_non_negative("discount", discount)?;
    ensure_non_negative("taxAmount", tax_amount)?;
    for (index, item) in items.iter().enumerate() {
        item.validate(index)?;
    }

    let subtotal: f64 = items.iter().map(LineItem::line_total).sum();
    let discount_value = match discount_type {
        DiscountType::Percentage => subtotal * discount / 100.0,
        DiscountType::Direct => discount,
    };

    Ok(InvoiceSummary {
        subtotal,
        discount_value,
        tax_amount,
        grand_total: subtotal - discount_value + tax_amount,
    })
}

/// Quotation totals: a flat tax rate on the subtotal, no discount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotationSummary {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Computes quotation totals with `tax_rate` (0.10 = 10%).
pub fn compute_quotation(items: &[LineItem], tax_rate: f64) -> Result<QuotationSummary> {
    ensure_non_negative("taxRate", tax_rate)?;
    for (index, item) in items.iter().enumerate() {
        item.validate(index)?;
    }
    let subtotal: f64 = items.iter().map(LineItem::line_total).sum();
    let summary = compute_summary(items, 0.0, DiscountType::Direct, subtotal * tax_rate)?;
    Ok(QuotationSummary {
        subtotal: summary.subtotal,
        tax: summary.tax_amount,
        total: summary.grand_total,
    })
}

/// Formats an amount with two decimals for display.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CoreError::validation(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(CoreError::validation(field, "must not be negative"));
    }
    Ok(())
}

/// Line as posted to and returned by the invoice endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<RecordId>,
    #[serde(default)]
    pub product_name: String,
    pub quantity: f64,
    pub price: f64,
    pub total: f64,
}

impl From<&LineItem> for InvoiceLine {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_ref.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            price: item.unit_price,
            total: item.line_total(),
        }
    }
}

/// An invoice as exchanged with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<RecordId>,
    #[serde(default)]
    pub shop_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<RecordId>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default)]
    pub tax_amount: f64,
    #[serde(default)]
    pub items: Vec<InvoiceLine>,
    #[serde(default)]
    pub created_by: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
}

impl FieldSource for Invoice {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" | "invoiceId" => self.invoice_id.as_ref()?.to_value(),
            "shopId" => Value::from(self.shop_id.as_str()),
            "customerId" => self.customer_id.as_ref()?.to_value(),
            "amount" => Value::from(self.amount),
            "paymentMode" => Value::from(self.payment_mode.to_string()),
            "invoiceNumber" => Value::from(self.invoice_number.as_str()),
            "dueDate" => Value::from(self.due_date),
            "discount" => Value::from(self.discount),
            "taxAmount" => Value::from(self.tax_amount),
            "createdBy" => Value::from(self.created_by),
            "createdOn" => Value::from(self.created_on.map(|t| t.date_naive())),
            _ => return None,
        };
        Some(Cow::Owned(value))
    }
}

/// The invoice form before submission.
///
/// Missing fields take the form defaults when read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDraft {
    pub shop_id: String,
    pub customer_id: Option<RecordId>,
    pub payment_mode: PaymentMode,
    pub invoice_number: String,
    pub due_date: Option<NaiveDate>,
    pub discount: f64,
    pub discount_type: DiscountType,
    pub tax_amount: f64,
    pub items: Vec<LineItem>,
    pub created_by: u64,
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self {
            shop_id: String::new(),
            customer_id: None,
            payment_mode: PaymentMode::Cash,
            invoice_number: String::new(),
            due_date: None,
            discount: 0.0,
            discount_type: DiscountType::Direct,
            tax_amount: 0.0,
            items: vec![LineItem::default()],
            created_by: 1,
        }
    }
}

impl InvoiceDraft {
    /// Appends an empty row.
    pub fn add_item(&mut self) {
        self.items.push(LineItem::default());
    }

    /// Replaces the row at `index` with `f(old)`.
    ///
    /// # Errors
    /// `CoreError::Validation` when `index` is out of range.
    pub fn update_item<F>(&mut self, index: usize, f: F) -> Result<()>
    where
        F: FnOnce(&LineItem) -> LineItem,
    {
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| CoreError::validation("items", format!("no line at index {}", index)))?;
        *item = f(item);
        Ok(())
    }

    /// Removes the row at `index`.
    pub fn remove_item(&mut self, index: usize) -> Result<LineItem> {
        if index >= self.items.len() {
            return Err(CoreError::validation(
                "items",
                format!("no line at index {}", index),
            ));
        }
        Ok(self.items.remove(index))
    }

    /// Computes the current totals.
    pub fn summary(&self) -> Result<InvoiceSummary> {
        compute_summary(
            &self.items,
            self.discount,
            self.discount_type,
            self.tax_amount,
        )
    }

    /// Checks required fields and amounts.
    ///
    /// A customer and at least one line with a product are required.
    pub fn validate(&self) -> Result<InvoiceSummary> {
        if self.customer_id.is_none() {
            return Err(CoreError::validation("customerId", "a customer is required"));
        }
        if self.items.is_empty() {
            return Err(CoreError::validation("items", "at least one line is required"));
        }
        if let Some(index) = self.items.iter().position(|i| i.product_ref.is_none()) {
            return Err(CoreError::validation(
                format!("items[{}].productRef", index),
                "a product is required",
            ));
        }
        self.summary()
    }

    /// Builds the payload for invoice creation, with `amount` set to the grand total.
    pub fn to_invoice(&self, created_on: DateTime<Utc>) -> Result<Invoice> {
        let summary = self.validate()?;
        Ok(Invoice {
            invoice_id: None,
            shop_id: self.shop_id.clone(),
            customer_id: self.customer_id.clone(),
            amount: summary.grand_total,
            payment_mode: self.payment_mode,
            invoice_number: self.invoice_number.clone(),
            due_date: self.due_date,
            discount: self.discount,
            discount_type: self.discount_type,
            tax_amount: self.tax_amount,
            items: self.items.iter().map(InvoiceLine::from).collect(),
            created_by: self.created_by,
            created_on: Some(created_on),
        })
    }
}

/// A quotation being assembled for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub quotation_number: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub terms: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Quotation {
    pub fn new(quotation_number: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            quotation_number: quotation_number.into(),
            date,
            terms: "Payment due within 30 days.".to_string(),
            items: Vec::new(),
        }
    }

    /// Adds `quantity` units of `product`.
    pub fn add_product(&mut self, product: &Product, quantity: f64) -> Result<()> {
        ensure_non_negative("quantity", quantity)?;
        self.items.push(LineItem::for_product(product, quantity));
        Ok(())
    }

    /// Removes the line at `index`.
    pub fn remove_line(&mut self, index: usize) -> Option<LineItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn summary(&self, tax_rate: f64) -> Result<QuotationSummary> {
        compute_quotation(&self.items, tax_rate)
    }
}
