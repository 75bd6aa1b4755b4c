//! Runs backend calls on behalf of screens and forms.
//!
//! Every outcome lands in `Screen` or `FormState`. Nothing here returns an
//! error to the caller.

use std::future::Future;

use chrono::{DateTime, Utc};
use shopdesk_core::billing::{Invoice, InvoiceDraft};
use shopdesk_core::record::FieldSource;
use shopdesk_core::screen::{FormState, Screen};
use tracing::{info, warn};

use crate::client::{BackendClient, INVALID_CREDENTIALS};
use crate::error::{ApiError, Result};
use crate::requests::{Acknowledgement, LoginRequest};

/// Message shown when login fails for any reason other than bad credentials.
pub const LOGIN_FAILED: &str = "An error occurred. Please try again.";

/// Wording for one create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormAction {
    /// Completes "Error: Could not <name>."
    pub name: &'static str,
    /// Shown when the backend accepts the submission without its own message
    pub success: &'static str,
}

pub const ADD_CUSTOMER: FormAction = FormAction {
    name: "add customer",
    success: "Customer added successfully!",
};

pub const ADD_SHOP: FormAction = FormAction {
    name: "add shop",
    success: "Shop added successfully!",
};

pub const ADD_PRODUCT: FormAction = FormAction {
    name: "add product",
    success: "Product added successfully",
};

pub const CREATE_INVOICE: FormAction = FormAction {
    name: "create invoice",
    success: "Invoice created successfully",
};

/// Loads a screen from `fetch`.
///
/// On failure the previous records stay and the screen enters its error
/// state. Returns whether the load succeeded.
pub async fn load_screen<R, F>(screen: &mut Screen<R>, fetch: F) -> bool
where
    R: FieldSource + Clone,
    F: Future<Output = Result<Vec<R>>>,
{
    screen.begin_load();
    let result = fetch.await.map_err(|e| {
        warn!(screen = screen.name(), error = %e, "Screen load failed");
        e.user_message(&format!("load {}", screen.name()))
    });
    let loaded = result.is_ok();
    screen.finish_load(result);
    loaded
}

/// Submits a create form.
///
/// The backend's own `message` wins over the form's success text.
/// Returns whether the submission was accepted.
pub async fn submit_create<F>(form: &mut FormState, action: FormAction, submit: F) -> bool
where
    F: Future<Output = Result<Acknowledgement>>,
{
    form.begin_submit();
    match submit.await {
        Ok(ack) => {
            info!(action = action.name, "Form accepted");
            let text = ack.message.unwrap_or_else(|| action.success.to_string());
            form.finish_submit::<(), String>(Ok(()), &text)
        }
        Err(e) => fail(form, action.name, &e),
    }
}

/// Builds the invoice from `draft` and submits it.
///
/// A draft that fails validation never reaches the backend. Returns the
/// stored invoice on success.
pub async fn submit_invoice(
    form: &mut FormState,
    client: &BackendClient,
    draft: &InvoiceDraft,
    created_on: DateTime<Utc>,
) -> Option<Invoice> {
    form.begin_submit();
    let outcome = async {
        let invoice = draft.to_invoice(created_on)?;
        client.create_invoice(&invoice).await
    }
    .await;

    match outcome {
        Ok(invoice) => {
            let text = match &invoice.invoice_id {
                Some(id) => format!("{} with ID: {}", CREATE_INVOICE.success, id),
                None => CREATE_INVOICE.success.to_string(),
            };
            info!(invoice_id = ?invoice.invoice_id, amount = invoice.amount, "Invoice created");
            form.finish_submit::<(), String>(Ok(()), &text);
            Some(invoice)
        }
        Err(e) => {
            fail(form, CREATE_INVOICE.name, &e);
            None
        }
    }
}

/// Logs in through the admin form. Returns the token on success.
pub async fn login(
    form: &mut FormState,
    client: &mut BackendClient,
    request: &LoginRequest,
) -> Option<String> {
    form.begin_submit();
    match client.login(request).await {
        Ok(token) => {
            form.finish_submit::<(), String>(Ok(()), "Login successful");
            Some(token)
        }
        Err(e) => {
            let text = match &e {
                ApiError::Validation(_) => e.to_string(),
                ApiError::Server {
                    message: Some(message),
                    ..
                } if message == INVALID_CREDENTIALS => message.clone(),
                _ => LOGIN_FAILED.to_string(),
            };
            warn!(username = %request.username, error = %e, "Login failed");
            form.finish_submit::<(), String>(Err(text), "");
            None
        }
    }
}

fn fail(form: &mut FormState, action: &str, error: &ApiError) -> bool {
    warn!(action, %error, "Form submission failed");
    form.finish_submit::<(), String>(Err(error.user_message(action)), "")
}
