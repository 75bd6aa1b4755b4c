//! Command execution. Every command renders its result to a string.

use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use shopdesk_api::actions::{self, FormAction, ADD_CUSTOMER, ADD_PRODUCT, ADD_SHOP};
use shopdesk_api::requests::{Acknowledgement, LoginRequest, NewShop, ShopAdmin};
use shopdesk_api::{BackendClient, Endpoint};
use shopdesk_core::billing::{convert, format_amount, InvoiceDraft, Quotation};
use shopdesk_core::config::ShopdeskConfig;
use shopdesk_core::record::{Customer, Product, Record};
use shopdesk_core::screen::{FormState, LoadState, MessageKind, Screen};
use shopdesk_core::view::DEFAULT_PAGE_SIZE;
use shopdesk_core::SortOrder;
use tracing::{debug, info};

use crate::cli::{Cli, Command, ListArgs, ProductArgs};
use crate::output;

/// A list screen: the fields its search box covers and the columns it prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListScreen {
    pub name: &'static str,
    pub search_fields: &'static [&'static str],
    pub columns: &'static [&'static str],
}

pub const CUSTOMERS: ListScreen = ListScreen {
    name: "customers",
    search_fields: &["name", "email", "phone"],
    columns: &["id", "name", "email", "phone", "address"],
};

pub const SHOPS: ListScreen = ListScreen {
    name: "shops",
    search_fields: &["id", "name", "ownerName", "location"],
    columns: &["id", "name", "ownerName", "location", "shopType", "packageType"],
};

pub const PRODUCTS: ListScreen = ListScreen {
    name: "products",
    search_fields: &["name", "description", "category", "price"],
    columns: &["id", "name", "category", "price", "quantity", "stock"],
};

pub const INVOICES: ListScreen = ListScreen {
    name: "invoices",
    search_fields: &["invoiceNumber", "customerId", "paymentMode"],
    columns: &[
        "invoiceId",
        "invoiceNumber",
        "customerId",
        "amount",
        "paymentMode",
        "dueDate",
    ],
};

impl Cli {
    pub fn config(&self) -> ShopdeskConfig {
        ShopdeskConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.timeout_ms,
            auth_token: self.token.clone(),
            ..ShopdeskConfig::default()
        }
    }
}

/// Runs one command.
///
/// # Errors
/// Fails when a local input cannot be read or a backend action is rejected.
pub async fn run(cli: Cli) -> Result<String> {
    let config = cli.config();
    match cli.command {
        Command::Customers(list) => {
            list_screen(&config, CUSTOMERS, Endpoint::ListCustomers, &list).await
        }
        Command::Shops(list) => list_screen(&config, SHOPS, Endpoint::ListShops, &list).await,
        Command::Products(list) => {
            list_screen(&config, PRODUCTS, Endpoint::ListProducts, &list).await
        }
        Command::Invoices(list) => {
            list_screen(&config, INVOICES, Endpoint::AdminInvoices, &list).await
        }
        Command::AdminCustomers { shop_id, list } => {
            list_screen(&config, CUSTOMERS, Endpoint::AdminCustomers { shop_id }, &list).await
        }
        Command::AdminProducts { shop_id, list } => {
            list_screen(&config, PRODUCTS, Endpoint::AdminProducts { shop_id }, &list).await
        }
        Command::AddCustomer {
            name,
            email,
            phone,
            address,
        } => {
            let client = BackendClient::new(&config)?;
            let customer = Customer {
                id: None,
                name,
                email,
                phone,
                address,
            };
            submit(ADD_CUSTOMER, client.create_customer(&customer)).await
        }
        Command::AddShop {
            shop_name,
            shop_type,
            admin_name,
            admin_email,
            package_type,
        } => {
            let client = BackendClient::new(&config)?;
            let shop = NewShop {
                shop_name,
                shop_type,
                admin: ShopAdmin {
                    name: admin_name,
                    email: admin_email,
                },
                package_type,
            };
            submit(ADD_SHOP, client.create_shop(&shop)).await
        }
        Command::AddProduct(args) => {
            let client = BackendClient::new(&config)?;
            submit(ADD_PRODUCT, client.create_product(&product_from(args))).await
        }
        Command::Login { username, password } => {
            let mut client = BackendClient::new(&config)?;
            let mut form = FormState::new();
            let request = LoginRequest::new(username, password);
            match actions::login(&mut form, &mut client, &request).await {
                Some(token) => Ok(token),
                None => bail!(form_error(&form)),
            }
        }
        Command::InvoiceTotal { file } => {
            let draft: InvoiceDraft = read_json(&file)?;
            let summary = draft.summary()?;
            Ok(output::render_invoice_summary(&summary))
        }
        Command::SubmitInvoice { file } => {
            let draft: InvoiceDraft = read_json(&file)?;
            let client = BackendClient::new(&config)?;
            let mut form = FormState::new();
            match actions::submit_invoice(&mut form, &client, &draft, Utc::now()).await {
                Some(invoice) => {
                    info!(invoice_id = ?invoice.invoice_id, "Invoice submitted");
                    Ok(form_text(&form))
                }
                None => bail!(form_error(&form)),
            }
        }
        Command::QuotationTotal { file, tax_rate } => {
            let quotation: Quotation = read_json(&file)?;
            let summary = quotation.summary(tax_rate.unwrap_or(config.quotation_tax_rate))?;
            Ok(output::render_quotation(&quotation, &summary))
        }
        Command::Convert { quantity, factor } => Ok(format_amount(convert(quantity, factor)?)),
    }
}

/// Loads a list screen, applies the list options and renders one page.
async fn list_screen(
    config: &ShopdeskConfig,
    kind: ListScreen,
    endpoint: Endpoint,
    args: &ListArgs,
) -> Result<String> {
    let page_size = args
        .page_size
        .or(NonZeroUsize::new(config.page_size))
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let mut screen: Screen<Record> = Screen::new(kind.name, kind.search_fields, page_size);

    match &args.from_file {
        Some(path) => {
            let json: serde_json::Value = read_json(path)?;
            screen.load(Record::list_from_json(&json)?);
        }
        None => {
            let client = BackendClient::new(config)?;
            actions::load_screen(&mut screen, client.list_records(&endpoint)).await;
            if let LoadState::Failed(message) = screen.state() {
                bail!("{}", message);
            }
        }
    }

    screen.set_search(args.search.as_str());
    for (field, value) in &args.filters {
        screen.set_filter(field.as_str(), value.as_str());
    }
    if let Some(field) = &args.sort {
        let order = if args.desc { SortOrder::Desc } else { SortOrder::Asc };
        screen.set_sort(field.as_str(), order);
    }
    screen.go_to_page(args.page);

    let page = screen.visible();
    debug!(
        screen = kind.name,
        total_items = page.total_items,
        total_pages = page.total_pages,
        "Derived list page"
    );

    if args.json {
        Ok(serde_json::to_string_pretty(&page)?)
    } else {
        Ok(output::render_page(&page, kind.columns))
    }
}

async fn submit<F>(action: FormAction, request: F) -> Result<String>
where
    F: std::future::Future<Output = shopdesk_api::Result<Acknowledgement>>,
{
    let mut form = FormState::new();
    if actions::submit_create(&mut form, action, request).await {
        Ok(form_text(&form))
    } else {
        bail!(form_error(&form))
    }
}

fn product_from(args: ProductArgs) -> Product {
    Product {
        description: args.description,
        price: args.price,
        quantity: args.quantity,
        stock: args.stock,
        category: args.category,
        keywords: args.keywords,
        shop_id: args.shop_id,
        unit_id: args.unit_id,
        base_unit: args.base_unit,
        target_unit: args.target_unit,
        conversion_factor: args.conversion_factor,
        ..Product::new(args.name)
    }
}

fn form_text(form: &FormState) -> String {
    form.message().map(|m| m.text.clone()).unwrap_or_default()
}

fn form_error(form: &FormState) -> String {
    match form.message() {
        Some(message) if message.kind == MessageKind::Error => message.text.clone(),
        _ => "An error occurred. Please try again.".to_string(),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}
