//! Backend endpoint table.

use hyper::Method;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Every backend endpoint the front end calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /customer`
    ListCustomers,
    /// `POST /customer`
    CreateCustomer,
    /// `GET /shop`
    ListShops,
    /// `POST /shop`
    CreateShop,
    /// `GET /product`
    ListProducts,
    /// `POST /product`
    CreateProduct,
    /// `GET /api/admin/customers?shopId=`
    AdminCustomers { shop_id: String },
    /// `GET /api/admin/products?shopId=`
    AdminProducts { shop_id: String },
    /// `GET /api/admin/invoices`
    AdminInvoices,
    /// `POST /api/v1.0/invoice`
    CreateInvoice,
    /// `POST /login`
    Login,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::ListCustomers
            | Endpoint::ListShops
            | Endpoint::ListProducts
            | Endpoint::AdminCustomers { .. }
            | Endpoint::AdminProducts { .. }
            | Endpoint::AdminInvoices => Method::GET,
            Endpoint::CreateCustomer
            | Endpoint::CreateShop
            | Endpoint::CreateProduct
            | Endpoint::CreateInvoice
            | Endpoint::Login => Method::POST,
        }
    }

    /// Path and query string, with query values percent-encoded.
    pub fn path_and_query(&self) -> String {
        match self {
            Endpoint::ListCustomers | Endpoint::CreateCustomer => "/customer".to_string(),
            Endpoint::ListShops | Endpoint::CreateShop => "/shop".to_string(),
            Endpoint::ListProducts | Endpoint::CreateProduct => "/product".to_string(),
            Endpoint::AdminCustomers { shop_id } => {
                format!("/api/admin/customers?shopId={}", encode(shop_id))
            }
            Endpoint::AdminProducts { shop_id } => {
                format!("/api/admin/products?shopId={}", encode(shop_id))
            }
            Endpoint::AdminInvoices => "/api/admin/invoices".to_string(),
            Endpoint::CreateInvoice => "/api/v1.0/invoice".to_string(),
            Endpoint::Login => "/login".to_string(),
        }
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}
