//! Hyper client for the retail management backend.

use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use hyper::{Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shopdesk_core::billing::Invoice;
use shopdesk_core::config::ShopdeskConfig;
use shopdesk_core::record::{Customer, Product, Record, Shop};
use tracing::{debug, warn};

use crate::endpoints::Endpoint;
use crate::error::{ApiError, Result};
use crate::requests::{
    validate_customer, Acknowledgement, LoginRequest, LoginResponse, NewShop,
};
use crate::response::{decode_body, is_success_status, server_message};

/// Message reported when the backend refuses a login.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Typed client for every backend endpoint.
///
/// Requests are never retried. Each one is bounded by the configured timeout.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client<HttpConnector, Full<Bytes>>,
    timeout: Duration,
    token: Option<String>,
}

impl BackendClient {
    /// Creates a client from the shared configuration.
    ///
    /// # Errors
    /// `ApiError::InvalidRequest` when the base URL is not an `http://` URL.
    pub fn new(config: &ShopdeskConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let uri: Uri = base_url
            .parse()
            .map_err(|e| ApiError::InvalidRequest(format!("base URL '{}': {}", base_url, e)))?;
        if uri.scheme_str() != Some("http") || uri.host().is_none() {
            return Err(ApiError::InvalidRequest(format!(
                "base URL '{}' must be http://host[:port]",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            http: Client::builder(TokioExecutor::new()).build_http(),
            timeout: Duration::from_millis(config.request_timeout_ms),
            token: config.auth_token.clone(),
        })
    }

    /// Sets the bearer token sent with later requests.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request and returns the body of a success response.
    async fn send(&self, endpoint: &Endpoint, body: Option<Vec<u8>>) -> Result<Bytes> {
        let method = endpoint.method();
        let path = endpoint.path_and_query();
        let uri: Uri = format!("{}{}", self.base_url, path)
            .parse()
            .map_err(|e| ApiError::InvalidRequest(format!("{}: {}", path, e)))?;

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(uri)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(bytes) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Full::new(Bytes::from(bytes))
            }
            None => Full::new(Bytes::new()),
        };
        let request = builder
            .body(body)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        debug!(%method, %path, "Sending backend request");

        let exchange = async {
            let response = self
                .http
                .request(request)
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?
                .to_bytes();
            Ok::<_, ApiError>((status, bytes))
        };

        let (status, bytes) = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result
                .inspect_err(|e| warn!(%method, %path, error = %e, "Backend unreachable"))?,
            Err(_) => {
                let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(%method, %path, timeout_ms = millis, "Backend request timed out");
                return Err(ApiError::Timeout(millis));
            }
        };

        if !is_success_status(status) {
            let message = server_message(&bytes);
            warn!(%method, %path, status = status.as_u16(), ?message, "Backend rejected request");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        debug!(
            %method,
            %path,
            status = status.as_u16(),
            bytes = bytes.len(),
            "Backend request succeeded"
        );
        Ok(bytes)
    }

    /// Sends a bodyless request and decodes the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let bytes = self.send(endpoint, None).await?;
        decode_body(&bytes)
    }

    /// Sends `body` as JSON and decodes the JSON response.
    pub async fn post_json<B, T>(&self, endpoint: &Endpoint, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload =
            serde_json::to_vec(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let bytes = self.send(endpoint, Some(payload)).await?;
        decode_body(&bytes)
    }

    /// Fetches any list endpoint as untyped records.
    pub async fn list_records(&self, endpoint: &Endpoint) -> Result<Vec<Record>> {
        let json: serde_json::Value = self.get_json(endpoint).await?;
        Ok(Record::list_from_json(&json)?)
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.get_json(&Endpoint::ListCustomers).await
    }

    /// Creates a customer. The backend may answer 200 or 201.
    pub async fn create_customer(&self, customer: &Customer) -> Result<Acknowledgement> {
        validate_customer(customer)?;
        self.create(&Endpoint::CreateCustomer, customer).await
    }

    pub async fn list_shops(&self) -> Result<Vec<Shop>> {
        self.get_json(&Endpoint::ListShops).await
    }

    /// Validates and creates a shop together with its administrator.
    pub async fn create_shop(&self, shop: &NewShop) -> Result<Acknowledgement> {
        shop.validate()?;
        self.create(&Endpoint::CreateShop, shop).await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.get_json(&Endpoint::ListProducts).await
    }

    /// Creates a product, sending the quantity converted to the target unit.
    pub async fn create_product(&self, product: &Product) -> Result<Acknowledgement> {
        let product = product.with_converted_quantity()?;
        self.create(&Endpoint::CreateProduct, &product).await
    }

    /// Customers of one shop, for the shop admin screens.
    pub async fn admin_customers(&self, shop_id: &str) -> Result<Vec<Customer>> {
        self.get_json(&Endpoint::AdminCustomers {
            shop_id: shop_id.to_string(),
        })
        .await
    }

    /// Products of one shop, for the shop admin screens.
    pub async fn admin_products(&self, shop_id: &str) -> Result<Vec<Product>> {
        self.get_json(&Endpoint::AdminProducts {
            shop_id: shop_id.to_string(),
        })
        .await
    }

    pub async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        self.get_json(&Endpoint::AdminInvoices).await
    }

    /// Creates an invoice and returns the stored copy.
    ///
    /// When the backend answers with an empty body the submitted invoice is returned.
    pub async fn create_invoice(&self, invoice: &Invoice) -> Result<Invoice> {
        let created: Option<Invoice> = self.post_json(&Endpoint::CreateInvoice, invoice).await?;
        Ok(created.unwrap_or_else(|| invoice.clone()))
    }

    /// Logs in and returns the session token.
    ///
    /// On success the token is also attached to later requests.
    ///
    /// # Errors
    /// `ApiError::Server` with "Invalid username or password" when the
    /// backend answers `success: false`.
    pub async fn login(&mut self, request: &LoginRequest) -> Result<String> {
        request.validate()?;
        let response: LoginResponse = self.post_json(&Endpoint::Login, request).await?;
        if !response.success {
            return Err(ApiError::Server {
                status: 200,
                message: Some(INVALID_CREDENTIALS.to_string()),
            });
        }
        let token = response
            .token
            .ok_or_else(|| ApiError::Decode("login response has no token".to_string()))?;
        debug!(username = %request.username, "Login accepted");
        self.token = Some(token.clone());
        Ok(token)
    }

    async fn create<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<Acknowledgement> {
        let json: serde_json::Value = self.post_json(endpoint, body).await?;
        Ok(Acknowledgement {
            message: json
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        })
    }
}
