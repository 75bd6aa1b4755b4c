//! Request and response payloads for the create and login endpoints.

use serde::{Deserialize, Serialize};
use shopdesk_core::error::{CoreError, Result};
use shopdesk_core::record::Customer;

/// Checks the fields the customer form marks as required.
pub fn validate_customer(customer: &Customer) -> Result<()> {
    require("name", &customer.name)?;
    require("email", &customer.email)
}

/// Administrator created together with a new shop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopAdmin {
    pub name: String,
    pub email: String,
}

/// Body of `POST /shop`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShop {
    pub shop_name: String,
    pub shop_type: String,
    pub admin: ShopAdmin,
    pub package_type: String,
}

impl NewShop {
    /// Checks the fields the shop form marks as required.
    pub fn validate(&self) -> Result<()> {
        require("shopName", &self.shop_name)?;
        require("shopType", &self.shop_type)?;
        require("admin.name", &self.admin.name)?;
        require("admin.email", &self.admin.email)?;
        if !self.admin.email.contains('@') {
            return Err(CoreError::validation(
                "admin.email",
                "must be an email address",
            ));
        }
        require("packageType", &self.package_type)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(CoreError::validation(field, "is required"))
    } else {
        Ok(())
    }
}

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("username", &self.username)?;
        require("password", &self.password)
    }
}

/// Body returned by `POST /login`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
}

/// What a create endpoint answered with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Acknowledgement {
    /// The backend's `message`, when it sent one
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shop() -> NewShop {
        NewShop {
            shop_name: "Corner Store".into(),
            shop_type: "Grocery".into(),
            admin: ShopAdmin {
                name: "Dana".into(),
                email: "dana@example.com".into(),
            },
            package_type: "Gold".into(),
        }
    }

    #[test]
    fn test_new_shop_wire_shape() {
        assert_eq!(
            serde_json::to_value(shop()).unwrap(),
            json!({
                "shopName": "Corner Store",
                "shopType": "Grocery",
                "admin": {"name": "Dana", "email": "dana@example.com"},
                "packageType": "Gold"
            })
        );
    }

    #[test]
    fn test_new_shop_validation() {
        assert!(shop().validate().is_ok());

        let mut missing = shop();
        missing.shop_name = "  ".into();
        assert_eq!(
            missing.validate().unwrap_err(),
            CoreError::validation("shopName", "is required")
        );

        let mut bad_email = shop();
        bad_email.admin.email = "dana".into();
        assert!(bad_email.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_customer_requires_name_and_email() {
        let mut customer = Customer {
            id: None,
            name: "Bob".into(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
        };
        assert_eq!(
            validate_customer(&customer).unwrap_err(),
            CoreError::validation("email", "is required")
        );
        customer.email = "bob@example.com".into();
        assert!(validate_customer(&customer).is_ok());
    }

    #[test]
    fn test_login_response_defaults() {
        let response: LoginResponse = serde_json::from_value(json!({"success": false})).unwrap();
        assert!(!response.success);
        assert!(response.token.is_none());

        assert!(LoginRequest::new("admin", "").validate().is_err());
    }
}
