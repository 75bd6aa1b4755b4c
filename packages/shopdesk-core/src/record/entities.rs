//! Typed entities returned by the backend list endpoints.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::{FieldSource, RecordId, Value};
use crate::billing::UnitConversion;
use crate::error::Result;

/// A customer registered by a superadmin or shop admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl FieldSource for Customer {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" => self.id.as_ref()?.to_value(),
            "name" => Value::from(self.name.as_str()),
            "email" => Value::from(self.email.as_str()),
            "phone" => Value::from(self.phone.as_str()),
            "address" => Value::from(self.address.as_str()),
            _ => return None,
        };
        Some(Cow::Owned(value))
    }
}

/// A shop as listed on the superadmin shop screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub shop_type: String,
    #[serde(default)]
    pub package_type: String,
}

impl FieldSource for Shop {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" => self.id.as_ref()?.to_value(),
            "name" => Value::from(self.name.as_str()),
            "ownerName" => Value::from(self.owner_name.as_str()),
            "location" => Value::from(self.location.as_str()),
            "shopType" => Value::from(self.shop_type.as_str()),
            "packageType" => Value::from(self.package_type.as_str()),
            _ => return None,
        };
        Some(Cow::Owned(value))
    }
}

/// A product in a shop's catalogue.
///
/// Wire names are snake_case, matching the product form payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub shop_id: String,
    #[serde(default)]
    pub unit_id: String,
    #[serde(default)]
    pub base_unit: String,
    #[serde(default)]
    pub target_unit: String,
    #[serde(default = "default_conversion_factor")]
    pub conversion_factor: f64,
}

fn default_conversion_factor() -> f64 {
    1.0
}

impl Product {
    /// Creates a product with the form's defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            price: 0.0,
            quantity: 0.0,
            stock: 0,
            category: String::new(),
            keywords: String::new(),
            shop_id: String::new(),
            unit_id: String::new(),
            base_unit: String::new(),
            target_unit: String::new(),
            conversion_factor: default_conversion_factor(),
        }
    }

    /// Returns the unit conversion configured on this product, if both units are named.
    pub fn conversion(&self) -> Option<UnitConversion> {
        if self.base_unit.is_empty() || self.target_unit.is_empty() {
            return None;
        }
        Some(UnitConversion {
            base_unit: self.base_unit.clone(),
            target_unit: self.target_unit.clone(),
            factor: self.conversion_factor,
        })
    }

    /// Returns a copy with the quantity expressed in the target unit.
    ///
    /// Products without a configured conversion are returned unchanged.
    ///
    /// # Errors
    /// `CoreError::Validation` when the conversion factor is not positive.
    pub fn with_converted_quantity(&self) -> Result<Product> {
        match self.conversion() {
            Some(conversion) => Ok(Product {
                quantity: conversion.apply(self.quantity)?,
                ..self.clone()
            }),
            None => Ok(self.clone()),
        }
    }
}

impl FieldSource for Product {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" => self.id.as_ref()?.to_value(),
            "name" => Value::from(self.name.as_str()),
            "description" => Value::from(self.description.as_str()),
            "price" => Value::from(self.price),
            "quantity" => Value::from(self.quantity),
            "stock" => Value::from(self.stock),
            "category" => Value::from(self.category.as_str()),
            "keywords" => Value::from(self.keywords.as_str()),
            "shop_id" => Value::from(self.shop_id.as_str()),
            "unit_id" => Value::from(self.unit_id.as_str()),
            "base_unit" => Value::from(self.base_unit.as_str()),
            "target_unit" => Value::from(self.target_unit.as_str()),
            "conversion_factor" => Value::from(self.conversion_factor),
            _ => return None,
        };
        Some(Cow::Owned(value))
    }
}
