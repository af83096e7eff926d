use serde::{Deserialize, Serialize};

use crate::models::validation::FieldErrors;

/// Campos del producto necesarios para pintarlo sin volver a pedirlo al backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ProductSnapshot {
    pub fn new(id: &str, name: &str, price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            slug: None,
            price,
            discount_price: None,
            image: None,
            brand: None,
            category: None,
        }
    }

    /// Precio a mostrar (descuento si existe)
    pub fn effective_price(&self) -> f64 {
        self.discount_price.unwrap_or(self.price)
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.id.trim().is_empty() {
            errors.add("id", "El id del producto es obligatorio");
        }
        if self.name.trim().is_empty() {
            errors.add("name", "El nombre del producto es obligatorio");
        }
        if !self.price.is_finite() || self.price < 0.0 {
            errors.add("price", "El precio debe ser un número positivo");
        }
        if let Some(discount) = self.discount_price {
            if !discount.is_finite() || discount < 0.0 {
                errors.add("discountPrice", "El descuento debe ser un número positivo");
            }
        }
        errors.into_result()
    }
}
