use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::product::ProductSnapshot;

/// Entrada de la lista de favoritos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub product_id: String,
    pub snapshot: ProductSnapshot,
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn from_product(product: &ProductSnapshot, added_at: DateTime<Utc>) -> Self {
        Self {
            product_id: product.id.clone(),
            snapshot: product.clone(),
            added_at,
        }
    }
}
