use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable catalog product. `price` is in integer minor-currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub price: i64,
}

/// A design→product association. Returned by the store in insertion order;
/// `recommended` entries take precedence during resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignProductLink {
    pub product: Product,
    pub recommended: bool,
}
