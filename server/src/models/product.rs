// server/src/models/product.rs

use sqlx::FromRow;
use uuid::Uuid;

use teamkit_core::domain::{DesignProductLink, Product};

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub price: i64,
}

impl ProductRow {
  pub fn into_domain(self) -> Product {
    Product {
      id: self.id,
      name: self.name,
      slug: self.slug,
      price: self.price,
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct DesignProductLinkRow {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub price: i64,
  pub recommended: bool,
}

impl DesignProductLinkRow {
  pub fn into_domain(self) -> DesignProductLink {
    DesignProductLink {
      product: Product {
        id: self.id,
        name: self.name,
        slug: self.slug,
        price: self.price,
      },
      recommended: self.recommended,
    }
  }
}
