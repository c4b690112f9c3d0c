use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether the order may still receive new line items.
    pub fn accepts_items(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Paid | OrderStatus::Processing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// Fixed post-payment manufacturing pipeline, in production order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStage {
    Printing,
    Cutting,
    Sewing,
    MetalDetection,
    Ironing,
    QualityControl,
    Packaging,
    Shipping,
    Delivered,
}

impl ProductionStage {
    pub const ALL: [ProductionStage; 9] = [
        ProductionStage::Printing,
        ProductionStage::Cutting,
        ProductionStage::Sewing,
        ProductionStage::MetalDetection,
        ProductionStage::Ironing,
        ProductionStage::QualityControl,
        ProductionStage::Packaging,
        ProductionStage::Shipping,
        ProductionStage::Delivered,
    ];

    /// Zero-based position in the fixed stage order.
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or(0)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProductionStage::Printing => "printing",
            ProductionStage::Cutting => "cutting",
            ProductionStage::Sewing => "sewing",
            ProductionStage::MetalDetection => "metal_detection",
            ProductionStage::Ironing => "ironing",
            ProductionStage::QualityControl => "quality_control",
            ProductionStage::Packaging => "packaging",
            ProductionStage::Shipping => "shipping",
            ProductionStage::Delivered => "delivered",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == value)
    }
}

/// The purchasable aggregate of line items for a team, with one overall
/// payment status. Monetary totals are integer minor-currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub team_id: Uuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub current_stage: Option<ProductionStage>,
    pub subtotal: i64,
    pub total_amount: i64,
    /// Once set, the order is immutable to new items.
    pub locked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Fresh pending order priced at `total`.
    pub fn new_pending(team_id: Uuid, total: i64, now: DateTime<Utc>) -> Self {
        Order {
            id: Uuid::new_v4(),
            team_id,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            current_stage: None,
            subtotal: total,
            total_amount: total,
            locked_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One priced line, one per team member, belonging to an order.
/// The line total is derived, never stored as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i32,
    /// The team member this line belongs to.
    pub player_id: Uuid,
    pub size: Option<String>,
    pub number: Option<String>,
    pub notes: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}
