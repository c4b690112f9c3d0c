// server/src/storage.rs

//! Postgres implementation of the engine's storage trait.
//!
//! Every conditional guarantee the engine relies on lives in the WHERE
//! clause of a single UPDATE here; the returned row count tells the engine
//! whether its write won.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use teamkit_core::domain::{
  ContributionStatus, DesignProductLink, DesignRequest, Order, OrderItem, PaymentContribution,
  Product, TeamMember, TeamRole,
};
use teamkit_core::tracker::RosterFacts;
use teamkit_core::{CommerceStore, EngineError, EngineResult};

use crate::models::{
  self, DesignProductLinkRow, DesignRequestRow, OrderRow, PaymentContributionRow, ProductRow,
  TeamMemberRow,
};

const SCHEMA: &str = include_str!("../schema.sql");

pub struct PgStore {
  pool: PgPool,
}

fn db_err(operation: &str, err: sqlx::Error) -> EngineError {
  EngineError::dependency(operation, err)
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    PgStore { pool }
  }

  /// Applies `schema.sql`. Statements are idempotent, so this is safe to
  /// run on every startup.
  pub async fn apply_schema(&self) -> EngineResult<()> {
    sqlx::raw_sql(SCHEMA)
      .execute(&self.pool)
      .await
      .map_err(|e| db_err("apply_schema", e))?;
    Ok(())
  }
}

#[async_trait]
impl CommerceStore for PgStore {
  async fn design_request(&self, id: Uuid) -> EngineResult<Option<DesignRequest>> {
    let row = sqlx::query_as::<_, DesignRequestRow>("SELECT * FROM design_requests WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| db_err("design_request", e))?;
    row.map(DesignRequestRow::into_domain).transpose()
  }

  async fn design_requests_for_team(&self, team_id: Uuid) -> EngineResult<Vec<DesignRequest>> {
    let rows = sqlx::query_as::<_, DesignRequestRow>(
      "SELECT * FROM design_requests WHERE team_id = $1 ORDER BY created_at",
    )
    .bind(team_id)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| db_err("design_requests_for_team", e))?;
    rows.into_iter().map(DesignRequestRow::into_domain).collect()
  }

  async fn approve_design_request(
    &self,
    id: Uuid,
    order_id: Uuid,
    approved_by: Uuid,
    approved_at: DateTime<Utc>,
  ) -> EngineResult<bool> {
    let result = sqlx::query(
      "UPDATE design_requests
             SET status = 'ready',
                 approval_status = 'approved',
                 order_id = $2,
                 approved_by = $3,
                 approved_at = $4
             WHERE id = $1 AND approval_status <> 'approved'",
    )
    .bind(id)
    .bind(order_id)
    .bind(approved_by)
    .bind(approved_at)
    .execute(&self.pool)
    .await
    .map_err(|e| db_err("approve_design_request", e))?;
    Ok(result.rows_affected() == 1)
  }

  async fn product(&self, id: Uuid) -> EngineResult<Option<Product>> {
    let row =
      sqlx::query_as::<_, ProductRow>("SELECT id, name, slug, price FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("product", e))?;
    Ok(row.map(ProductRow::into_domain))
  }

  async fn product_by_slug(&self, slug: &str) -> EngineResult<Option<Product>> {
    let row =
      sqlx::query_as::<_, ProductRow>("SELECT id, name, slug, price FROM products WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("product_by_slug", e))?;
    Ok(row.map(ProductRow::into_domain))
  }

  async fn products_for_design(&self, design_id: Uuid) -> EngineResult<Vec<DesignProductLink>> {
    let rows = sqlx::query_as::<_, DesignProductLinkRow>(
      "SELECT p.id, p.name, p.slug, p.price, dp.recommended
             FROM design_products dp
             JOIN products p ON p.id = dp.product_id
             WHERE dp.design_id = $1
             ORDER BY dp.position",
    )
    .bind(design_id)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| db_err("products_for_design", e))?;
    Ok(rows.into_iter().map(DesignProductLinkRow::into_domain).collect())
  }

  async fn sport_id_by_slug(&self, slug: &str) -> EngineResult<Option<i64>> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM sports WHERE slug = $1")
      .bind(slug)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| db_err("sport_id_by_slug", e))
  }

  async fn products_for_sport(&self, sport_id: i64) -> EngineResult<Vec<Product>> {
    // product_sports.sport_id is text with legacy rows; match the textual
    // form of the numeric id.
    let rows = sqlx::query_as::<_, ProductRow>(
      "SELECT p.id, p.name, p.slug, p.price
             FROM product_sports ps
             JOIN products p ON p.id = ps.product_id
             WHERE btrim(ps.sport_id) = $1
             ORDER BY p.created_at",
    )
    .bind(sport_id.to_string())
    .fetch_all(&self.pool)
    .await
    .map_err(|e| db_err("products_for_sport", e))?;
    Ok(rows.into_iter().map(ProductRow::into_domain).collect())
  }

  async fn any_product(&self) -> EngineResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(
      "SELECT id, name, slug, price FROM products ORDER BY created_at LIMIT 1",
    )
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| db_err("any_product", e))?;
    Ok(row.map(ProductRow::into_domain))
  }

  async fn team_role(&self, team_id: Uuid, user_id: Uuid) -> EngineResult<Option<TeamRole>> {
    let role = sqlx::query_scalar::<_, String>(
      "SELECT role FROM team_members WHERE team_id = $1 AND user_id = $2",
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| db_err("team_role", e))?;
    role.as_deref().map(models::team_role).transpose()
  }

  async fn team_members(&self, team_id: Uuid) -> EngineResult<Vec<TeamMember>> {
    let rows = sqlx::query_as::<_, TeamMemberRow>(
      "SELECT user_id, team_id, role, display_name
             FROM team_members
             WHERE team_id = $1 AND on_roster
             ORDER BY joined_at",
    )
    .bind(team_id)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| db_err("team_members", e))?;
    rows.into_iter().map(TeamMemberRow::into_domain).collect()
  }

  async fn roster_facts(&self, team_id: Uuid) -> EngineResult<RosterFacts> {
    let (submissions, self_confirmed) = sqlx::query_as::<_, (i64, i64)>(
      "SELECT COUNT(*), COUNT(*) FILTER (WHERE self_confirmed)
             FROM player_info
             WHERE team_id = $1",
    )
    .bind(team_id)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| db_err("roster_facts", e))?;
    Ok(RosterFacts {
      submissions: submissions as u32,
      self_confirmed: self_confirmed as u32,
    })
  }

  async fn order(&self, id: Uuid) -> EngineResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| db_err("order", e))?;
    row.map(OrderRow::into_domain).transpose()
  }

  async fn orders_for_team(&self, team_id: Uuid) -> EngineResult<Vec<Order>> {
    let rows =
      sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE team_id = $1 ORDER BY created_at")
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("orders_for_team", e))?;
    rows.into_iter().map(OrderRow::into_domain).collect()
  }

  async fn insert_order(&self, order: &Order) -> EngineResult<()> {
    sqlx::query(
      "INSERT INTO orders (id, team_id, status, payment_status, current_stage,
                                 subtotal, total_amount, locked_at, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(order.id)
    .bind(order.team_id)
    .bind(models::order_status_str(order.status))
    .bind(models::payment_status_str(order.payment_status))
    .bind(order.current_stage.map(|s| s.as_str()))
    .bind(order.subtotal)
    .bind(order.total_amount)
    .bind(order.locked_at)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&self.pool)
    .await
    .map_err(|e| db_err("insert_order", e))?;
    Ok(())
  }

  async fn insert_order_items(&self, items: &[OrderItem]) -> EngineResult<()> {
    let mut tx = self.pool.begin().await.map_err(|e| db_err("insert_order_items", e))?;
    for item in items {
      sqlx::query(
        "INSERT INTO order_items (id, order_id, product_id, product_name,
                                        unit_price, quantity, player_id, size, number, notes)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
      )
      .bind(item.id)
      .bind(item.order_id)
      .bind(item.product_id)
      .bind(&item.product_name)
      .bind(item.unit_price)
      .bind(item.quantity)
      .bind(item.player_id)
      .bind(&item.size)
      .bind(&item.number)
      .bind(&item.notes)
      .execute(&mut *tx)
      .await
      .map_err(|e| db_err("insert_order_items", e))?;
    }
    tx.commit().await.map_err(|e| db_err("insert_order_items", e))?;
    Ok(())
  }

  async fn delete_order(&self, id: Uuid) -> EngineResult<()> {
    // order_items rows cascade.
    sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| db_err("delete_order", e))?;
    Ok(())
  }

  async fn recompute_order_totals(&self, order_id: Uuid) -> EngineResult<(i64, i64)> {
    let row = sqlx::query_as::<_, (i64, i64)>(
      "UPDATE orders o
             SET subtotal = t.total, total_amount = t.total, updated_at = now()
             FROM (SELECT COALESCE(SUM(unit_price * quantity), 0)::BIGINT AS total
                   FROM order_items WHERE order_id = $1) t
             WHERE o.id = $1
             RETURNING o.subtotal, o.total_amount",
    )
    .bind(order_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| db_err("recompute_order_totals", e))?;
    row.ok_or_else(|| EngineError::not_found("order"))
  }

  async fn mark_order_paid(&self, order_id: Uuid) -> EngineResult<bool> {
    let result = sqlx::query(
      "UPDATE orders
             SET payment_status = 'paid',
                 status = CASE WHEN status = 'pending' THEN 'paid' ELSE status END,
                 updated_at = now()
             WHERE id = $1 AND payment_status <> 'paid'",
    )
    .bind(order_id)
    .execute(&self.pool)
    .await
    .map_err(|e| db_err("mark_order_paid", e))?;
    Ok(result.rows_affected() == 1)
  }

  async fn contribution(&self, id: Uuid) -> EngineResult<Option<PaymentContribution>> {
    let row = sqlx::query_as::<_, PaymentContributionRow>(
      "SELECT * FROM payment_contributions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| db_err("contribution", e))?;
    row.map(PaymentContributionRow::into_domain).transpose()
  }

  async fn contribution_by_reference(
    &self,
    external_reference: &str,
  ) -> EngineResult<Option<PaymentContribution>> {
    let row = sqlx::query_as::<_, PaymentContributionRow>(
      "SELECT * FROM payment_contributions
             WHERE external_reference = $1 AND status <> 'rejected'
             ORDER BY created_at DESC
             LIMIT 1",
    )
    .bind(external_reference)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| db_err("contribution_by_reference", e))?;
    row.map(PaymentContributionRow::into_domain).transpose()
  }

  async fn approved_contribution_exists(
    &self,
    order_id: Uuid,
    user_id: Uuid,
  ) -> EngineResult<bool> {
    sqlx::query_scalar::<_, bool>(
      "SELECT EXISTS (
                SELECT 1 FROM payment_contributions
                WHERE order_id = $1 AND user_id = $2 AND status = 'approved'
            )",
    )
    .bind(order_id)
    .bind(user_id)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| db_err("approved_contribution_exists", e))
  }

  async fn insert_contribution(&self, contribution: &PaymentContribution) -> EngineResult<()> {
    sqlx::query(
      "INSERT INTO payment_contributions (id, order_id, user_id, amount, status,
                                                external_reference, preference_id, created_at, settled_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(contribution.id)
    .bind(contribution.order_id)
    .bind(contribution.user_id)
    .bind(contribution.amount)
    .bind(models::contribution_status_str(contribution.status))
    .bind(&contribution.external_reference)
    .bind(&contribution.preference_id)
    .bind(contribution.created_at)
    .bind(contribution.settled_at)
    .execute(&self.pool)
    .await
    .map_err(|e| db_err("insert_contribution", e))?;
    Ok(())
  }

  async fn set_contribution_preference(&self, id: Uuid, preference_id: &str) -> EngineResult<()> {
    let result = sqlx::query("UPDATE payment_contributions SET preference_id = $2 WHERE id = $1")
      .bind(id)
      .bind(preference_id)
      .execute(&self.pool)
      .await
      .map_err(|e| db_err("set_contribution_preference", e))?;
    if result.rows_affected() == 0 {
      return Err(EngineError::not_found("payment contribution"));
    }
    Ok(())
  }

  async fn settle_contribution(
    &self,
    id: Uuid,
    status: ContributionStatus,
    settled_at: DateTime<Utc>,
  ) -> EngineResult<bool> {
    let result = sqlx::query(
      "UPDATE payment_contributions
             SET status = $2, settled_at = $3
             WHERE id = $1 AND status = 'pending'",
    )
    .bind(id)
    .bind(models::contribution_status_str(status))
    .bind(settled_at)
    .execute(&self.pool)
    .await
    .map_err(|e| db_err("settle_contribution", e))?;
    Ok(result.rows_affected() == 1)
  }

  async fn sum_approved_contributions(&self, order_id: Uuid) -> EngineResult<i64> {
    sqlx::query_scalar::<_, i64>(
      "SELECT COALESCE(SUM(amount), 0)::BIGINT
             FROM payment_contributions
             WHERE order_id = $1 AND status = 'approved'",
    )
    .bind(order_id)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| db_err("sum_approved_contributions", e))
  }
}
