// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::Level;
use uuid::Uuid;

use teamkit_core::domain::{
    ApprovalStatus, ContributionStatus, DesignProductLink, DesignRequest, Order, OrderItem,
    PaymentContribution, PaymentStatus, Product, RequestStatus, TeamMember, TeamRole,
};
use teamkit_core::error::{EngineError, EngineResult};
use teamkit_core::gateway::{CheckoutPreference, PaymentGateway};
use teamkit_core::store::CommerceStore;
use teamkit_core::tracker::RosterFacts;
use teamkit_core::OrderStatus;

// --- In-memory CommerceStore ---

#[derive(Default)]
struct Inner {
    products: Vec<Product>,
    design_links: HashMap<Uuid, Vec<DesignProductLink>>,
    sports: HashMap<String, i64>,
    sport_products: HashMap<i64, Vec<Uuid>>,
    requests: HashMap<Uuid, DesignRequest>,
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    members: HashMap<Uuid, Vec<TeamMember>>,
    staff_roles: HashMap<(Uuid, Uuid), TeamRole>,
    rosters: HashMap<Uuid, RosterFacts>,
    contributions: Vec<PaymentContribution>,
}

/// Hash-map backed store with the same conditional-update semantics the
/// Postgres implementation provides. Failure toggles let tests exercise the
/// assembler's rollback paths.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
    pub fail_item_insert: AtomicBool,
    pub fail_approval_update: AtomicBool,
}

impl MemStore {
    pub fn new() -> Self {
        MemStore::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("MemStore poisoned")
    }

    // --- Seeding helpers ---

    pub fn add_product(&self, name: &str, slug: &str, price: i64) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            price,
        };
        self.lock().products.push(product.clone());
        product
    }

    pub fn link_design(&self, design_id: Uuid, product: &Product, recommended: bool) {
        self.lock()
            .design_links
            .entry(design_id)
            .or_default()
            .push(DesignProductLink { product: product.clone(), recommended });
    }

    pub fn add_sport(&self, slug: &str, sport_id: i64) {
        self.lock().sports.insert(slug.to_string(), sport_id);
    }

    pub fn link_sport_product(&self, sport_id: i64, product: &Product) {
        self.lock()
            .sport_products
            .entry(sport_id)
            .or_default()
            .push(product.id);
    }

    /// Seeds a team of `member_count` members; the first one is the owner.
    /// Returns the team id and member user ids.
    pub fn seed_team(&self, member_count: usize) -> (Uuid, Vec<Uuid>) {
        let team_id = Uuid::new_v4();
        let mut user_ids = Vec::with_capacity(member_count);
        let mut guard = self.lock();
        let members = guard.members.entry(team_id).or_default();
        for i in 0..member_count {
            let user_id = Uuid::new_v4();
            members.push(TeamMember {
                user_id,
                team_id,
                role: if i == 0 { TeamRole::Owner } else { TeamRole::Player },
                display_name: Some(format!("Player {i}")),
            });
            user_ids.push(user_id);
        }
        (team_id, user_ids)
    }

    pub fn add_member(&self, team_id: Uuid, role: TeamRole) -> Uuid {
        let user_id = Uuid::new_v4();
        self.lock().members.entry(team_id).or_default().push(TeamMember {
            user_id,
            team_id,
            role,
            display_name: None,
        });
        user_id
    }

    /// Grants a team role without putting the user on the order roster,
    /// mirroring staff accounts that manage a team they do not play for.
    pub fn add_staff_role(&self, team_id: Uuid, role: TeamRole) -> Uuid {
        let user_id = Uuid::new_v4();
        self.lock().staff_roles.insert((team_id, user_id), role);
        user_id
    }

    pub fn add_design_request(&self, request: DesignRequest) {
        self.lock().requests.insert(request.id, request);
    }

    pub fn set_roster_facts(&self, team_id: Uuid, facts: RosterFacts) {
        self.lock().rosters.insert(team_id, facts);
    }

    pub fn put_order(&self, order: Order) {
        self.lock().orders.push(order);
    }

    // --- Assertion helpers ---

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    pub fn items_for_order(&self, order_id: Uuid) -> Vec<OrderItem> {
        self.lock()
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect()
    }

    pub fn contribution_count(&self) -> usize {
        self.lock().contributions.len()
    }
}

#[async_trait]
impl CommerceStore for MemStore {
    async fn design_request(&self, id: Uuid) -> EngineResult<Option<DesignRequest>> {
        Ok(self.lock().requests.get(&id).cloned())
    }

    async fn design_requests_for_team(&self, team_id: Uuid) -> EngineResult<Vec<DesignRequest>> {
        Ok(self
            .lock()
            .requests
            .values()
            .filter(|r| r.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn approve_design_request(
        &self,
        id: Uuid,
        order_id: Uuid,
        approved_by: Uuid,
        approved_at: DateTime<Utc>,
    ) -> EngineResult<bool> {
        if self.fail_approval_update.load(Ordering::SeqCst) {
            return Err(EngineError::dependency(
                "approve_design_request",
                anyhow::anyhow!("simulated storage outage"),
            ));
        }
        let mut guard = self.lock();
        let Some(request) = guard.requests.get_mut(&id) else {
            return Ok(false);
        };
        if request.approval_status == ApprovalStatus::Approved {
            return Ok(false);
        }
        request.status = RequestStatus::Ready;
        request.approval_status = ApprovalStatus::Approved;
        request.order_id = Some(order_id);
        request.approved_by = Some(approved_by);
        request.approved_at = Some(approved_at);
        Ok(true)
    }

    async fn product(&self, id: Uuid) -> EngineResult<Option<Product>> {
        Ok(self.lock().products.iter().find(|p| p.id == id).cloned())
    }

    async fn product_by_slug(&self, slug: &str) -> EngineResult<Option<Product>> {
        Ok(self.lock().products.iter().find(|p| p.slug == slug).cloned())
    }

    async fn products_for_design(&self, design_id: Uuid) -> EngineResult<Vec<DesignProductLink>> {
        Ok(self
            .lock()
            .design_links
            .get(&design_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn sport_id_by_slug(&self, slug: &str) -> EngineResult<Option<i64>> {
        Ok(self.lock().sports.get(slug).copied())
    }

    async fn products_for_sport(&self, sport_id: i64) -> EngineResult<Vec<Product>> {
        let guard = self.lock();
        let ids = guard.sport_products.get(&sport_id).cloned().unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| guard.products.iter().find(|p| p.id == *id).cloned())
            .collect())
    }

    async fn any_product(&self) -> EngineResult<Option<Product>> {
        Ok(self.lock().products.first().cloned())
    }

    async fn team_role(&self, team_id: Uuid, user_id: Uuid) -> EngineResult<Option<TeamRole>> {
        let guard = self.lock();
        if let Some(role) = guard.staff_roles.get(&(team_id, user_id)) {
            return Ok(Some(*role));
        }
        Ok(guard
            .members
            .get(&team_id)
            .and_then(|members| members.iter().find(|m| m.user_id == user_id))
            .map(|m| m.role))
    }

    async fn team_members(&self, team_id: Uuid) -> EngineResult<Vec<TeamMember>> {
        Ok(self.lock().members.get(&team_id).cloned().unwrap_or_default())
    }

    async fn roster_facts(&self, team_id: Uuid) -> EngineResult<RosterFacts> {
        Ok(self.lock().rosters.get(&team_id).copied().unwrap_or_default())
    }

    async fn order(&self, id: Uuid) -> EngineResult<Option<Order>> {
        Ok(self.lock().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn orders_for_team(&self, team_id: Uuid) -> EngineResult<Vec<Order>> {
        Ok(self
            .lock()
            .orders
            .iter()
            .filter(|o| o.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn insert_order(&self, order: &Order) -> EngineResult<()> {
        self.lock().orders.push(order.clone());
        Ok(())
    }

    async fn insert_order_items(&self, items: &[OrderItem]) -> EngineResult<()> {
        if self.fail_item_insert.load(Ordering::SeqCst) {
            return Err(EngineError::dependency(
                "insert_order_items",
                anyhow::anyhow!("simulated batch insert failure"),
            ));
        }
        self.lock().items.extend_from_slice(items);
        Ok(())
    }

    async fn delete_order(&self, id: Uuid) -> EngineResult<()> {
        let mut guard = self.lock();
        guard.orders.retain(|o| o.id != id);
        guard.items.retain(|i| i.order_id != id);
        Ok(())
    }

    async fn recompute_order_totals(&self, order_id: Uuid) -> EngineResult<(i64, i64)> {
        let mut guard = self.lock();
        let subtotal: i64 = guard
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .map(|i| i.line_total())
            .sum();
        let Some(order) = guard.orders.iter_mut().find(|o| o.id == order_id) else {
            return Err(EngineError::not_found("order"));
        };
        order.subtotal = subtotal;
        order.total_amount = subtotal;
        order.updated_at = Utc::now();
        Ok((subtotal, subtotal))
    }

    async fn mark_order_paid(&self, order_id: Uuid) -> EngineResult<bool> {
        let mut guard = self.lock();
        let Some(order) = guard.orders.iter_mut().find(|o| o.id == order_id) else {
            return Err(EngineError::not_found("order"));
        };
        if order.payment_status == PaymentStatus::Paid {
            return Ok(false);
        }
        order.payment_status = PaymentStatus::Paid;
        if order.status == OrderStatus::Pending {
            order.status = OrderStatus::Paid;
        }
        order.updated_at = Utc::now();
        Ok(true)
    }

    async fn contribution(&self, id: Uuid) -> EngineResult<Option<PaymentContribution>> {
        Ok(self.lock().contributions.iter().find(|c| c.id == id).cloned())
    }

    async fn contribution_by_reference(
        &self,
        external_reference: &str,
    ) -> EngineResult<Option<PaymentContribution>> {
        Ok(self
            .lock()
            .contributions
            .iter()
            .find(|c| c.external_reference == external_reference && c.status != ContributionStatus::Rejected)
            .cloned())
    }

    async fn approved_contribution_exists(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> EngineResult<bool> {
        Ok(self.lock().contributions.iter().any(|c| {
            c.order_id == order_id && c.user_id == user_id && c.status == ContributionStatus::Approved
        }))
    }

    async fn insert_contribution(&self, contribution: &PaymentContribution) -> EngineResult<()> {
        self.lock().contributions.push(contribution.clone());
        Ok(())
    }

    async fn set_contribution_preference(
        &self,
        id: Uuid,
        preference_id: &str,
    ) -> EngineResult<()> {
        let mut guard = self.lock();
        let Some(contribution) = guard.contributions.iter_mut().find(|c| c.id == id) else {
            return Err(EngineError::not_found("payment contribution"));
        };
        contribution.preference_id = Some(preference_id.to_string());
        Ok(())
    }

    async fn settle_contribution(
        &self,
        id: Uuid,
        status: ContributionStatus,
        settled_at: DateTime<Utc>,
    ) -> EngineResult<bool> {
        let mut guard = self.lock();
        let Some(contribution) = guard.contributions.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        if contribution.status != ContributionStatus::Pending {
            return Ok(false);
        }
        contribution.status = status;
        contribution.settled_at = Some(settled_at);
        Ok(true)
    }

    async fn sum_approved_contributions(&self, order_id: Uuid) -> EngineResult<i64> {
        Ok(self
            .lock()
            .contributions
            .iter()
            .filter(|c| c.order_id == order_id && c.status == ContributionStatus::Approved)
            .map(|c| c.amount)
            .sum())
    }
}

// --- Mock payment gateway ---

#[derive(Default)]
pub struct MockGateway {
    counter: AtomicUsize,
    pub fail: AtomicBool,
    pub created_references: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        MockGateway::default()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_preference(
        &self,
        _order: &Order,
        _user_id: Uuid,
        _amount: i64,
        external_reference: &str,
    ) -> EngineResult<CheckoutPreference> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EngineError::dependency(
                "create_preference",
                anyhow::anyhow!("simulated gateway outage"),
            ));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        self.created_references
            .lock()
            .expect("MockGateway poisoned")
            .push(external_reference.to_string());
        Ok(CheckoutPreference {
            preference_id: format!("pref-{n}"),
            init_point: format!("https://checkout.test/init?ref={external_reference}"),
            sandbox_init_point: format!("https://sandbox.checkout.test/init?ref={external_reference}"),
        })
    }
}

// --- Fixture builders ---

/// Bare design request with no resolution hints; tests opt into hints.
pub fn blank_request(team_id: Uuid) -> DesignRequest {
    DesignRequest {
        id: Uuid::new_v4(),
        team_id,
        design_id: None,
        selected_apparel: None,
        product_slug: None,
        sport_slug: None,
        status: RequestStatus::Pending,
        approval_status: ApprovalStatus::Pending,
        order_id: None,
        mockup_count: 0,
        created_at: Utc::now(),
        approved_at: None,
        approved_by: None,
    }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer() // Important for tests to capture output
        .try_init()
        .ok();
});

pub fn setup_tracing() {
    Lazy::force(&TRACING_INIT);
}
