// tests/scenario_tests.rs
//
// End-to-end walk through one team's season: approve a design, split the
// payment three ways, watch the order flip to paid and production unlock.
mod common;

use common::*;
use teamkit_core::assembler::{ApprovalCommand, AssemblyOutcome, OrderAssembler};
use teamkit_core::domain::{OrderStatus, PaymentStatus, ProductionStage, SettlementOutcome};
use teamkit_core::ledger::ContributionLedger;
use teamkit_core::store::CommerceStore;
use teamkit_core::tracker::{team_progress, RosterFacts, StageState};
use uuid::Uuid;

#[tokio::test]
async fn three_member_team_from_approval_to_paid_order() {
    setup_tracing();
    let store = MemStore::new();
    let gateway = MockGateway::new();
    store.add_product("Team Jersey", "team-jersey", 10_000);
    let (team_id, members) = store.seed_team(3);
    store.set_roster_facts(team_id, RosterFacts { submissions: 3, self_confirmed: 3 });

    let mut request = blank_request(team_id);
    request.product_slug = Some("team-jersey".to_string());
    request.mockup_count = 1;
    store.add_design_request(request.clone());

    // Approval assembles a 3 x 10000 order.
    let record = OrderAssembler::new(&store)
        .approve(&ApprovalCommand {
            design_request_id: request.id,
            team_id,
            approved_by: members[0],
            target_order_id: None,
        })
        .await
        .unwrap();
    assert!(matches!(record.outcome, AssemblyOutcome::Created(_)));
    let order = record.outcome.order().clone();
    assert_eq!(order.total_amount, 30_000);
    assert_eq!(store.items_for_order(order.id).len(), 3);

    // Placement: requested + confirmed + roster done, payment outstanding.
    let orders = store.orders_for_team(team_id).await.unwrap();
    let requests = store.design_requests_for_team(team_id).await.unwrap();
    let roster = store.roster_facts(team_id).await.unwrap();
    let snapshot = team_progress(&requests, roster, &orders);
    assert_eq!(snapshot.placement_percent, 75);
    assert_eq!(snapshot.production[0].progress.percent, 0);

    // Three members each cover their share.
    let ledger = ContributionLedger::new(&store, &gateway);
    for (i, member) in members.iter().enumerate() {
        let initiated = ledger.initiate(order.id, *member, 10_000).await.unwrap();
        let settled = ledger
            .settle(initiated.contribution.id, SettlementOutcome::Approved)
            .await
            .unwrap();
        let is_last = i == members.len() - 1;
        assert_eq!(settled.order_paid, is_last);

        let current = store.order(order.id).await.unwrap().unwrap();
        let expected = if is_last { PaymentStatus::Paid } else { PaymentStatus::Pending };
        assert_eq!(current.payment_status, expected);
    }

    // Fully funded: placement hits 100% and production unlocks at the
    // first stage once fulfillment sets it.
    let mut paid = store.order(order.id).await.unwrap().unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);
    paid.current_stage = Some(ProductionStage::Printing);
    let requests = store.design_requests_for_team(team_id).await.unwrap();
    let snapshot = team_progress(&requests, roster, &[paid]);
    assert_eq!(snapshot.placement_percent, 100);
    let production = &snapshot.production[0].progress;
    assert_eq!(production.percent, 11);
    assert_eq!(production.stages[0].state, StageState::Active);

    // The booked request refuses a second approval, even from the owner.
    let err = OrderAssembler::new(&store)
        .approve(&ApprovalCommand {
            design_request_id: request.id,
            team_id,
            approved_by: members[0],
            target_order_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, teamkit_core::EngineError::AlreadyApproved));

    // And the paid order refuses further contributions.
    let err = ledger.initiate(order.id, Uuid::new_v4(), 1_000).await.unwrap_err();
    assert!(matches!(err, teamkit_core::EngineError::OrderAlreadyPaid));
}
