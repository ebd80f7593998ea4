use std::time::Duration;

use crowdfund_engine::{
    db_types::{Rupiah, TransactionStatus},
    traits::{ContributionDatabase, TransactionManagement},
    ContributionFlowError,
};
use cucumber::{given, then, when};

use crate::{
    cucumber::{world::ContributionSystem, CrowdfundWorld},
    support::{
        prepare_env::{backdate_transaction, campaign_ledger, drop_database, paid_sum, seed_campaign},
        scripted_provider::Script,
    },
};

#[given(expr = "a payment gateway that {word}")]
async fn gateway(world: &mut CrowdfundWorld, behaviour: String) {
    let script = match behaviour.as_str() {
        "accepts" => Script::Succeed,
        "rejects" => Script::Reject,
        "hangs" => Script::Hang,
        s => panic!("Unknown gateway behaviour: {s}"),
    };
    if let Some(mut old) = world.system.take() {
        let _ = old.api.db_mut().close().await;
        drop_database(&old.db_path).await;
    }
    world.system = Some(ContributionSystem::new(script).await);
}

#[given(expr = "a campaign {string} owned by user {int} with a goal of Rp {int}")]
async fn campaign(world: &mut CrowdfundWorld, name: String, owner: i64, goal: i64) {
    let campaign = seed_campaign(world.db(), owner, &name, goal).await;
    world.campaigns.insert(name, campaign.id);
}

#[when(expr = "{word} contributes Rp {int} to {string} as order {word}")]
async fn contribute(world: &mut CrowdfundWorld, backer: String, amount: i64, campaign: String, label: String) {
    let backer = world.backer(&backer);
    let campaign_id = world.campaign_id(&campaign);
    let result = world.api().create_transaction(campaign_id, backer, Rupiah::from(amount)).await;
    match result {
        Ok(contribution) => {
            world.orders.insert(label, contribution.transaction.code);
            world.last_error = None;
        },
        Err(e) => {
            let txs = world.db().fetch_transactions_for_campaign(campaign_id).await.unwrap();
            if let Some(tx) = txs.first() {
                world.orders.insert(label, tx.code.clone());
            }
            world.last_error = Some(e);
        },
    }
}

#[when(expr = "{word} tries to contribute Rp {int} to {string}")]
async fn try_contribute(world: &mut CrowdfundWorld, backer: String, amount: i64, campaign: String) {
    let backer = world.backer(&backer);
    let campaign_id = world.campaign_id(&campaign);
    world.last_error = world.api().create_transaction(campaign_id, backer, Rupiah::from(amount)).await.err();
}

#[when(expr = "the gateway reports {string} for order {word}")]
async fn notify(world: &mut CrowdfundWorld, status: String, label: String) {
    let code = world.order(&label);
    let (tx_status, payment_status) = match status.split_once('/') {
        Some((t, p)) => (t.to_string(), Some(p.to_string())),
        None => (status, None),
    };
    world.last_error =
        world.api().process_gateway_notification(&code, &tx_status, payment_status.as_deref()).await.err();
}

#[when(expr = "order {word} was created {int} hours ago")]
async fn backdate(world: &mut CrowdfundWorld, label: String, hours: i64) {
    let code = world.order(&label);
    backdate_transaction(world.db(), &code, chrono::Duration::hours(hours)).await;
}

#[when(expr = "the expiry job runs with a timeout of {int} hours")]
async fn expire(world: &mut CrowdfundWorld, hours: i64) {
    world.api().expire_stale_transactions(chrono::Duration::hours(hours)).await.expect("Error expiring transactions");
}

#[when(expr = "I pause for {int}ms")]
async fn pause(_world: &mut CrowdfundWorld, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[then(expr = "order {word} is {word}")]
async fn order_status(world: &mut CrowdfundWorld, label: String, status: String) {
    let expected = status.parse::<TransactionStatus>().expect("Not a transaction status");
    let code = world.order(&label);
    let tx = world.db().fetch_transaction_by_code(&code).await.unwrap().expect("Order not found");
    assert_eq!(tx.status, expected);
}

#[then(expr = "campaign {string} has raised Rp {int} from {int} backer(s)")]
async fn raised(world: &mut CrowdfundWorld, campaign: String, amount: i64, backers: i64) {
    let id = world.campaign_id(&campaign);
    assert_eq!(campaign_ledger(world.db(), id).await, (amount, backers));
    assert_eq!(paid_sum(world.db(), id).await, (amount, backers));
}

#[then(expr = "the request fails with a {word} error")]
async fn request_failed(world: &mut CrowdfundWorld, kind: String) {
    let err = world.last_error.as_ref().expect("The last request did not fail");
    let matched = match kind.as_str() {
        "validation" => matches!(err, ContributionFlowError::Validation(_)),
        "gateway" => matches!(err, ContributionFlowError::Gateway(_)),
        "not-found" => matches!(err, ContributionFlowError::NotFound(_)),
        "status" => matches!(err, ContributionFlowError::InvalidStatus(_)),
        k => panic!("Unknown error kind: {k}"),
    };
    assert!(matched, "Expected a {kind} error, got {err}");
}

#[then(expr = "the request succeeds")]
async fn request_succeeded(world: &mut CrowdfundWorld) {
    if let Some(e) = &world.last_error {
        panic!("Expected success, got {e}");
    }
}
