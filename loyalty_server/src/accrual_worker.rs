//! The reconciliation worker.
//!
//! A single long-lived task that, on a fixed cadence, sweeps every non-terminal order past the
//! accrual engine and applies the verdicts to the ledger. The worker is deliberately decoupled
//! from request handling: a slow or unavailable engine delays reconciliation, never uploads.

use log::*;
use loyalty_engine::{traits::LedgerStore, OrderFlowApi};
use tokio::{sync::watch, time::MissedTickBehavior};

use crate::integrations::accrual::{AccrualPollResult, AccrualSource};

/// Runs the reconciliation loop until `shutdown` flips to true. Spawn this; it only returns on
/// shutdown.
pub async fn run_accrual_worker<S, B>(
    source: S,
    api: OrderFlowApi<B>,
    poll_interval: std::time::Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    S: AccrualSource,
    B: LedgerStore,
{
    let mut timer = tokio::time::interval(poll_interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("⏲️ Accrual reconciliation worker started (every {}s)", poll_interval.as_secs());
    loop {
        tokio::select! {
            _ = timer.tick() => {},
            _ = shutdown.changed() => {},
        }
        if *shutdown.borrow() {
            break;
        }
        run_cycle(&source, &api, &mut shutdown).await;
        if *shutdown.borrow() {
            break;
        }
    }
    info!("⏲️ Accrual reconciliation worker stopped");
}

/// One sweep over the pending orders. Errors never escape a cycle; an order that could not be
/// reconciled now is simply picked up again on the next tick.
async fn run_cycle<S, B>(source: &S, api: &OrderFlowApi<B>, shutdown: &mut watch::Receiver<bool>)
where
    S: AccrualSource,
    B: LedgerStore,
{
    let pending = match api.pending_orders().await {
        Ok(orders) => orders,
        Err(e) => {
            error!("⏲️ Could not fetch the pending orders: {e}");
            return;
        },
    };
    if pending.is_empty() {
        return;
    }
    trace!("⏲️ Reconciling {} pending orders", pending.len());
    for order in pending {
        loop {
            match source.poll_order(order.number.as_str()).await {
                Ok(AccrualPollResult::Update(update)) => {
                    if let Err(e) = api.apply_accrual(update).await {
                        error!("⏲️ Could not apply the accrual verdict for {}: {e}", order.number);
                    }
                },
                Ok(AccrualPollResult::NotYetKnown) => {
                    trace!("⏲️ The accrual engine does not know {} yet", order.number);
                },
                // Pause the whole sweep, then re-poll the same order.
                Ok(AccrualPollResult::RateLimited(pause)) => {
                    warn!("⏲️ Rate limited by the accrual engine, pausing for {}s", pause.as_secs());
                    tokio::select! {
                        _ = tokio::time::sleep(pause) => continue,
                        _ = shutdown.changed() => return,
                    }
                },
                Err(e) => {
                    debug!("⏲️ Could not poll the accrual engine for {}: {e}", order.number);
                },
            }
            break;
        }
        if *shutdown.borrow() {
            return;
        }
    }
}
