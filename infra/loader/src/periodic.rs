use crate::definition::{DefinitionParser, DefinitionSource};
use crate::loader::CredentialsLoader;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Runs `loader` every `period` on a dedicated task until `shutdown` turns `true`
/// or its sender is dropped.
///
/// The first pass starts immediately. Passes never overlap; a pass that
/// outlasts the period delays the next tick instead of bunching them up.
/// A failed fetch is logged and retried on the next tick.
///
/// The handle resolves to the loader once the loop exits, after any
/// in-progress pass has finished.
pub fn spawn_periodic<S, P>(
    mut loader: CredentialsLoader<S, P>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<CredentialsLoader<S, P>>
where
    S: DefinitionSource,
    P: DefinitionParser<S::Definition>,
{
    let period = period.max(MIN_PERIOD);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period = ?period, mode = %loader.mode(), "Periodic reconciliation started");

        while !*shutdown.borrow_and_update() {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                },
                _ = ticker.tick() => {
                    if let Err(e) = loader.reconcile().await {
                        warn!(error = %e, "Reconcile pass failed; keeping previous state");
                    }
                },
            }
        }

        info!("Periodic reconciliation stopped");
        loader
    })
}
