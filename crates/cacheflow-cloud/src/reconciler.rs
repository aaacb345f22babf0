//! One reconciliation tick
//!
//! Connects, observes, then issues at most one of create/update/delete. The
//! `Synced` condition records whether the tick succeeded. Requeueing and
//! backoff belong to the caller.

use crate::action::ReconcileOutcome;
use crate::condition::Condition;
use crate::context::CallContext;
use crate::error::Result;
use crate::provider::Connector;
use crate::resource::CacheCluster;
use tracing::{info, warn};

pub struct Reconciler<K> {
    connector: K,
}

impl<K: Connector> Reconciler<K> {
    pub fn new(connector: K) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &K {
        &self.connector
    }

    /// Run one tick against `cr`, recording the result as a `Synced` condition.
    pub async fn reconcile(&self, cr: &mut CacheCluster, ctx: CallContext) -> Result<ReconcileOutcome> {
        let result = self.tick(cr, ctx).await;
        match &result {
            Ok(outcome) => {
                cr.status.conditions.set(Condition::reconcile_success());
                info!(
                    cache_cluster = %cr.external_name(),
                    outcome = %outcome,
                    action = %outcome.action_type(),
                    "Reconciled cache cluster"
                );
            }
            Err(e) => {
                cr.status.conditions.set(Condition::reconcile_error(e));
                warn!(
                    cache_cluster = %cr.external_name(),
                    operation = %e.operation(),
                    error = %e,
                    "Reconcile failed"
                );
            }
        }
        result
    }

    async fn tick(&self, cr: &mut CacheCluster, ctx: CallContext) -> Result<ReconcileOutcome> {
        let external = self.connector.connect(cr, ctx).await?;
        let observation = external.observe(cr).await?;

        if cr.metadata.deletion_requested {
            if !observation.resource_exists {
                return Ok(ReconcileOutcome::Gone);
            }
            external.delete(cr).await?;
            return Ok(ReconcileOutcome::Deleted);
        }

        if !observation.resource_exists {
            external.create(cr).await?;
            return Ok(ReconcileOutcome::Created);
        }

        if observation.resource_up_to_date {
            return Ok(ReconcileOutcome::Unchanged);
        }

        if !cr.status.at_provider.cache_cluster_status.is_available() {
            return Ok(ReconcileOutcome::Waiting);
        }
        external.update(cr).await?;
        Ok(ReconcileOutcome::Updated)
    }
}
