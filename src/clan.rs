// Clan membership requests: accepted immediately, resolved once after a delay.

use std::sync::{Arc, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::db::{ClanRequest, Database};
use crate::error::{PanelError, PanelResult};
use crate::events::{Notifier, PanelEvent};
use crate::metrics;
use crate::policy::DecisionPolicy;

pub struct ClanRequests {
    db: Arc<Database>,
    notifier: Notifier,
    policy: Arc<dyn DecisionPolicy>,
    resolve_delay: Duration,
    outstanding: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl ClanRequests {
    pub fn new(
        db: Arc<Database>,
        notifier: Notifier,
        policy: Arc<dyn DecisionPolicy>,
        resolve_delay: Duration,
    ) -> Self {
        Self {
            db,
            notifier,
            policy,
            resolve_delay,
            outstanding: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Record a pending request and schedule its resolution. Returns the request id
    /// without waiting for the outcome.
    pub async fn submit(&self, account_id: &str, clan_id: &str) -> PanelResult<i64> {
        let clan_id = clan_id.trim();
        if clan_id.is_empty() {
            return Err(PanelError::InvalidInput("clan_id is required".into()));
        }
        if self.db.get_account(account_id).await?.is_none() {
            return Err(PanelError::NotFound(account_id.to_string()));
        }

        let request = self.db.create_clan_request(account_id, clan_id).await?;
        let request_id = request.id;
        metrics::CLAN_REQUESTS_SUBMITTED_TOTAL.inc();
        metrics::CLAN_REQUESTS_PENDING.inc();
        tracing::info!("Clan request {request_id}: account {account_id} -> clan {clan_id}");

        self.schedule(request);
        Ok(request_id)
    }

    /// Schedule resolution for requests left pending by a previous run.
    /// Returns how many were rescheduled.
    pub async fn resume_pending(&self) -> PanelResult<usize> {
        let pending = self.db.list_pending_clan_requests().await?;
        let count = pending.len();
        metrics::CLAN_REQUESTS_PENDING.set(count as i64);

        for request in pending {
            self.schedule(request);
        }
        if count > 0 {
            tracing::info!("Rescheduled {count} pending clan requests");
        }
        Ok(count)
    }

    fn schedule(&self, request: ClanRequest) {
        let handle = tokio::spawn(resolve_after_delay(
            self.db.clone(),
            self.notifier.clone(),
            self.policy.clone(),
            self.resolve_delay,
            request,
        ));

        let mut outstanding = self.outstanding.lock().unwrap_or_else(PoisonError::into_inner);
        outstanding.retain(|h| !h.is_finished());
        outstanding.push(handle);
    }

    /// Number of requests whose resolution task has not finished yet.
    pub fn outstanding(&self) -> usize {
        let outstanding = self.outstanding.lock().unwrap_or_else(PoisonError::into_inner);
        outstanding.iter().filter(|h| !h.is_finished()).count()
    }

    /// Wait for every scheduled resolution to run.
    pub async fn drain(&self) {
        let handles: Vec<JoinHandle<()>> = std::mem::take(
            &mut *self.outstanding.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                tracing::error!("Clan resolution task ended abnormally: {e}");
            }
        }
    }
}

async fn resolve_after_delay(
    db: Arc<Database>,
    notifier: Notifier,
    policy: Arc<dyn DecisionPolicy>,
    delay: Duration,
    request: ClanRequest,
) {
    tokio::time::sleep(delay).await;

    let status = policy.decide(&request);
    match db.resolve_clan_request(request.id, status).await {
        Ok(Some(resolved)) => {
            metrics::CLAN_REQUESTS_PENDING.dec();
            metrics::CLAN_REQUESTS_RESOLVED_TOTAL
                .with_label_values(&[status.as_str()])
                .inc();
            tracing::info!(
                "Clan request {} for account {} {}",
                resolved.id,
                resolved.account_id,
                status.as_str()
            );
            notifier.publish(PanelEvent::ClanRequestResolved {
                request_id: resolved.id,
                account_id: resolved.account_id,
                clan_id: resolved.clan_id,
                status,
            });
        }
        Ok(None) => {
            metrics::CLAN_REQUESTS_PENDING.dec();
            tracing::warn!("Clan request {} is no longer pending", request.id);
        }
        Err(e) => {
            tracing::error!("Failed to resolve clan request {}: {e}", request.id);
        }
    }
}
