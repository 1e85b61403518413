// Bot lifecycle manager: owns the per-account reward loops and keeps the
// persisted `bot_status` flag in step with the in-memory registry.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::config::LoopTiming;
use crate::db::{BotStatus, Database, RewardEvent};
use crate::error::{PanelError, PanelResult};
use crate::events::{Notifier, PanelEvent};
use crate::identity::redact;
use crate::metrics;
use crate::policy::{BotSession, RewardPolicy};

/// Registry entry for one running loop.
struct BotHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Starts, stops and supervises one reward loop per account.
///
/// Registry changes and the matching `bot_status` write happen while the
/// registry lock is held, so a caller never observes the two disagreeing
/// after `start`/`stop` returns.
pub struct BotManager {
    db: Arc<Database>,
    notifier: Notifier,
    policy: Arc<dyn RewardPolicy>,
    timing: LoopTiming,
    bots: Mutex<HashMap<String, BotHandle>>,
    /// Loops that were told to stop and may still be finishing a tick, by account.
    retired: std::sync::Mutex<Vec<(String, JoinHandle<()>)>>,
}

impl BotManager {
    pub fn new(
        db: Arc<Database>,
        notifier: Notifier,
        policy: Arc<dyn RewardPolicy>,
        timing: LoopTiming,
    ) -> Self {
        Self {
            db,
            notifier,
            policy,
            timing,
            bots: Mutex::new(HashMap::new()),
            retired: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Start the reward loop for an account.
    ///
    /// Fails with `NotFound` for unknown accounts and `AlreadyRunning` if a
    /// loop is already registered; in both cases nothing changes.
    pub async fn start(&self, account_id: &str) -> PanelResult<()> {
        let credential = self
            .db
            .get_credential(account_id)
            .await?
            .ok_or_else(|| PanelError::NotFound(account_id.to_string()))?;

        let mut bots = self.bots.lock().await;
        if bots.contains_key(account_id) {
            return Err(PanelError::AlreadyRunning(account_id.to_string()));
        }

        // A loop stopped a moment ago may still be inside its last tick; let it
        // finish so two loops never credit the same account.
        self.join_retired(account_id).await;

        if !self.db.set_bot_status(account_id, BotStatus::Running).await? {
            return Err(PanelError::NotFound(account_id.to_string()));
        }

        tracing::info!(
            "Starting bot for account {account_id} (token {})",
            redact(&credential)
        );

        let bot_loop = BotLoop {
            db: self.db.clone(),
            notifier: self.notifier.clone(),
            policy: self.policy.clone(),
            timing: self.timing,
            session: BotSession {
                account_id: account_id.to_string(),
                credential,
            },
        };
        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(bot_loop.run(stop_rx));

        bots.insert(account_id.to_string(), BotHandle { stop_tx, join });
        metrics::BOTS_RUNNING.set(bots.len() as i64);
        Ok(())
    }

    /// Stop the reward loop for an account.
    ///
    /// Returns once the registration is gone and `bot_status` is `stopped`;
    /// the loop itself winds down on its own, finishing at most the tick it
    /// is currently in. A later `start` for the same account waits for that
    /// tick before spawning the new loop.
    pub async fn stop(&self, account_id: &str) -> PanelResult<()> {
        let mut bots = self.bots.lock().await;
        if !bots.contains_key(account_id) {
            return Err(PanelError::NotRunning(account_id.to_string()));
        }

        // Persist first: if the write fails the loop keeps running and both
        // sides still say "running".
        self.db.set_bot_status(account_id, BotStatus::Stopped).await?;

        if let Some(handle) = bots.remove(account_id) {
            self.retire(account_id, handle);
        }
        metrics::BOTS_RUNNING.set(bots.len() as i64);
        tracing::info!("Stopped bot for account {account_id}");
        Ok(())
    }

    /// Start a loop for every stored account that is not already running.
    ///
    /// Returns one result per attempted account, ordered by account id.
    pub async fn start_all(&self) -> PanelResult<Vec<(String, PanelResult<()>)>> {
        let mut ids: Vec<String> = self
            .db
            .list_accounts()
            .await?
            .into_iter()
            .map(|account| account.id)
            .collect();
        ids.sort();

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            if self.is_running(&id).await {
                continue;
            }
            let result = self.start(&id).await;
            if let Err(e) = &result {
                tracing::warn!("Failed to start bot for account {id}: {e}");
            }
            results.push((id, result));
        }

        let started = results.iter().filter(|(_, r)| r.is_ok()).count();
        tracing::info!("Started {started} of {} bots", results.len());
        Ok(results)
    }

    /// Delete an account row, stopping its loop first if one is registered.
    ///
    /// The registry lock is held across the delete, so a concurrent `start`
    /// either runs before (and is stopped here) or after (and finds no row).
    /// Returns `false` if no such account existed.
    pub async fn remove_account(&self, account_id: &str) -> PanelResult<bool> {
        let mut bots = self.bots.lock().await;

        let deleted = self.db.delete_account(account_id).await?;

        if let Some(handle) = bots.remove(account_id) {
            self.retire(account_id, handle);
            metrics::BOTS_RUNNING.set(bots.len() as i64);
            tracing::info!("Stopped bot for removed account {account_id}");
        }
        Ok(deleted)
    }

    /// Stop every running loop. Returns how many were stopped.
    pub async fn stop_all(&self) -> usize {
        let mut bots = self.bots.lock().await;
        let drained: Vec<(String, BotHandle)> = bots.drain().collect();
        metrics::BOTS_RUNNING.set(0);

        for (account_id, _) in &drained {
            if let Err(e) = self.db.set_bot_status(account_id, BotStatus::Stopped).await {
                tracing::error!("Failed to persist stopped status for {account_id}: {e}");
            }
        }

        let count = drained.len();
        for (account_id, handle) in drained {
            self.retire(&account_id, handle);
        }
        if count > 0 {
            tracing::info!("Stopped {count} bots");
        }
        count
    }

    /// Stop everything and wait for all loops to exit.
    pub async fn shutdown(&self) {
        self.stop_all().await;

        let handles: Vec<JoinHandle<()>> = std::mem::take(
            &mut *self.retired.lock().unwrap_or_else(PoisonError::into_inner),
        )
        .into_iter()
        .map(|(_, join)| join)
        .collect();
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                tracing::error!("Bot loop ended abnormally: {e}");
            }
        }
    }

    pub async fn is_running(&self, account_id: &str) -> bool {
        self.bots.lock().await.contains_key(account_id)
    }

    /// Account ids with a registered loop, sorted.
    pub async fn running_accounts(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.bots.lock().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn running_count(&self) -> usize {
        self.bots.lock().await.len()
    }

    fn retire(&self, account_id: &str, handle: BotHandle) {
        // The loop may already be gone, in which case the signal has no receiver.
        let _ = handle.stop_tx.send(());

        let mut retired = self.retired.lock().unwrap_or_else(PoisonError::into_inner);
        retired.retain(|(_, join)| !join.is_finished());
        retired.push((account_id.to_string(), handle.join));
    }

    /// Wait for the retired loops of one account to exit.
    async fn join_retired(&self, account_id: &str) {
        let pending: Vec<JoinHandle<()>> = {
            let mut retired = self.retired.lock().unwrap_or_else(PoisonError::into_inner);
            let (mine, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut *retired)
                .into_iter()
                .partition(|(id, _)| id == account_id);
            *retired = rest;
            mine.into_iter().map(|(_, join)| join).collect()
        };

        for result in futures::future::join_all(pending).await {
            if let Err(e) = result {
                tracing::error!("Bot loop for {account_id} ended abnormally: {e}");
            }
        }
    }
}

/// State owned by one running loop.
struct BotLoop {
    db: Arc<Database>,
    notifier: Notifier,
    policy: Arc<dyn RewardPolicy>,
    timing: LoopTiming,
    session: BotSession,
}

impl BotLoop {
    /// One reward tick: roll, persist, return the written event.
    async fn tick(&self) -> PanelResult<Option<RewardEvent>> {
        let amount = self.policy.next_reward(&self.session);
        if amount == 0 {
            return Ok(None);
        }

        self.db
            .apply_reward(&self.session.account_id, i64::from(amount))
            .await?
            .map(Some)
            .ok_or_else(|| PanelError::NotFound(self.session.account_id.clone()))
    }

    async fn run(self, mut stop_rx: oneshot::Receiver<()>) {
        let account_id = &self.session.account_id;

        loop {
            // A closed channel means the manager is gone; treat it as a stop.
            if !matches!(
                stop_rx.try_recv(),
                Err(oneshot::error::TryRecvError::Empty)
            ) {
                break;
            }

            let delay = match self.tick().await {
                Ok(Some(event)) => {
                    metrics::REWARD_TICKS_TOTAL.inc();
                    metrics::GLORY_AWARDED_TOTAL.inc_by(event.amount.unsigned_abs());
                    tracing::debug!("Bot {account_id} earned {} glory", event.amount);
                    self.notifier.publish(PanelEvent::Reward {
                        account_id: event.account_id,
                        amount: event.amount,
                        timestamp: event.created_at,
                    });
                    self.timing.tick_interval
                }
                Ok(None) => self.timing.tick_interval,
                Err(e) => {
                    metrics::BOT_TICK_ERRORS_TOTAL.inc();
                    tracing::warn!(
                        "Bot {account_id} tick failed, retrying in {:?}: {e}",
                        self.timing.error_backoff
                    );
                    self.timing.error_backoff
                }
            };

            tokio::select! {
                _ = &mut stop_rx => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        tracing::info!("Bot loop for account {account_id} exited");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::FixedReward;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Reward policy that takes a while per roll and records overlapping rolls.
    #[derive(Default)]
    struct SlowReward {
        active: AtomicUsize,
        peak: AtomicUsize,
        rolls: AtomicUsize,
    }

    impl RewardPolicy for SlowReward {
        fn next_reward(&self, _session: &BotSession) -> u32 {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.rolls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(30));
            self.active.fetch_sub(1, Ordering::SeqCst);
            10
        }
    }

    fn fast_timing() -> LoopTiming {
        LoopTiming {
            tick_interval: Duration::from_millis(20),
            error_backoff: Duration::from_millis(10),
            clan_resolve_delay: Duration::from_millis(10),
        }
    }

    async fn setup() -> (Arc<Database>, BotManager) {
        let db = Arc::new(Database::new("sqlite::memory:").await.unwrap());
        let manager = BotManager::new(
            db.clone(),
            Notifier::new(),
            Arc::new(FixedReward(10)),
            fast_timing(),
        );
        (db, manager)
    }

    #[tokio::test]
    async fn test_start_unknown_account() {
        let (_db, manager) = setup().await;
        let err = manager.start("nobody").await.unwrap_err();
        assert!(matches!(err, PanelError::NotFound(_)));
        assert_eq!(manager.running_count().await, 0);
    }

    #[tokio::test]
    async fn test_zero_reward_writes_nothing() {
        let db = Arc::new(Database::new("sqlite::memory:").await.unwrap());
        db.upsert_account("acc", "tok", None).await.unwrap();
        let manager = BotManager::new(
            db.clone(),
            Notifier::new(),
            Arc::new(FixedReward(0)),
            fast_timing(),
        );

        manager.start("acc").await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        manager.shutdown().await;

        assert!(db.list_reward_events("acc").await.unwrap().is_empty());
        assert_eq!(db.get_account("acc").await.unwrap().unwrap().balance, 0);
    }

    #[tokio::test]
    async fn test_loop_survives_store_errors() {
        let (db, manager) = setup().await;
        db.upsert_account("acc", "tok", None).await.unwrap();
        manager.start("acc").await.unwrap();

        // Pull the row out from under the loop: every tick now fails.
        db.delete_account("acc").await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(manager.is_running("acc").await);

        // Once the account is back, the same loop resumes crediting.
        db.upsert_account("acc", "tok", None).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), async {
            while db.get_account("acc").await.unwrap().unwrap().balance == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("loop never resumed crediting");

        manager.stop("acc").await.unwrap();
        manager.shutdown().await;
    }

    #[tokio::test]
    async fn test_stop_all_resets_every_account() {
        let (db, manager) = setup().await;
        for id in ["a", "b", "c"] {
            db.upsert_account(id, &format!("tok-{id}"), None).await.unwrap();
            manager.start(id).await.unwrap();
        }
        assert_eq!(manager.running_accounts().await, vec!["a", "b", "c"]);
        assert_eq!(db.stats().await.unwrap().running_count, 3);

        assert_eq!(manager.stop_all().await, 3);
        assert_eq!(manager.running_count().await, 0);
        assert_eq!(db.stats().await.unwrap().running_count, 0);

        manager.shutdown().await;
        assert_eq!(manager.stop_all().await, 0);
    }

    #[tokio::test]
    async fn test_start_all_skips_running() {
        let (db, manager) = setup().await;
        for id in ["b", "a", "c"] {
            db.upsert_account(id, &format!("tok-{id}"), None).await.unwrap();
        }
        manager.start("b").await.unwrap();

        let results = manager.start_all().await.unwrap();
        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
        assert_eq!(manager.running_accounts().await, vec!["a", "b", "c"]);
        assert_eq!(db.stats().await.unwrap().running_count, 3);

        assert!(manager.start_all().await.unwrap().is_empty());
        manager.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_restart_waits_for_previous_loop() {
        let db = Arc::new(Database::new("sqlite::memory:").await.unwrap());
        db.upsert_account("acc", "tok", None).await.unwrap();
        let policy = Arc::new(SlowReward::default());
        let manager = BotManager::new(db.clone(), Notifier::new(), policy.clone(), fast_timing());

        manager.start("acc").await.unwrap();
        // Catch the first loop in the middle of a roll.
        tokio::time::timeout(Duration::from_secs(5), async {
            while policy.active.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("first loop never rolled");

        manager.stop("acc").await.unwrap();
        manager.start("acc").await.unwrap();

        let before = policy.rolls.load(Ordering::SeqCst);
        tokio::time::timeout(Duration::from_secs(5), async {
            while policy.rolls.load(Ordering::SeqCst) < before + 2 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("second loop never rolled");

        manager.shutdown().await;
        assert_eq!(policy.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_account_stops_loop() {
        let (db, manager) = setup().await;
        db.upsert_account("acc", "tok", None).await.unwrap();
        manager.start("acc").await.unwrap();

        assert!(manager.remove_account("acc").await.unwrap());
        assert!(!manager.is_running("acc").await);
        assert!(db.get_account("acc").await.unwrap().is_none());

        assert!(!manager.remove_account("acc").await.unwrap());
        assert!(matches!(
            manager.start("acc").await.unwrap_err(),
            PanelError::NotFound(_)
        ));
        manager.shutdown().await;
    }
}
