// Account store (SQLite via sqlx).

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Persisted account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Inactive,
    Active,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "inactive" => Some(Self::Inactive),
            "active" => Some(Self::Active),
            _ => None,
        }
    }
}

/// Persisted automation flag for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotStatus {
    Stopped,
    Running,
}

impl BotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "stopped" => Some(Self::Stopped),
            "running" => Some(Self::Running),
            _ => None,
        }
    }
}

/// Clan request lifecycle. `Pending` transitions exactly once to a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClanRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ClanRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    #[serde(skip_serializing)]
    pub credential: String,
    pub clan_id: Option<String>,
    pub balance: i64,
    pub status: String,
    pub bot_status: String,
    pub created_at: String,
}

impl Account {
    pub fn bot_status(&self) -> Option<BotStatus> {
        BotStatus::from_str_name(&self.bot_status)
    }

    pub fn status(&self) -> Option<AccountStatus> {
        AccountStatus::from_str_name(&self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RewardEvent {
    pub id: i64,
    pub account_id: String,
    pub amount: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClanRequest {
    pub id: i64,
    pub account_id: String,
    pub clan_id: String,
    pub status: String,
    pub requested_at: String,
    pub resolved_at: Option<String>,
}

impl ClanRequest {
    pub fn status(&self) -> Option<ClanRequestStatus> {
        ClanRequestStatus::from_str_name(&self.status)
    }
}

/// Aggregate panel counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelStats {
    pub total_accounts: i64,
    pub total_balance: i64,
    pub running_count: i64,
    pub pending_request_count: i64,
}

const ACCOUNT_COLUMNS: &str = "id, credential, clan_id, balance, status, bot_status, created_at";
const CLAN_REQUEST_COLUMNS: &str = "id, account_id, clan_id, status, requested_at, resolved_at";

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        // Every connection to `:memory:` opens a fresh database, so keep exactly
        // one connection alive for the lifetime of the pool.
        let options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options.connect(database_url).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                credential TEXT NOT NULL,
                clan_id TEXT,
                balance INTEGER NOT NULL DEFAULT 0 CHECK (balance >= 0),
                status TEXT NOT NULL DEFAULT 'inactive',
                bot_status TEXT NOT NULL DEFAULT 'stopped',
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clan_requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id TEXT NOT NULL REFERENCES accounts(id),
                clan_id TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                requested_at TEXT NOT NULL DEFAULT (datetime('now')),
                resolved_at TEXT
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reward_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id TEXT NOT NULL REFERENCES accounts(id),
                amount INTEGER NOT NULL CHECK (amount > 0),
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_reward_events_account ON reward_events(account_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ── Accounts ──────────────────────────────────────────────────────

    /// Insert an account or refresh an existing one.
    ///
    /// Re-registering keeps balance and bot_status; `clan_id` is only replaced
    /// when a new value is supplied.
    pub async fn upsert_account(
        &self,
        id: &str,
        credential: &str,
        clan_id: Option<&str>,
    ) -> Result<Account, sqlx::Error> {
        let row = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts (id, credential, clan_id, status) VALUES (?, ?, ?, 'active') \
             ON CONFLICT(id) DO UPDATE SET \
                credential = excluded.credential, \
                clan_id = COALESCE(excluded.clan_id, accounts.clan_id), \
                status = 'active' \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(credential)
        .bind(clan_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, sqlx::Error> {
        let rows = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_account(&self, id: &str) -> Result<Option<Account>, sqlx::Error> {
        let row = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_credential(&self, id: &str) -> Result<Option<String>, sqlx::Error> {
        let credential: Option<String> =
            sqlx::query_scalar("SELECT credential FROM accounts WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(credential)
    }

    pub async fn set_bot_status(&self, id: &str, status: BotStatus) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET bot_status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove an account together with its reward history and clan requests.
    pub async fn delete_account(&self, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reward_events WHERE account_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM clan_requests WHERE account_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark every account as stopped. Run at startup, when no loop can be alive yet.
    pub async fn reset_running_bots(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET bot_status = 'stopped' WHERE bot_status = 'running'")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ── Rewards ───────────────────────────────────────────────────────

    /// Credit `amount` to an account and append the matching reward event in
    /// one transaction. Returns `None` if the account does not exist.
    pub async fn apply_reward(
        &self,
        account_id: &str,
        amount: i64,
    ) -> Result<Option<RewardEvent>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE accounts SET balance = balance + ?, status = 'active' WHERE id = ?",
        )
        .bind(amount)
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let event = sqlx::query_as::<_, RewardEvent>(
            "INSERT INTO reward_events (account_id, amount) VALUES (?, ?) RETURNING id, account_id, amount, created_at",
        )
        .bind(account_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(event))
    }

    pub async fn list_reward_events(&self, account_id: &str) -> Result<Vec<RewardEvent>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RewardEvent>(
            "SELECT id, account_id, amount, created_at FROM reward_events WHERE account_id = ? ORDER BY id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ── Clan requests ─────────────────────────────────────────────────

    pub async fn create_clan_request(
        &self,
        account_id: &str,
        clan_id: &str,
    ) -> Result<ClanRequest, sqlx::Error> {
        let row = sqlx::query_as::<_, ClanRequest>(&format!(
            "INSERT INTO clan_requests (account_id, clan_id) VALUES (?, ?) RETURNING {CLAN_REQUEST_COLUMNS}"
        ))
        .bind(account_id)
        .bind(clan_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_clan_request(&self, id: i64) -> Result<Option<ClanRequest>, sqlx::Error> {
        let row = sqlx::query_as::<_, ClanRequest>(&format!(
            "SELECT {CLAN_REQUEST_COLUMNS} FROM clan_requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_clan_requests(
        &self,
        account_id: Option<&str>,
    ) -> Result<Vec<ClanRequest>, sqlx::Error> {
        let rows = match account_id {
            Some(account_id) => {
                sqlx::query_as::<_, ClanRequest>(&format!(
                    "SELECT {CLAN_REQUEST_COLUMNS} FROM clan_requests WHERE account_id = ? ORDER BY id"
                ))
                .bind(account_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ClanRequest>(&format!(
                    "SELECT {CLAN_REQUEST_COLUMNS} FROM clan_requests ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// Requests still waiting for a decision, oldest first.
    pub async fn list_pending_clan_requests(&self) -> Result<Vec<ClanRequest>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ClanRequest>(&format!(
            "SELECT {CLAN_REQUEST_COLUMNS} FROM clan_requests WHERE status = 'pending' ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Move a pending request to a terminal status. On `Accepted`, the owning
    /// account's `clan_id` is updated in the same transaction.
    ///
    /// Returns `None` if the request does not exist or was already resolved.
    pub async fn resolve_clan_request(
        &self,
        id: i64,
        status: ClanRequestStatus,
    ) -> Result<Option<ClanRequest>, sqlx::Error> {
        if !status.is_terminal() {
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;

        let resolved = sqlx::query_as::<_, ClanRequest>(&format!(
            "UPDATE clan_requests SET status = ?, resolved_at = datetime('now') \
             WHERE id = ? AND status = 'pending' RETURNING {CLAN_REQUEST_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = resolved else {
            tx.rollback().await?;
            return Ok(None);
        };

        if status == ClanRequestStatus::Accepted {
            sqlx::query("UPDATE accounts SET clan_id = ? WHERE id = ?")
                .bind(&request.clan_id)
                .bind(&request.account_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(request))
    }

    // ── Stats ─────────────────────────────────────────────────────────

    pub async fn stats(&self) -> Result<PanelStats, sqlx::Error> {
        let (total_accounts, total_balance): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(balance), 0) FROM accounts")
                .fetch_one(&self.pool)
                .await?;

        let running_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE bot_status = 'running'")
                .fetch_one(&self.pool)
                .await?;

        let pending_request_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM clan_requests WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;

        Ok(PanelStats {
            total_accounts,
            total_balance,
            running_count,
            pending_request_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_register_and_list_accounts() {
        let db = test_db().await;

        let a = db.upsert_account("aaaaaaaaaaaa", "tok-a", None).await.unwrap();
        assert_eq!(a.balance, 0);
        assert_eq!(a.status(), Some(AccountStatus::Active));
        assert_eq!(a.bot_status(), Some(BotStatus::Stopped));
        assert!(a.clan_id.is_none());

        db.upsert_account("bbbbbbbbbbbb", "tok-b", Some("C9"))
            .await
            .unwrap();

        let accounts = db.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);

        let fetched = db.get_account("bbbbbbbbbbbb").await.unwrap().unwrap();
        assert_eq!(fetched.clan_id.as_deref(), Some("C9"));
        assert_eq!(fetched.credential, "tok-b");

        assert!(db.get_account("missing").await.unwrap().is_none());
        assert!(db.get_credential("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reregister_preserves_balance_and_bot_status() {
        let db = test_db().await;

        db.upsert_account("acc", "tok-1", Some("C1")).await.unwrap();
        db.apply_reward("acc", 120).await.unwrap();
        db.set_bot_status("acc", BotStatus::Running).await.unwrap();

        let again = db.upsert_account("acc", "tok-1", None).await.unwrap();
        assert_eq!(again.balance, 120);
        assert_eq!(again.bot_status(), Some(BotStatus::Running));
        assert_eq!(again.clan_id.as_deref(), Some("C1"));

        let moved = db.upsert_account("acc", "tok-1", Some("C2")).await.unwrap();
        assert_eq!(moved.clan_id.as_deref(), Some("C2"));
    }

    #[tokio::test]
    async fn test_apply_reward_updates_balance_and_log() {
        let db = test_db().await;
        db.upsert_account("acc", "tok", None).await.unwrap();

        let e1 = db.apply_reward("acc", 50).await.unwrap().unwrap();
        let e2 = db.apply_reward("acc", 75).await.unwrap().unwrap();
        assert_eq!(e1.amount, 50);
        assert!(e2.id > e1.id);

        let account = db.get_account("acc").await.unwrap().unwrap();
        assert_eq!(account.balance, 125);

        let events = db.list_reward_events("acc").await.unwrap();
        let total: i64 = events.iter().map(|e| e.amount).sum();
        assert_eq!(total, account.balance);
    }

    #[tokio::test]
    async fn test_apply_reward_unknown_account() {
        let db = test_db().await;
        assert!(db.apply_reward("ghost", 10).await.unwrap().is_none());
        assert!(db.list_reward_events("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_reward_rejected() {
        let db = test_db().await;
        db.upsert_account("acc", "tok", None).await.unwrap();

        assert!(db.apply_reward("acc", 0).await.is_err());

        // The failed insert rolled back the balance increment too.
        let account = db.get_account("acc").await.unwrap().unwrap();
        assert_eq!(account.balance, 0);
    }

    #[tokio::test]
    async fn test_delete_account_cascades() {
        let db = test_db().await;
        db.upsert_account("acc", "tok", None).await.unwrap();
        db.apply_reward("acc", 40).await.unwrap();
        db.create_clan_request("acc", "C1").await.unwrap();

        assert!(db.delete_account("acc").await.unwrap());
        assert!(!db.delete_account("acc").await.unwrap());
        assert!(db.list_reward_events("acc").await.unwrap().is_empty());
        assert!(db.list_clan_requests(Some("acc")).await.unwrap().is_empty());
        assert_eq!(db.stats().await.unwrap(), PanelStats::default());
    }

    #[tokio::test]
    async fn test_bot_status_and_reset() {
        let db = test_db().await;
        db.upsert_account("a", "tok-a", None).await.unwrap();
        db.upsert_account("b", "tok-b", None).await.unwrap();

        assert!(db.set_bot_status("a", BotStatus::Running).await.unwrap());
        assert!(db.set_bot_status("b", BotStatus::Running).await.unwrap());
        assert!(!db.set_bot_status("c", BotStatus::Running).await.unwrap());
        assert_eq!(db.stats().await.unwrap().running_count, 2);

        assert_eq!(db.reset_running_bots().await.unwrap(), 2);
        assert_eq!(db.stats().await.unwrap().running_count, 0);
    }

    #[tokio::test]
    async fn test_clan_request_accept_updates_account() {
        let db = test_db().await;
        db.upsert_account("acc", "tok", Some("OLD")).await.unwrap();

        let req = db.create_clan_request("acc", "C1").await.unwrap();
        assert_eq!(req.status(), Some(ClanRequestStatus::Pending));
        assert!(req.resolved_at.is_none());

        let resolved = db
            .resolve_clan_request(req.id, ClanRequestStatus::Accepted)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.status(), Some(ClanRequestStatus::Accepted));
        assert!(resolved.resolved_at.is_some());

        let account = db.get_account("acc").await.unwrap().unwrap();
        assert_eq!(account.clan_id.as_deref(), Some("C1"));
    }

    #[tokio::test]
    async fn test_clan_request_reject_leaves_clan() {
        let db = test_db().await;
        db.upsert_account("acc", "tok", Some("OLD")).await.unwrap();

        let req = db.create_clan_request("acc", "C1").await.unwrap();
        db.resolve_clan_request(req.id, ClanRequestStatus::Rejected)
            .await
            .unwrap()
            .unwrap();

        let account = db.get_account("acc").await.unwrap().unwrap();
        assert_eq!(account.clan_id.as_deref(), Some("OLD"));
    }

    #[tokio::test]
    async fn test_clan_request_resolves_once() {
        let db = test_db().await;
        db.upsert_account("acc", "tok", None).await.unwrap();
        let req = db.create_clan_request("acc", "C1").await.unwrap();

        assert!(db
            .resolve_clan_request(req.id, ClanRequestStatus::Rejected)
            .await
            .unwrap()
            .is_some());
        assert!(db
            .resolve_clan_request(req.id, ClanRequestStatus::Accepted)
            .await
            .unwrap()
            .is_none());

        let stored = db.get_clan_request(req.id).await.unwrap().unwrap();
        assert_eq!(stored.status(), Some(ClanRequestStatus::Rejected));
        let account = db.get_account("acc").await.unwrap().unwrap();
        assert!(account.clan_id.is_none());

        // Pending is not a valid resolution target.
        let other = db.create_clan_request("acc", "C2").await.unwrap();
        assert!(db
            .resolve_clan_request(other.id, ClanRequestStatus::Pending)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_clan_requests_filter() {
        let db = test_db().await;
        db.upsert_account("a", "tok-a", None).await.unwrap();
        db.upsert_account("b", "tok-b", None).await.unwrap();
        db.create_clan_request("a", "C1").await.unwrap();
        db.create_clan_request("b", "C2").await.unwrap();
        db.create_clan_request("a", "C3").await.unwrap();

        assert_eq!(db.list_clan_requests(None).await.unwrap().len(), 3);
        let for_a = db.list_clan_requests(Some("a")).await.unwrap();
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[0].clan_id, "C1");
        assert_eq!(for_a[1].clan_id, "C3");
    }

    #[tokio::test]
    async fn test_stats() {
        let db = test_db().await;
        assert_eq!(db.stats().await.unwrap(), PanelStats::default());

        db.upsert_account("a", "tok-a", None).await.unwrap();
        db.upsert_account("b", "tok-b", None).await.unwrap();
        db.apply_reward("a", 100).await.unwrap();
        db.apply_reward("b", 60).await.unwrap();
        db.set_bot_status("a", BotStatus::Running).await.unwrap();
        let r = db.create_clan_request("a", "C1").await.unwrap();
        db.create_clan_request("b", "C1").await.unwrap();
        db.resolve_clan_request(r.id, ClanRequestStatus::Accepted)
            .await
            .unwrap();

        let stats = db.stats().await.unwrap();
        assert_eq!(
            stats,
            PanelStats {
                total_accounts: 2,
                total_balance: 160,
                running_count: 1,
                pending_request_count: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_list_pending_clan_requests() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.upsert_account("a", "tok-a", None).await.unwrap();
        let first = db.create_clan_request("a", "C1").await.unwrap();
        let second = db.create_clan_request("a", "C2").await.unwrap();
        db.resolve_clan_request(first.id, ClanRequestStatus::Rejected)
            .await
            .unwrap();

        let pending = db.list_pending_clan_requests().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second.id);
        assert_eq!(pending[0].status(), Some(ClanRequestStatus::Pending));
    }

    #[test]
    fn test_status_names() {
        assert_eq!(BotStatus::from_str_name("running"), Some(BotStatus::Running));
        assert_eq!(BotStatus::Stopped.as_str(), "stopped");
        assert_eq!(AccountStatus::from_str_name("active"), Some(AccountStatus::Active));
        assert_eq!(AccountStatus::Inactive.as_str(), "inactive");
        assert_eq!(
            ClanRequestStatus::from_str_name("rejected"),
            Some(ClanRequestStatus::Rejected)
        );
        assert_eq!(ClanRequestStatus::from_str_name("maybe"), None);
        assert!(!ClanRequestStatus::Pending.is_terminal());
        assert!(ClanRequestStatus::Accepted.is_terminal());
    }
}
