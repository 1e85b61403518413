// Account registration and removal on top of the store and lifecycle manager.

use crate::bot_manager::BotManager;
use crate::db::{Account, Database};
use crate::error::{PanelError, PanelResult};
use crate::identity::derive_account_id;

/// Register (or refresh) the account behind a credential token.
///
/// The account id is derived from the token, so registering the same token
/// twice returns the same account with its balance intact.
pub async fn register_account(
    db: &Database,
    credential: &str,
    clan_id: Option<&str>,
) -> PanelResult<Account> {
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(PanelError::InvalidInput("token is required".into()));
    }
    let clan_id = clan_id.map(str::trim).filter(|c| !c.is_empty());

    let id = derive_account_id(credential);
    let account = db.upsert_account(&id, credential, clan_id).await?;
    tracing::info!("Registered account {id}");
    Ok(account)
}

/// Stop the account's bot if it runs, then delete the account and its history.
pub async fn delete_account(bots: &BotManager, id: &str) -> PanelResult<()> {
    if !bots.remove_account(id).await? {
        return Err(PanelError::NotFound(id.to_string()));
    }
    tracing::info!("Deleted account {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_derives_id() {
        let db = Database::new("sqlite::memory:").await.unwrap();

        let a = register_account(&db, "tok-abc", None).await.unwrap();
        assert_eq!(a.id, derive_account_id("tok-abc"));

        let again = register_account(&db, "  tok-abc  ", Some("")).await.unwrap();
        assert_eq!(again.id, a.id);
        assert!(again.clan_id.is_none());
        assert_eq!(db.list_accounts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_requires_token() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let err = register_account(&db, "   ", None).await.unwrap_err();
        assert!(matches!(err, PanelError::InvalidInput(_)));
    }
}
