//! Read-only account lookups used for notifications.

use vb_core::entities::Account;

use crate::VenueDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_enum};

fn row_to_account(row: &libsql::Row) -> Result<Account, DatabaseError> {
    Ok(Account {
        id: row.get::<i64>(0)?,
        username: row.get::<String>(1)?,
        full_name: get_opt_string(row, 2)?,
        display_name: get_opt_string(row, 3)?,
        email: get_opt_string(row, 4)?,
        role: parse_enum(&row.get::<String>(5)?)?,
    })
}

impl VenueDb {
    /// Fetch an active account.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the account is missing or disabled.
    pub async fn get_account(&self, id: i64) -> Result<Account, DatabaseError> {
        let _read = self.read_gate().await;
        let mut rows = self
            .conn()
            .query(
                "SELECT id, username, full_name, display_name, email, role
                 FROM accounts WHERE id = ?1 AND active = 1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NotFound {
            entity: "account",
            id,
        })?;
        row_to_account(&row)
    }

    /// All active administrator accounts, by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_admins(&self) -> Result<Vec<Account>, DatabaseError> {
        let _read = self.read_gate().await;
        let mut rows = self
            .conn()
            .query(
                "SELECT id, username, full_name, display_name, email, role
                 FROM accounts WHERE role = 'admin' AND active = 1 ORDER BY id",
                (),
            )
            .await?;
        let mut accounts = Vec::new();
        while let Some(row) = rows.next().await? {
            accounts.push(row_to_account(&row)?);
        }
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vb_core::enums::Role;

    use crate::test_support::helpers::seeded_db;

    #[tokio::test]
    async fn account_lookup_and_admins() {
        let db = seeded_db().await;

        let ada = db.get_account(3).await.unwrap();
        assert_eq!(ada.username, "ada");
        assert_eq!(ada.role, Role::Client);
        assert_eq!(ada.presentable_name(), "Ada Lovelace");

        let admins = db.list_admins().await.unwrap();
        let names: Vec<&str> = admins.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, vec!["root"]);
    }

    #[tokio::test]
    async fn disabled_account_is_not_found() {
        let db = seeded_db().await;
        assert!(db.get_account(5).await.unwrap_err().is_not_found());
        assert!(db.get_account(404).await.unwrap_err().is_not_found());
    }
}
