//! User accounts.

use chrono::Utc;
use esgm_core::{User, UserId, UserRecord};
use rusqlite::{OptionalExtension, Row, params};

use crate::{Error, Result, Store};

const USER_COLUMNS: &str =
    "user_id, email, first_name, last_name, created_at, updated_at, password_hash";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get("user_id")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl Store {
    /// Insert a user. `email` must already be normalized.
    ///
    /// Fails with [`Error::Duplicate`] when the email is taken, ignoring case.
    pub async fn create_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        password_hash: &str,
    ) -> Result<User> {
        let email = email.to_string();
        let first_name = first_name.to_string();
        let last_name = last_name.to_string();
        let password_hash = password_hash.to_string();

        self.call(move |conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO users
                     (email, password_hash, first_name, last_name, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![email, password_hash, first_name, last_name, now],
            )
            .map_err(|e| Error::from_write(e, "user email"))?;

            let user = User {
                user_id: conn.last_insert_rowid(),
                email,
                first_name,
                last_name,
                created_at: now,
                updated_at: now,
            };
            tracing::debug!(user_id = user.user_id, "Created user");
            Ok(user)
        })
        .await
    }

    /// Look a user up by email, ignoring case, including the password hash.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let email = email.trim().to_string();
        self.call(move |conn| {
            let record = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 COLLATE NOCASE"),
                    params![email],
                    |row| {
                        Ok(UserRecord {
                            user: user_from_row(row)?,
                            password_hash: row.get("password_hash")?,
                        })
                    },
                )
                .optional()?;
            Ok(record)
        })
        .await
    }

    /// Fetch a user by id.
    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        self.call(move |conn| {
            let user = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
                    params![user_id],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
        .await
    }
}
