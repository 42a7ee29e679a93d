use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub use crate::accounts::repo_types::{NewUser, User, UserUpdate};

const USER_COLUMNS: &str = "id, full_name, username, email, phone, password_hash, created_at";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence seam for user records.
///
/// Callers pass usernames and emails already normalized to lowercase.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// A login containing `@` matches the email column only, anything else
    /// the username column only.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn update(&self, id: Uuid, changes: UserUpdate) -> Result<Option<User>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().is_some_and(|code| code.as_ref() == "23505") {
            let message = match db_err.constraint() {
                Some("users_username_key") => "Username already taken",
                Some("users_email_key") => "Email already registered",
                _ => "User already exists",
            };
            return StoreError::Conflict(message.into());
        }
    }
    StoreError::Database(err)
}

fn login_is_email(login: &str) -> bool {
    login.contains('@')
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let row = sqlx::query_scalar::<_, i32>("SELECT 1 FROM users WHERE username = $1 LIMIT 1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.is_some())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let row = sqlx::query_scalar::<_, i32>("SELECT 1 FROM users WHERE email = $1 LIMIT 1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.is_some())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, full_name, username, email, phone, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.full_name)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(&new_user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;
        debug!(user_id = %user.id, "user row inserted");
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let column = if login_is_email(login) { "email" } else { "username" };
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {column} = $1"
        ))
        .bind(login)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: Uuid, changes: UserUpdate) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET full_name = COALESCE($2, full_name),
                   email     = COALESCE($3, email),
                   phone     = CASE WHEN $4 THEN $5 ELSE phone END
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.full_name)
        .bind(changes.email)
        .bind(changes.phone.is_some())
        .bind(changes.phone.flatten())
        .fetch_optional(&self.db)
        .await
        .map_err(map_write_error)?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
pub use memory::MemoryUserStore;

#[cfg(test)]
mod memory {
    use std::sync::Mutex;

    use time::OffsetDateTime;

    use super::*;

    /// In-process store used by router tests.
    #[derive(Default)]
    pub struct MemoryUserStore {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
            Ok(self.users.lock().unwrap().iter().any(|u| u.username == username))
        }

        async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
            Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
        }

        async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.username == new_user.username) {
                return Err(StoreError::Conflict("Username already taken".into()));
            }
            if users.iter().any(|u| u.email == new_user.email) {
                return Err(StoreError::Conflict("Email already registered".into()));
            }
            let user = User {
                id: Uuid::new_v4(),
                full_name: new_user.full_name,
                username: new_user.username,
                email: new_user.email,
                phone: new_user.phone,
                password_hash: new_user.password_hash,
                created_at: OffsetDateTime::now_utc(),
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| {
                    if login_is_email(login) {
                        u.email == login
                    } else {
                        u.username == login
                    }
                })
                .cloned())
        }

        async fn list(&self) -> Result<Vec<User>, StoreError> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn update(&self, id: Uuid, changes: UserUpdate) -> Result<Option<User>, StoreError> {
            let mut users = self.users.lock().unwrap();
            if let Some(email) = &changes.email {
                if users.iter().any(|u| u.id != id && &u.email == email) {
                    return Err(StoreError::Conflict("Email already registered".into()));
                }
            }
            let Some(user) = users.iter_mut().find(|u| u.id == id) else {
                return Ok(None);
            };
            if let Some(full_name) = changes.full_name {
                user.full_name = full_name;
            }
            if let Some(email) = changes.email {
                user.email = email;
            }
            if let Some(phone) = changes.phone {
                user.phone = phone;
            }
            Ok(Some(user.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|u| u.id != id);
            Ok(users.len() != before)
        }
    }
}
