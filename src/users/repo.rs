use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::email::normalize_email;
use super::password::{hash_password, verify_password};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str =
    "id, email, name, password_hash, is_active, is_staff, is_superuser, created_at";

impl User {
    /// Create a user keyed by email. The email domain is lower-cased before
    /// persisting and the password is hashed. An empty email is a validation
    /// error and nothing is written.
    pub async fn create(
        db: &SqlitePool,
        email: &str,
        name: &str,
        password: &str,
    ) -> anyhow::Result<User> {
        if email.trim().is_empty() {
            anyhow::bail!("users must have an email address");
        }
        let email = normalize_email(email.trim());
        let hash = hash_password(password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, name, password_hash, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&email)
        .bind(name)
        .bind(&hash)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Create a base user, then flip the staff and superuser flags.
    pub async fn create_superuser(
        db: &SqlitePool,
        email: &str,
        password: &str,
    ) -> anyhow::Result<User> {
        let user = Self::create(db, email, "", password).await?;
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_staff = TRUE, is_superuser = TRUE \
             WHERE id = ? \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Check credentials against the stored record. Unknown email, inactive
    /// account and wrong or blank password all collapse to `None` so callers
    /// cannot tell which check failed.
    pub async fn authenticate(
        db: &SqlitePool,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        let email = normalize_email(email.trim());
        let Some(user) = Self::find_by_email(db, &email).await? else {
            return Ok(None);
        };
        if !user.is_active {
            return Ok(None);
        }
        if !verify_password(password, &user.password_hash)? {
            return Ok(None);
        }
        Ok(Some(user))
    }

    pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &SqlitePool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Update the profile fields a user may change themselves. A new password
    /// is re-hashed; omitted fields are left untouched.
    pub async fn update_profile(
        db: &SqlitePool,
        id: Uuid,
        name: Option<&str>,
        password: Option<&str>,
    ) -> anyhow::Result<Option<User>> {
        let Some(current) = Self::find_by_id(db, id).await? else {
            return Ok(None);
        };
        let name = name.unwrap_or(&current.name);
        let password_hash = match password {
            Some(plain) => hash_password(plain)?,
            None => current.password_hash.clone(),
        };

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = ?, password_hash = ? \
             WHERE id = ? \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(&password_hash)
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{connect, run_migrations};

    async fn test_db() -> SqlitePool {
        let db = connect("sqlite::memory:", 1).await.expect("open db");
        run_migrations(&db).await.expect("migrate");
        db
    }

    #[tokio::test]
    async fn create_normalizes_domain_and_hashes_password() {
        let db = test_db().await;
        let user = User::create(&db, "Franky@EXAMPLE.COM", "Franky", "password123")
            .await
            .expect("create user");
        assert_eq!(user.email, "Franky@example.com");
        assert_ne!(user.password_hash, "password123");
        assert!(user.is_active);
        assert!(!user.is_staff);
        assert!(!user.is_superuser);
    }

    #[tokio::test]
    async fn create_rejects_empty_email_without_persisting() {
        let db = test_db().await;
        assert!(User::create(&db, "", "anon", "password123").await.is_err());
        assert!(User::create(&db, "   ", "anon", "password123").await.is_err());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&db)
            .await
            .expect("count");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn create_superuser_sets_both_flags() {
        let db = test_db().await;
        let user = User::create_superuser(&db, "admin@example.com", "password123")
            .await
            .expect("create superuser");
        assert!(user.is_staff);
        assert!(user.is_superuser);
    }

    #[tokio::test]
    async fn authenticate_never_says_which_check_failed() {
        let db = test_db().await;
        User::create(&db, "user@example.com", "Test", "password123")
            .await
            .expect("create user");

        let ok = User::authenticate(&db, "user@example.com", "password123")
            .await
            .expect("authenticate");
        assert!(ok.is_some());

        for (email, password) in [
            ("user@example.com", "wrong-password"),
            ("user@example.com", ""),
            ("nobody@example.com", "password123"),
        ] {
            let rejected = User::authenticate(&db, email, password)
                .await
                .expect("authenticate");
            assert!(rejected.is_none(), "{email}/{password} should be rejected");
        }
    }

    #[tokio::test]
    async fn authenticate_rejects_inactive_user() {
        let db = test_db().await;
        let user = User::create(&db, "user@example.com", "Test", "password123")
            .await
            .expect("create user");
        sqlx::query("UPDATE users SET is_active = FALSE WHERE id = ?")
            .bind(user.id)
            .execute(&db)
            .await
            .expect("deactivate");

        let rejected = User::authenticate(&db, "user@example.com", "password123")
            .await
            .expect("authenticate");
        assert!(rejected.is_none());
    }

    #[tokio::test]
    async fn update_profile_rehashes_password() {
        let db = test_db().await;
        let user = User::create(&db, "user@example.com", "Old Name", "password123")
            .await
            .expect("create user");

        let updated = User::update_profile(&db, user.id, Some("New Name"), Some("newpassword"))
            .await
            .expect("update")
            .expect("user exists");
        assert_eq!(updated.name, "New Name");

        let ok = User::authenticate(&db, "user@example.com", "newpassword")
            .await
            .expect("authenticate");
        assert!(ok.is_some());
        let old = User::authenticate(&db, "user@example.com", "password123")
            .await
            .expect("authenticate");
        assert!(old.is_none());
    }
}
