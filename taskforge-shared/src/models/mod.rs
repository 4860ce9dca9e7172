/// Database models for taskforge
///
/// # Models
///
/// - `user`: user accounts (the credential store)
/// - `task`: per-user tasks, every operation scoped to an owner
///
/// # Example
///
/// ```no_run
/// use taskforge_shared::models::user::{CreateUser, User};
/// use taskforge_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "alice".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
