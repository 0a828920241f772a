use crate::config::BootstrapAdmin;
use anyhow::Result;
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use sqlx::PgPool;

/// Create the configured bootstrap admin if that email is not taken yet.
/// Without this a fresh deployment has no credential that can reach the
/// admin endpoints.
pub async fn bootstrap_admin(pool: &PgPool, admin: &BootstrapAdmin) -> Result<()> {
    let salt = SaltString::generate(rand_core::OsRng);
    let hash = Argon2::default()
        .hash_password(admin.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash bootstrap admin password: {}", e))?
        .to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO admins (admin_name, admin_email, admin_password)
        VALUES ($1, $2, $3)
        ON CONFLICT (admin_email) DO NOTHING
        "#,
    )
    .bind(&admin.name)
    .bind(&admin.email)
    .bind(&hash)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        tracing::info!("Bootstrap admin {} created", admin.email);
    }
    Ok(())
}
