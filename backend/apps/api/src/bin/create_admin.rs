//! Admin Bootstrap Tool
//!
//! Creates an administrator account from environment variables. There is
//! no self-registration; this is how the first (and usually only) admin
//! comes to exist.
//!
//! Usage:
//!   ADMIN_USERNAME=alice ADMIN_EMAIL=alice@example.com \
//!   ADMIN_PASSWORD='...' cargo run --bin create_admin

use anyhow::Context;
use auth::PgAuthRepository;
use auth::domain::entity::admin::Admin;
use auth::domain::repository::AdminRepository;
use auth::domain::value_object::{email::Email, username::Username};
use platform::password::ClearTextPassword;
use sqlx::postgres::PgPoolOptions;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "create_admin=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let username = Username::new(&env::var("ADMIN_USERNAME").context("ADMIN_USERNAME must be set")?)
        .map_err(|e| anyhow::anyhow!("invalid username: {e}"))?;
    let email = Email::new(&env::var("ADMIN_EMAIL").context("ADMIN_EMAIL must be set")?)
        .map_err(|e| anyhow::anyhow!("invalid email: {e}"))?;
    let password = ClearTextPassword::new(
        env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?,
    )
    .map_err(|e| anyhow::anyhow!("invalid password: {e}"))?;

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    let hash = password
        .hash()
        .map_err(|e| anyhow::anyhow!("hashing failed: {e}"))?;

    let admin = Admin::new(username, email, hash);
    let repo = PgAuthRepository::new(pool);
    repo.create(&admin).await?;

    tracing::info!(
        admin_id = %admin.admin_id,
        username = %admin.username,
        "Admin account created"
    );

    Ok(())
}
