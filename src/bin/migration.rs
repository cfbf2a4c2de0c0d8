use anyhow::Context;
use shipment_service::{config, db};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("Starting database migration");

    let db_cfg: db::DbConfig = (&cfg).into();
    let pool = db::establish_connection_with_config(&db_cfg)
        .await
        .context("failed to connect to the database")?;

    db::run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    info!("Migration completed successfully");
    Ok(())
}
