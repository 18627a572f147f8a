use mock_server::Db;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");

    let db = Db::default();
    if let Ok(username) = std::env::var("SEED_USERNAME") {
        let user = db
            .write()
            .await
            .insert_user(&username, None)
            .map_err(|e| format!("failed to seed user: {e:?}"))?;
        info!(username, user_id = %user.id, "seeded user");
    }

    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    mock_server::run_with(listener, db).await?;
    Ok(())
}
