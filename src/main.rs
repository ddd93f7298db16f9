use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;

use hardware_mart::config::Config;
use hardware_mart::create_app;
use hardware_mart::entities::{seed_admin, setup_schema};
use hardware_mart::media::HttpMediaHost;
use hardware_mart::notifier::HttpNotifier;
use hardware_mart::profanity::ProfanityFilter;
use hardware_mart::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env().expect("Invalid configuration");

    let db: DatabaseConnection = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to the catalog store");
    setup_schema(&db).await;
    seed_admin(
        &db,
        &config.seed_admin_username,
        &config.seed_admin_email,
        &config.seed_admin_password,
    )
    .await;

    let state = Arc::new(AppState {
        db,
        media: Arc::new(HttpMediaHost::new(&config)),
        notifier: Arc::new(HttpNotifier::new(&config)),
        profanity: ProfanityFilter::new(&config.profanity_extra_words),
        jwt_secret: config.jwt_secret.clone(),
    });

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("Failed to bind port");
    tracing::info!(port = config.port, "Server running");
    axum::serve(listener, app).await.expect("Server failed");
}
