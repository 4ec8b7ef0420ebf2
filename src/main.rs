use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use word_trainer::config::Settings;
use word_trainer::content::QuestionBanks;
use word_trainer::state::AppState;
use word_trainer::{db, handlers};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "word_trainer=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = Settings::load();

  let pool = db::init_db(&settings.database_path).expect("Failed to initialize score database");
  let banks = QuestionBanks::load(&settings).expect("Failed to load question banks");

  let bind_addr = settings.bind_addr.clone();
  let app = handlers::router(AppState::new(settings, pool, banks));

  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://{}", bind_addr);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
