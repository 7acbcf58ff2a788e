use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use en_notebook::state::AppState;
use en_notebook::{config, content, db, handlers, paths};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "en_notebook=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_path = config::load_database_path();
  let pool = db::init_db(&db_path).expect("Failed to initialize database");

  let data_file = PathBuf::from(paths::data_file_path());
  let library = content::load_library(&data_file);
  tracing::info!(
    "Loaded {} book(s) with {} lesson(s)",
    library.books.len(),
    library.total_lessons()
  );

  let policy = config::load_selection_policy();
  tracing::info!("Due-card selection policy: {}", policy.as_str());

  let state = AppState::new(pool, library, data_file, policy);
  let app = handlers::build_router(state);

  let bind_addr = config::server_bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config::SERVER_PORT);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
