use inkstudio::mailer::{Mailer, SmtpMailer};
use inkstudio::{api, bootstrap, config::Config, Repository};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Local development reads .env; deployments set real env vars.
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    // Resolve the connection, run migrations, seed lookup data
    let pool = match bootstrap::run(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize store: {}", e);
            std::process::exit(1);
        }
    };

    let repo = Arc::new(Repository::new(pool));

    let mailer: Option<Arc<dyn Mailer>> = match &config.email {
        Some(settings) => match SmtpMailer::from_settings(settings) {
            Ok(m) => Some(Arc::new(m)),
            Err(e) => {
                eprintln!("Failed to configure SMTP mailer: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("SMTP not configured, booking notifications will be skipped");
            None
        }
    };

    // Create router
    let app = api::create_router(api::AppState::new(repo, config, mailer));

    // Bind on all interfaces, the hosting platform injects PORT
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
