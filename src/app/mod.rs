mod router;
pub mod server;
mod state;
pub mod tracing;

pub use router::router;
pub use state::AppState;

use crate::config::{self, LoggingConfiguration};
use crate::engine::ProviderRegistry;
use crate::error::LoggingError;
use tokio_util::sync::CancellationToken;

/// Application entry point. Initializes tracing, builds the provider graph and serves HTTP.
pub async fn run() -> Result<(), LoggingError> {
    // Handle healthcheck subcommand (for Docker healthcheck in distroless image)
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        match crate::healthcheck().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1)
            }
        }
    }

    tracing::init_tracing();

    let settings = config::get_configuration()?;
    ::tracing::info!(config = %settings.config_path.display(), "Loaded settings");

    let graph = LoggingConfiguration::from_file(&settings.config_path)?
        .build(&ProviderRegistry::with_builtin_providers())?;

    let app = router(AppState::new(graph));
    server::serve(app, settings.http_port, CancellationToken::new()).await
}
