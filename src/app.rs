use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::dataset::ObservationRepository;
use crate::services::DashboardService;

/// Dashboard application with its spawned HTTP server
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Load the tidy table and start serving it.
    ///
    /// Fails before binding when the table cannot be located or read.
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let csv_path = config.resolve_csv_path()?;
        info!("Loading tidy table from {}", csv_path.display());

        let repo = tokio::task::spawn_blocking(move || ObservationRepository::load(&csv_path))
            .await??;
        info!("Loaded {} observations", repo.len());

        Self::serve(config, repo).await
    }

    /// Start serving an already loaded repository
    pub async fn serve(
        config: Config,
        repo: ObservationRepository,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let app_state = AppState {
            dashboard_service: DashboardService::new(repo),
        };
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });

        info!("Application initialized successfully");
        Ok(Self { server_handle })
    }

    /// Run until the server stops
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
