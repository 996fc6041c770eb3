use std::error::Error;

use scoring::executable_utils::{initialize_executable, initialize_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("Starting analyzer...");
    let config = initialize_executable()?;
    initialize_tracing(&config.server.log_level);

    let analyzer = classifieds::build_analyzer(&config)?;
    tracing::info!(model = analyzer.has_model(), project = %config.common.project_name, "Analyzer ready");

    run_server(config.server, analyzer).await
}
