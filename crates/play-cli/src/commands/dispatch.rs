use play_config::PlayConfig;
use play_engine::PlayService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    service: &PlayService,
    config: &PlayConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    tracing::debug!(?command, "dispatching command");
    match command {
        Commands::Session { action } => {
            commands::session::handle(&action, service, config, flags).await
        }
        Commands::Progress(args) => commands::progress::handle(&args, service, flags).await,
        Commands::Recommend(args) => {
            commands::recommend::handle(&args, service, config, flags).await
        }
        Commands::Metrics(args) => commands::metrics::handle(&args, service, flags).await,
        Commands::Analytics(args) => commands::analytics::handle(&args, service, flags).await,
        Commands::Catalog => commands::catalog::handle(service, flags),
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
