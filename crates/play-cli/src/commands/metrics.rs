use play_engine::PlayService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::MetricsArgs;
use crate::output::output;

/// Handle `playtrack metrics`.
pub async fn handle(
    args: &MetricsArgs,
    service: &PlayService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let metrics = service.get_performance_metrics(&args.learner).await?;
    output(&metrics, flags.format)
}
