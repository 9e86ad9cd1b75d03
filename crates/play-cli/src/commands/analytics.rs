use play_engine::PlayService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnalyticsArgs;
use crate::output::output;

/// Handle `playtrack analytics`.
pub async fn handle(
    args: &AnalyticsArgs,
    service: &PlayService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let analytics = service.get_aggregate_analytics(args.org.as_deref()).await?;
    output(&analytics, flags.format)
}
