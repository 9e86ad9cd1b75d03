use play_config::PlayConfig;
use play_engine::PlayService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RecommendArgs;
use crate::commands::shared::effective_limit;
use crate::output::output;

/// Handle `playtrack recommend`.
pub async fn handle(
    args: &RecommendArgs,
    service: &PlayService,
    config: &PlayConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let max_count =
        effective_limit(None, flags.limit, config.general.default_recommendations) as usize;
    let recommendations = if args.strict {
        service
            .get_recommendations_with_prerequisites(&args.learner, max_count)
            .await?
    } else {
        service.get_recommendations(&args.learner, max_count).await?
    };
    output(&recommendations, flags.format)
}
