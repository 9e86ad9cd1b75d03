use play_engine::PlayService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProgressArgs;
use crate::output::output;

/// Handle `playtrack progress`.
pub async fn handle(
    args: &ProgressArgs,
    service: &PlayService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match &args.game {
        Some(game) => {
            let record = service.get_game_progress(&args.learner, game).await?;
            output(&record, flags.format)
        }
        None => {
            let records = service.get_progress(&args.learner).await?;
            output(&records, flags.format)
        }
    }
}
