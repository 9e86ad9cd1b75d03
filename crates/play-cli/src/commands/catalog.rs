use play_engine::PlayService;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `playtrack catalog`.
pub fn handle(service: &PlayService, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&service.catalog().games(), flags.format)
}
