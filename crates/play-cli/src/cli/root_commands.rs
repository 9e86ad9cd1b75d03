use clap::{Args, Subcommand};

use crate::cli::subcommands::SessionCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Play session lifecycle and events.
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Progress records of a learner.
    Progress(ProgressArgs),
    /// Games to play next.
    Recommend(RecommendArgs),
    /// Performance metrics of a learner.
    Metrics(MetricsArgs),
    /// Platform-wide analytics.
    Analytics(AnalyticsArgs),
    /// List the game catalog.
    Catalog,
    /// Print the JSON Schema of an output type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ProgressArgs {
    pub learner: String,

    /// Only the record for this game.
    #[arg(long)]
    pub game: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct RecommendArgs {
    pub learner: String,

    /// Only offer unplayed games whose prerequisites are mastered.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Debug, Args)]
pub struct MetricsArgs {
    pub learner: String,
}

#[derive(Clone, Debug, Args)]
pub struct AnalyticsArgs {
    /// Scope to one organization.
    #[arg(long)]
    pub org: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// session, event, progress, recommendation, metrics, analytics, game
    pub type_name: String,
}
