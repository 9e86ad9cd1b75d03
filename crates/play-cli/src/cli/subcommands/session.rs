use clap::Subcommand;

/// Session lifecycle commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// Start a session and print it.
    Start {
        learner: String,
        game: String,
        /// Organization the session is attributed to.
        #[arg(long)]
        org: Option<String>,
        /// Difficulty label (stored in settings).
        #[arg(long)]
        difficulty: Option<String>,
        /// Game settings as a JSON object.
        #[arg(long)]
        settings: Option<String>,
    },
    /// Record an in-session event.
    Event {
        session_id: String,
        #[arg(long)]
        learner: String,
        /// Event type, e.g. question_answer, hint_used, difficulty_change.
        #[arg(long = "type")]
        event_type: String,
        /// Event payload as a JSON object.
        #[arg(long)]
        payload: Option<String>,
    },
    /// Complete a session and update progress.
    Complete {
        session_id: String,
        #[arg(long)]
        score: f64,
        #[arg(long)]
        attempted: u32,
        #[arg(long)]
        correct: u32,
    },
    /// Abandon an open session.
    Abandon {
        session_id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Show one session.
    Show { session_id: String },
    /// List a learner's sessions, newest first.
    List { learner: String },
    /// List the events of a session.
    Events { session_id: String },
}
