use play_config::PlayConfig;
use play_core::enums::EventType;
use play_engine::PlayService;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::commands::shared::{effective_limit, parse_payload};
use crate::output::output;

/// Handle `playtrack session`.
pub async fn handle(
    action: &SessionCommands,
    service: &PlayService,
    config: &PlayConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::Start {
            learner,
            game,
            org,
            difficulty,
            settings,
        } => {
            let mut settings = parse_payload(settings.as_deref(), "settings")?;
            if let Some(difficulty) = difficulty {
                settings.insert("difficulty".into(), difficulty.clone().into());
            }
            let session = service
                .start_session(learner, game, settings, org.as_deref())
                .await?;
            output(&session, flags.format)
        }
        SessionCommands::Event {
            session_id,
            learner,
            event_type,
            payload,
        } => {
            let payload = parse_payload(payload.as_deref(), "payload")?;
            let event_type = EventType::from(event_type.replace('-', "_"));
            let event = service
                .track_event(session_id, learner, event_type, payload)
                .await?;
            output(&event, flags.format)
        }
        SessionCommands::Complete {
            session_id,
            score,
            attempted,
            correct,
        } => {
            let session = service
                .complete_session(session_id, *score, *attempted, *correct)
                .await?;
            output(&session, flags.format)
        }
        SessionCommands::Abandon { session_id, reason } => {
            let session = service
                .abandon_session(session_id, reason.as_deref())
                .await?;
            output(&session, flags.format)
        }
        SessionCommands::Show { session_id } => {
            let session = service.get_session(session_id).await?;
            output(&session, flags.format)
        }
        SessionCommands::List { learner } => {
            let limit = effective_limit(None, flags.limit, config.general.default_limit);
            let sessions = service.list_sessions(learner, Some(limit)).await?;
            output(&sessions, flags.format)
        }
        SessionCommands::Events { session_id } => {
            let events = service.list_events(session_id).await?;
            output(&events, flags.format)
        }
    }
}
