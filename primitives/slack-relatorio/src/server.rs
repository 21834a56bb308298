//! HTTP routes Slack calls into.

use axum::{Form, Router, extract::State, http::StatusCode, routing::post};
use chrono::Local;
use std::sync::Arc;

use crate::{
    form::{CALLBACK_ID, report_modal},
    payload::{Interaction, InteractionForm, SlashCommand},
    report::{OpeningPolicy, Report},
    slack::{SlackClient, SlackError},
};

/// Slash-command request URL.
pub const COMMAND_PATH: &str = "/slack/relatorio";

/// Interactivity request URL.
pub const INTERACTION_PATH: &str = "/slack/interativo";

/// Shared application state.
pub struct AppState {
    slack: SlackClient,
    opening: OpeningPolicy,
}

impl AppState {
    pub fn new(slack: SlackClient, opening: OpeningPolicy) -> Self {
        Self { slack, opening }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(COMMAND_PATH, post(open_report_modal))
        .route(INTERACTION_PATH, post(submit_report))
        .with_state(state)
}

/// Answers the slash command by opening the report modal.
///
/// Slack refusing the view is logged and still acknowledged; failing to reach
/// Slack at all is a 500.
async fn open_report_modal(
    State(state): State<Arc<AppState>>,
    Form(command): Form<SlashCommand>,
) -> StatusCode {
    tracing::info!(
        command = command.command.as_deref().unwrap_or("-"),
        user = command.user_name.as_deref().unwrap_or("-"),
        channel = command.channel_name.as_deref().unwrap_or("-"),
        "slash command received"
    );

    match state.slack.open_view(&command.trigger_id, &report_modal()).await {
        Ok(()) => StatusCode::OK,
        Err(SlackError::Api(code)) => {
            tracing::warn!(error = %code, "Slack refused to open the report modal");
            StatusCode::OK
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to open the report modal");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Computes the report from a modal submission and posts it to the webhook.
///
/// A report too large to compute is logged and not posted.
async fn submit_report(
    State(state): State<Arc<AppState>>,
    Form(form): Form<InteractionForm>,
) -> StatusCode {
    let interaction = match Interaction::parse(&form.payload) {
        Ok(interaction) => interaction,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting interaction");
            return StatusCode::BAD_REQUEST;
        }
    };

    if !interaction.is_submission() {
        tracing::debug!(kind = %interaction.kind, "ignoring interaction");
        return StatusCode::OK;
    }

    if let Some(callback_id) = interaction.callback_id().filter(|id| *id != CALLBACK_ID) {
        tracing::warn!(callback_id, "submission from an unexpected view, reporting anyway");
    }

    let report = match Report::compute(
        interaction.submission(),
        &state.opening,
        Local::now().date_naive(),
    ) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(error = %e, "report not posted");
            return StatusCode::OK;
        }
    };

    tracing::info!(
        opening = %report.opening,
        outflows = %report.outflows,
        closing = %report.closing,
        "report computed"
    );

    if let Err(e) = state.slack.post_webhook(&report.render()).await {
        tracing::error!(
            error = %e,
            webhook = %state.slack.webhook_display(),
            "failed to post report"
        );
    }

    StatusCode::OK
}
