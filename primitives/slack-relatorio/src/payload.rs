//! Inbound Slack request bodies.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::{form::Field, report::Submission};

/// Interaction type Slack sends when a modal is submitted.
pub const VIEW_SUBMISSION: &str = "view_submission";

/// Form body of a slash-command invocation.
///
/// Slack sends many more fields; only the ones used here are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommand {
    pub trigger_id: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub channel_name: Option<String>,
}

/// Form body of an interactivity request: one field holding JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionForm {
    pub payload: String,
}

#[derive(Debug, Error)]
#[error("malformed interaction payload: {0}")]
pub struct PayloadError(#[from] serde_json::Error);

/// Decoded interaction payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub view: Option<SubmittedView>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmittedView {
    #[serde(default)]
    pub callback_id: Option<String>,
    #[serde(default)]
    pub state: ViewState,
}

/// `state.values`: block id -> action id -> input state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, InputState>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputState {
    #[serde(default)]
    pub value: Option<String>,
}

impl Interaction {
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn is_submission(&self) -> bool {
        self.kind == VIEW_SUBMISSION
    }

    pub fn callback_id(&self) -> Option<&str> {
        self.view.as_ref()?.callback_id.as_deref()
    }

    /// Raw text typed into `field`, if the view carried it.
    pub fn input(&self, field: Field) -> Option<&str> {
        self.view
            .as_ref()?
            .state
            .values
            .get(field.id())?
            .get(&field.action_id())?
            .value
            .as_deref()
    }

    /// Reads all six fields into a [`Submission`].
    pub fn submission(&self) -> Submission {
        Submission::from_inputs(Field::ALL.map(|field| (field, self.input(field))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::CALLBACK_ID;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn submission_json() -> String {
        json!({
            "type": "view_submission",
            "team": {"id": "T0001"},
            "user": {"id": "U0001", "username": "maria"},
            "view": {
                "id": "V0001",
                "callback_id": "relatorio_modal",
                "state": {
                    "values": {
                        "especie": {"especie_valor": {"type": "plain_text_input", "value": "100,00"}},
                        "santander": {"santander_valor": {"type": "plain_text_input", "value": "200.50"}},
                        "itau": {"itau_valor": {"type": "plain_text_input", "value": null}},
                        "contas": {"contas_valor": {"type": "plain_text_input", "value": "trinta"}},
                        "repasses": {"repasses_valor": {"type": "plain_text_input", "value": "20"}}
                    }
                }
            }
        })
        .to_string()
    }

    #[test]
    fn reads_submitted_inputs_by_block_and_action_id() {
        let interaction = Interaction::parse(&submission_json()).unwrap();

        assert!(interaction.is_submission());
        assert_eq!(interaction.input(Field::Especie), Some("100,00"));
        assert_eq!(interaction.input(Field::Itau), None);
        assert_eq!(interaction.input(Field::Cora), None);
        assert_eq!(interaction.callback_id(), Some(CALLBACK_ID));
    }

    #[test]
    fn missing_or_unparseable_inputs_become_zero() {
        let submission = Interaction::parse(&submission_json()).unwrap().submission();

        assert_eq!(submission.get(Field::Especie), Decimal::new(10000, 2));
        assert_eq!(submission.get(Field::Santander), Decimal::new(20050, 2));
        assert_eq!(submission.get(Field::Itau), Decimal::ZERO);
        assert_eq!(submission.get(Field::Cora), Decimal::ZERO);
        assert_eq!(submission.get(Field::Contas), Decimal::ZERO);
        assert_eq!(submission.get(Field::Repasses), Decimal::new(20, 0));
    }

    #[test]
    fn other_interaction_kinds_are_not_submissions() {
        let interaction = Interaction::parse(r#"{"type":"block_actions","actions":[]}"#).unwrap();

        assert!(!interaction.is_submission());
        assert_eq!(interaction.callback_id(), None);
        let submission = interaction.submission();
        assert!(Field::ALL.iter().all(|field| submission.get(*field).is_zero()));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Interaction::parse("{not json").is_err());
        assert!(Interaction::parse(r#"{"view": {}}"#).is_err());
    }
}
