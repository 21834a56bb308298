//! Report form: the six input fields and the Slack modal that collects them.

use serde::Serialize;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Callback id attached to the report modal.
pub const CALLBACK_ID: &str = "relatorio_modal";

const MODAL_TITLE: &str = "Relatório financeiro";
const MODAL_SUBMIT: &str = "Enviar";

/// One of the six values collected by the report modal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Especie,
    Santander,
    Itau,
    Cora,
    Contas,
    Repasses,
}

impl Field {
    /// Every field, in modal order.
    pub const ALL: [Field; 6] = [
        Field::Especie,
        Field::Santander,
        Field::Itau,
        Field::Cora,
        Field::Contas,
        Field::Repasses,
    ];

    /// Account balances available at the start of the day.
    pub const BALANCES: [Field; 4] = [Field::Especie, Field::Santander, Field::Itau, Field::Cora];

    /// Money leaving during the day.
    pub const OUTFLOWS: [Field; 2] = [Field::Contas, Field::Repasses];

    /// Block id of the field's input block.
    pub fn id(self) -> &'static str {
        match self {
            Field::Especie => "especie",
            Field::Santander => "santander",
            Field::Itau => "itau",
            Field::Cora => "cora",
            Field::Contas => "contas",
            Field::Repasses => "repasses",
        }
    }

    /// Action id of the text input inside the field's block.
    pub fn action_id(self) -> String {
        format!("{}_valor", self.id())
    }

    /// Prompt shown above the input in the modal.
    pub fn prompt(self) -> &'static str {
        match self {
            Field::Especie => "Informe o saldo em espécie:",
            Field::Santander => "Informe o saldo no Santander:",
            Field::Itau => "Informe o saldo no Itaú:",
            Field::Cora => "Informe o saldo no Cora:",
            Field::Contas => "Informe o valor das contas a pagar:",
            Field::Repasses => "Informe o valor dos repasses:",
        }
    }

    /// Name used for the field in the posted report.
    pub fn label(self) -> &'static str {
        match self {
            Field::Especie => "Espécie",
            Field::Santander => "Santander",
            Field::Itau => "Itaú",
            Field::Cora => "Cora",
            Field::Contas => "Contas a pagar",
            Field::Repasses => "Repasses",
        }
    }

    pub fn is_balance(self) -> bool {
        Self::BALANCES.contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown report field `{0}` (expected one of especie, santander, itau, cora, contas, repasses)")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Field::ALL
            .into_iter()
            .find(|field| field.id() == wanted)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputElement {
    PlainTextInput { action_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Input {
        block_id: String,
        label: TextObject,
        element: InputElement,
    },
}

impl Block {
    fn for_field(field: Field) -> Self {
        Block::Input {
            block_id: field.id().to_string(),
            label: TextObject::plain(field.prompt()),
            element: InputElement::PlainTextInput {
                action_id: field.action_id(),
            },
        }
    }
}

/// A Slack view as accepted by `views.open`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum View {
    Modal {
        title: TextObject,
        submit: TextObject,
        callback_id: String,
        blocks: Vec<Block>,
    },
}

/// Builds the modal that asks for the day's balances and outflows.
pub fn report_modal() -> View {
    View::Modal {
        title: TextObject::plain(MODAL_TITLE),
        submit: TextObject::plain(MODAL_SUBMIT),
        callback_id: CALLBACK_ID.to_string(),
        blocks: Field::ALL.into_iter().map(Block::for_field).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn modal_serializes_to_slack_view_shape() {
        let view = serde_json::to_value(report_modal()).unwrap();

        assert_eq!(view["type"], "modal");
        assert_eq!(view["title"], json!({"type": "plain_text", "text": "Relatório financeiro"}));
        assert_eq!(view["submit"], json!({"type": "plain_text", "text": "Enviar"}));
        assert_eq!(view["callback_id"], "relatorio_modal");

        let blocks = view["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 6);
        assert_eq!(
            blocks[0],
            json!({
                "type": "input",
                "block_id": "especie",
                "label": {"type": "plain_text", "text": "Informe o saldo em espécie:"},
                "element": {"type": "plain_text_input", "action_id": "especie_valor"}
            })
        );
    }

    #[test]
    fn blocks_follow_field_order() {
        let View::Modal { blocks, .. } = report_modal();
        let ids: Vec<_> = blocks
            .iter()
            .map(|Block::Input { block_id, .. }| block_id.as_str())
            .collect();

        assert_eq!(ids, ["especie", "santander", "itau", "cora", "contas", "repasses"]);
    }

    #[test]
    fn field_names_parse_case_insensitively() {
        assert_eq!("Santander".parse::<Field>(), Ok(Field::Santander));
        assert_eq!(" repasses ".parse::<Field>(), Ok(Field::Repasses));
        assert!("bradesco".parse::<Field>().is_err());
    }

    #[test]
    fn balances_and_outflows_partition_the_fields() {
        for field in Field::ALL {
            assert_ne!(field.is_balance(), Field::OUTFLOWS.contains(&field));
        }
    }
}
