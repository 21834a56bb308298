//! Daily balance report: submitted values, derived totals and the posted text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::{collections::BTreeMap, fmt};
use thiserror::Error;

use crate::{
    amount::{format_brl, parse_amount},
    form::Field,
};

/// Values submitted through the modal, keyed by field.
///
/// Fields that were never set read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Submission {
    values: BTreeMap<Field, Decimal>,
}

impl Submission {
    /// Builds a submission from raw text inputs, parsing each one with
    /// [`parse_amount`]. Missing inputs are zero.
    pub fn from_inputs<'a, I>(inputs: I) -> Self
    where
        I: IntoIterator<Item = (Field, Option<&'a str>)>,
    {
        inputs
            .into_iter()
            .map(|(field, raw)| (field, raw.map(parse_amount).unwrap_or(Decimal::ZERO)))
            .collect()
    }

    pub fn get(&self, field: Field) -> Decimal {
        self.values.get(&field).copied().unwrap_or(Decimal::ZERO)
    }
}

impl FromIterator<(Field, Decimal)> for Submission {
    fn from_iter<T: IntoIterator<Item = (Field, Decimal)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("`{0}` is an outflow and cannot count toward the opening balance")]
    NotABalance(Field),
    #[error("the opening balance needs at least one balance field")]
    Empty,
}

/// Which balance fields are summed into the opening balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpeningPolicy {
    fields: Vec<Field>,
}

impl OpeningPolicy {
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Result<Self, PolicyError> {
        let mut selected: Vec<Field> = Vec::new();
        for field in fields {
            if !field.is_balance() {
                return Err(PolicyError::NotABalance(field));
            }
            if !selected.contains(&field) {
                selected.push(field);
            }
        }

        if selected.is_empty() {
            return Err(PolicyError::Empty);
        }

        selected.sort();
        Ok(Self { fields: selected })
    }

    /// Sums every balance field, cash included.
    pub fn all_balances() -> Self {
        Self {
            fields: Field::BALANCES.to_vec(),
        }
    }

    /// Opening balance for `submission`, or `None` if the sum overflows.
    pub fn total(&self, submission: &Submission) -> Option<Decimal> {
        checked_sum(self.fields.iter().map(|field| submission.get(*field)))
    }
}

/// Cash on hand is left out of the opening balance unless configured.
impl Default for OpeningPolicy {
    fn default() -> Self {
        Self {
            fields: vec![Field::Santander, Field::Itau, Field::Cora],
        }
    }
}

impl fmt::Display for OpeningPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, Decimal::checked_add)
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("{0} is too large to compute")]
    Overflow(&'static str),
}

/// A computed daily report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub date: NaiveDate,
    pub submission: Submission,
    pub opening: Decimal,
    pub outflows: Decimal,
    pub closing: Decimal,
}

impl Report {
    pub fn compute(
        submission: Submission,
        policy: &OpeningPolicy,
        date: NaiveDate,
    ) -> Result<Self, ReportError> {
        let opening = policy
            .total(&submission)
            .ok_or(ReportError::Overflow("opening balance"))?;
        let outflows = checked_sum(Field::OUTFLOWS.iter().map(|field| submission.get(*field)))
            .ok_or(ReportError::Overflow("total outflows"))?;
        let closing = opening
            .checked_sub(outflows)
            .ok_or(ReportError::Overflow("closing balance"))?;

        Ok(Self {
            date,
            opening,
            outflows,
            closing,
            submission,
        })
    }

    /// Text posted to the webhook, formatted with Slack mrkdwn.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "📅 *Relatório do dia - {}*", self.date.format("%d/%m/%Y"))?;
        writeln!(f)?;
        writeln!(f, "🔵 *Saldo inicial*:")?;
        for field in Field::BALANCES {
            writeln!(f, "• {}: {}", field.label(), format_brl(self.submission.get(field)))?;
        }
        writeln!(f, "• *Total*: {}", format_brl(self.opening))?;
        writeln!(f)?;
        writeln!(f, "🔴 *Saídas do dia*:")?;
        for field in Field::OUTFLOWS {
            writeln!(f, "• {}: -{}", field.label(), format_brl(self.submission.get(field)))?;
        }
        writeln!(f, "• *Total de saídas*: -{}", format_brl(self.outflows))?;
        writeln!(f)?;
        writeln!(f, "📉 *Saldo final após saídas*: {}", format_brl(self.closing))
    }
}
