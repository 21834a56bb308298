//! Slack Relatorio - Daily Balance Report Relay
//!
//! Receives the `/relatorio` slash command, opens a modal asking for the
//! day's account balances and outflows, and posts the computed report to a
//! Slack incoming webhook.
//!
//! Nothing is stored between requests.

pub mod amount;
pub mod config;
pub mod form;
pub mod payload;
pub mod report;
pub mod server;
pub mod slack;
