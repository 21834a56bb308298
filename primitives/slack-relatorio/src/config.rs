//! Command-line and environment configuration.

use clap::Parser;
use std::{
    net::{AddrParseError, SocketAddr},
    time::Duration,
};
use thiserror::Error;

use crate::{
    form::Field,
    report::{OpeningPolicy, PolicyError},
    slack::{DEFAULT_API_BASE, SlackClient, SlackError},
};

/// Slack relay that collects the daily balance report and posts it to a channel.
#[derive(Parser, Debug, Clone)]
#[command(name = "slack-relatorio")]
#[command(about = "Opens the daily report modal and posts the computed report to Slack")]
pub struct Args {
    /// Bot token used to call views.open.
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// Incoming webhook that receives the report.
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to.
    #[arg(long, env = "SLACK_RELATORIO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Base URL of the Slack Web API.
    #[arg(long, env = "SLACK_API_BASE", default_value = DEFAULT_API_BASE)]
    pub slack_api_base: String,

    /// Timeout for calls to Slack, in seconds.
    #[arg(short, long, env = "SLACK_RELATORIO_TIMEOUT", default_value = "10")]
    pub timeout: u64,

    /// Balance fields summed into the opening balance (comma-separated).
    #[arg(
        long,
        env = "SLACK_RELATORIO_OPENING_FIELDS",
        value_delimiter = ',',
        default_values = ["santander", "itau", "cora"]
    )]
    pub opening_balance_fields: Vec<Field>,

    /// Emit logs as JSON.
    #[arg(long, env = "SLACK_RELATORIO_LOG_JSON")]
    pub log_json: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen address {0}: {1}")]
    ListenAddress(String, #[source] AddrParseError),
    #[error("invalid opening balance fields: {0}")]
    OpeningPolicy(#[from] PolicyError),
    #[error(transparent)]
    Slack(#[from] SlackError),
}

impl Args {
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e| ConfigError::ListenAddress(addr, e))
    }

    pub fn opening_policy(&self) -> Result<OpeningPolicy, ConfigError> {
        Ok(OpeningPolicy::new(self.opening_balance_fields.iter().copied())?)
    }

    pub fn slack_client(&self) -> Result<SlackClient, ConfigError> {
        Ok(SlackClient::new(
            &self.slack_api_base,
            self.bot_token.as_str(),
            self.webhook_url.as_str(),
            Duration::from_secs(self.timeout),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        parse_on("127.0.0.1", extra)
    }

    fn parse_on(host: &str, extra: &[&str]) -> Result<Args, clap::Error> {
        let mut argv = vec![
            "slack-relatorio",
            "--bot-token",
            "xoxb-test",
            "--webhook-url",
            "https://hooks.slack.com/services/T/B/X",
            "--host",
            host,
            "--port",
            "3000",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv)
    }

    #[test]
    fn default_policy_excludes_cash() {
        let args = parse(&[]).unwrap();

        assert_eq!(args.opening_policy().unwrap(), OpeningPolicy::default());
        assert_eq!(args.listen_addr().unwrap(), "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn opening_fields_are_comma_separated() {
        let args = parse(&["--opening-balance-fields", "especie,santander,itau,cora"]).unwrap();

        assert_eq!(args.opening_policy().unwrap(), OpeningPolicy::all_balances());
    }

    #[test]
    fn outflow_fields_are_rejected_in_opening_policy() {
        let args = parse(&["--opening-balance-fields", "santander,contas"]).unwrap();

        assert!(matches!(
            args.opening_policy(),
            Err(ConfigError::OpeningPolicy(PolicyError::NotABalance(Field::Contas)))
        ));
    }

    #[test]
    fn unknown_fields_fail_to_parse() {
        assert!(parse(&["--opening-balance-fields", "bradesco"]).is_err());
    }

    #[test]
    fn bad_host_is_reported() {
        let args = parse_on("not a host", &[]).unwrap();

        assert!(matches!(args.listen_addr(), Err(ConfigError::ListenAddress(..))));
    }
}
