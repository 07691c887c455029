#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Configuration for the Outpost submitter.

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Color, Style},
    },
};

mod chain;
pub use chain::{ContractAddresses, L1Opts, RollupOpts};

mod operator;
pub use operator::OperatorOpts;

mod submitter;
pub use submitter::SubmitterOpts;

mod telemetry;
pub use telemetry::TelemetryOpts;

/// CLI options for the Outpost submitter.
#[derive(Debug, Clone, Parser)]
#[command(author, version, styles = cli_styles(), about)]
pub struct Opts {
    /// A unique name for this Outpost instance, used in metrics and logs
    #[clap(long, env = "OUTPOST_INSTANCE_NAME", default_value = "outpost")]
    pub instance_name: String,
    /// L1-related configuration options
    #[clap(flatten)]
    pub l1: L1Opts,
    /// Rollup-node-related configuration options
    #[clap(flatten)]
    pub rollup: RollupOpts,
    /// Submitter-related configuration options
    #[clap(flatten)]
    pub submitter: SubmitterOpts,
    /// Operator-related configuration options
    #[clap(flatten)]
    pub operator: OperatorOpts,
    /// The contract addresses required to run the submitter.
    #[clap(flatten)]
    pub contracts: ContractAddresses,
    /// Telemetry-related configuration options
    #[clap(flatten)]
    pub telemetry: TelemetryOpts,
}

/// Styles for the CLI.
const fn cli_styles() -> Styles {
    Styles::styled()
        .usage(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .header(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .error(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .valid(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

#[cfg(test)]
mod tests {
    use super::Opts;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Opts::command().debug_assert()
    }
}
