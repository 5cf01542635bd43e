//! Admin command definitions and dispatch.

pub mod cleanup;
pub mod migrate;
pub mod report;
pub mod seed;
pub mod status;

use clap::{Args, CommandFactory, Parser, Subcommand};

use boyce_core::config::AppConfig;
use boyce_core::error::AppError;

/// Title line of the usage listing
const TITLE: &str = "Boyce - Administrative Tasks";

/// Boyce administrative tasks
#[derive(Debug, Parser)]
#[command(
    name = "boyce-manage",
    version,
    about,
    long_about = None,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Admin command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Anything after the command name is accepted and ignored. Plain comment so
// the variant's doc stays the subcommand description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct ExtraArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub rest: Vec<String>,
}

/// Admin commands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Run database migrations
    Migrate(ExtraArgs),
    /// Seed initial data
    Seed(ExtraArgs),
    /// Clean up old logs
    Cleanup(ExtraArgs),
    /// Generate administrative report
    Report(ExtraArgs),
    /// Show application status
    Status(ExtraArgs),
}

impl Commands {
    fn extra(&self) -> &ExtraArgs {
        match self {
            Commands::Migrate(extra)
            | Commands::Seed(extra)
            | Commands::Cleanup(extra)
            | Commands::Report(extra)
            | Commands::Status(extra) => extra,
        }
    }

    /// Execute the command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        tracing::debug!("Running admin command {:?}", self);
        if !self.extra().rest.is_empty() {
            tracing::debug!("Ignoring extra arguments: {:?}", self.extra().rest);
        }

        match self {
            Commands::Migrate(_) => migrate::execute(config).await,
            Commands::Seed(_) => seed::execute(config).await,
            Commands::Cleanup(_) => cleanup::execute(config).await,
            Commands::Report(_) => report::execute(config).await,
            Commands::Status(_) => status::execute(config).await,
        }
    }
}

/// Usage listing: title, usage line, and every command with its description.
pub fn usage() -> String {
    let cmd = Cli::command();
    let mut text = format!(
        "{}\nUsage: {} <command>\n\nAvailable commands:\n",
        TITLE,
        cmd.get_name()
    );

    for sub in cmd.get_subcommands() {
        let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
        text.push_str(&format!("  {:<8} - {}\n", sub.get_name(), about));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lists_every_command() {
        let text = usage();
        assert!(text.starts_with(TITLE));
        assert!(text.contains("Usage: boyce-manage <command>"));
        assert!(text.contains("  migrate  - Run database migrations"));
        assert!(text.contains("  seed     - Seed initial data"));
        assert!(text.contains("  cleanup  - Clean up old logs"));
        assert!(text.contains("  report   - Generate administrative report"));
        assert!(text.contains("  status   - Show application status"));
        assert!(!text.contains("help"));
    }

    #[test]
    fn test_no_command_parses_to_none() {
        let cli = Cli::try_parse_from(["boyce-manage"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_unknown_command_is_invalid_subcommand() {
        let err = Cli::try_parse_from(["boyce-manage", "frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_help_is_not_a_command() {
        let err = Cli::try_parse_from(["boyce-manage", "help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_commands_parse_by_name() {
        let none = ExtraArgs::default();
        for (name, expected) in [
            ("migrate", Commands::Migrate(none.clone())),
            ("seed", Commands::Seed(none.clone())),
            ("cleanup", Commands::Cleanup(none.clone())),
            ("report", Commands::Report(none.clone())),
            ("status", Commands::Status(none.clone())),
        ] {
            let cli = Cli::try_parse_from(["boyce-manage", name]).unwrap();
            assert_eq!(cli.command, Some(expected));
        }
    }

    #[test]
    fn test_trailing_arguments_are_ignored() {
        let cli = Cli::try_parse_from(["boyce-manage", "report", "extra", "--verbose"]).unwrap();
        let Some(Commands::Report(extra)) = cli.command else {
            panic!("expected report, got {:?}", cli.command);
        };
        assert_eq!(extra.rest, vec!["extra", "--verbose"]);
    }
}
