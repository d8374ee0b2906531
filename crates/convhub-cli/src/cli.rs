use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convhub")]
#[command(about = "Privacy filter for ConversationHub transcripts and reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, env = "CONVHUB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Redact a piece of text (reads stdin when no text or file is given)
    Redact {
        /// Text to redact
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print substitutions per category to stderr
        #[arg(long)]
        stats: bool,

        /// Print audit records to stderr
        #[arg(long)]
        audit: bool,
    },

    /// Redact every string in a JSON document
    Walk {
        /// JSON file, or '-' for stdin
        path: Option<PathBuf>,
    },

    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective config, including environment overrides
    Show,

    /// Print the config file location
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_redact() {
        let cli = Cli::try_parse_from(["convhub", "redact", "--stats", "bel 0612345678"]).unwrap();
        match cli.command {
            Commands::Redact {
                text, stats, audit, ..
            } => {
                assert_eq!(text.as_deref(), Some("bel 0612345678"));
                assert!(stats);
                assert!(!audit);
            }
            _ => panic!("expected redact"),
        }
    }

    #[test]
    fn test_text_and_file_conflict() {
        let parsed = Cli::try_parse_from(["convhub", "redact", "tekst", "--file", "a.txt"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["convhub", "config", "show", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }
}
