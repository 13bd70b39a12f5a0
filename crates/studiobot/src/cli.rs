use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "studiobot")]
#[command(author, version, about = "Telegram front-end for the studio CRM", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Print the callback route table and pattern conflicts, then exit
    Routes,

    /// Show which route would handle a callback identifier
    Resolve {
        /// Callback data, e.g. project_details_42
        data: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["studiobot"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_resolve_takes_identifier() {
        let cli = Cli::try_parse_from(["studiobot", "resolve", "project_details_42"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Resolve {
                data: "project_details_42".to_string()
            })
        );
    }
}
