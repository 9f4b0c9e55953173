use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "addrsuggest")]
#[command(about = "addrsuggest - Search-as-you-type address suggestions from an address API")]
#[command(version = env!("VERSION"))]
pub struct Cli {
    /// Path to one or more config files (merged in order). Defaults to
    /// config.toml if it exists.
    #[arg(long, action = clap::ArgAction::Append)]
    pub config: Vec<PathBuf>,

    /// Address API base URL. Overrides the config file and the environment.
    #[arg(long)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a sample config file.
    NewConfig {
        /// Output path for config file.
        #[arg(short, long, default_value = "config.toml")]
        path: PathBuf,
    },

    /// Run a single search and print the highlighted suggestions.
    Search {
        /// Partial address to search for.
        query: String,

        /// Number of suggestions to request. Defaults to search.page_size.
        #[arg(long)]
        page_size: Option<u32>,

        /// Print the suggestions and highlighted rows as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Drive the autocomplete from stdin. Each line replaces the input text.
    /// `:select N` picks row N, `:clear` clears the selection, `:quit` exits.
    Interactive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "addrsuggest",
            "--config",
            "a.toml",
            "--config",
            "b.toml",
            "search",
            "123 Main",
            "--page-size",
            "3",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.config, vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]);
        match cli.command {
            Commands::Search {
                query,
                page_size,
                json,
            } => {
                assert_eq!(query, "123 Main");
                assert_eq!(page_size, Some(3));
                assert!(json);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_interactive() {
        let cli =
            Cli::try_parse_from(["addrsuggest", "--api-base", "http://x.local", "interactive"])
                .unwrap();
        assert_eq!(cli.api_base.as_deref(), Some("http://x.local"));
        assert!(cli.config.is_empty());
        assert!(matches!(cli.command, Commands::Interactive));
    }
}
