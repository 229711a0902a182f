use crate::catalog::Category;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration after merging all sources
    Show,

    /// Validate configuration files
    Validate {
        /// Optional path to a specific config file to validate
        file: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "assetctl")]
#[command(about = "Search and install agents, roles, contexts and tasks", long_about = None)]
#[command(version = env!("ASSETCTL_VERSION"))]
#[command(after_help = "\
EXAMPLES:
  assetctl search golang review         Assets matching both terms
  assetctl search --tag testing         Every asset tagged 'testing'
  assetctl install golang/code-review   Install into the global directory
  assetctl install env --local          Install into the project directory
  assetctl list roles                   Installed roles

For details about a specific command, use:
  assetctl <command> --help")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Registry directory (overrides config and ASSETCTL_REGISTRY)
    #[arg(long, global = true, value_name = "DIR")]
    pub registry: Option<PathBuf>,

    /// Catalog index file (overrides config and ASSETCTL_INDEX)
    #[arg(long, global = true, value_name = "FILE")]
    pub index: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog by name, description and tags
    #[command(long_about = "Search the catalog by name, description and tags.\n\n\
        Terms are case-insensitive regular expressions and all of them must\n\
        match. A name match weighs 3, a description or tag match weighs 1.\n\
        --tag narrows results to assets carrying any of the given tags.")]
    Search(SearchCmd),

    /// Install an asset from the registry
    Install(InstallCmd),

    /// List installed assets
    List(ListCmd),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search terms (regular expressions, separated by spaces or commas)
    pub terms: Vec<String>,

    /// Only show assets with this tag (repeatable, any tag matches)
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Search installed assets instead of the registry catalog
    #[arg(long)]
    pub installed: bool,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InstallCmd {
    /// Asset name as shown by search
    pub name: String,

    /// Category, required when the name exists in several categories
    #[arg(short = 'c', long, value_parser = parse_category)]
    pub category: Option<Category>,

    /// Install into the project directory instead of the global one
    #[arg(short = 'l', long)]
    pub local: bool,
}

#[derive(Args, Debug)]
pub struct ListCmd {
    /// Only list this category
    #[arg(value_parser = parse_category)]
    pub category: Option<Category>,

    /// Only list project-local assets
    #[arg(short = 'l', long)]
    pub local: bool,
}

fn parse_category(s: &str) -> std::result::Result<Category, String> {
    s.parse::<Category>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from([
            "assetctl", "search", "golang", "review", "--tag", "testing", "-n", "5", "--json",
        ]);
        match cli.command {
            Commands::Search(cmd) => {
                assert_eq!(cmd.terms, vec!["golang", "review"]);
                assert_eq!(cmd.tags, vec!["testing"]);
                assert_eq!(cmd.limit, Some(5));
                assert!(cmd.json);
                assert!(!cmd.installed);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_install_category() {
        let cli = Cli::parse_from(["assetctl", "install", "env", "--category", "contexts", "--local"]);
        match cli.command {
            Commands::Install(cmd) => {
                assert_eq!(cmd.category, Some(Category::Context));
                assert!(cmd.local);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["assetctl", "list", "widgets"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["assetctl", "list", "-v", "--registry", "/srv/reg"]);
        assert!(cli.verbose);
        assert_eq!(cli.registry, Some(PathBuf::from("/srv/reg")));
    }
}
