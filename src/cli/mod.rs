//! CLI module - Command-line interface for flowhub
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::collection::SortOrder;
use crate::domain::Provider;

/// flowhub - Self-hosted catalog for automation workflows
#[derive(Parser)]
#[command(name = "flowhub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client settings file (defaults to the user config dir)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web API server
    #[command(alias = "web", alias = "daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create a user account
    Register {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Save an API key for a provider
    SetKey {
        #[arg(value_enum)]
        provider: ProviderArg,
        key: String,
        #[arg(long, short)]
        user: String,
    },

    /// Upload a workflow file
    #[command(alias = "add", alias = "a")]
    Ingest {
        file: PathBuf,
        #[arg(long, short)]
        user: String,
        /// Enrich with this provider instead of the saved preference
        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,
        /// Output language code (en, tr)
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },

    /// List workflows
    #[command(alias = "ls", alias = "l")]
    List {
        #[arg(long, short)]
        user: String,
        #[arg(long, short)]
        search: Option<String>,
        /// Only workflows carrying this tag
        #[arg(long, short)]
        tag: Option<String>,
        #[arg(long, value_enum, default_value = "newest")]
        sort: SortArg,
        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Toggle a workflow as favorite
    #[command(alias = "fav")]
    Favorite { id: i32 },

    /// Delete a workflow
    #[command(alias = "rm", alias = "r")]
    Delete {
        id: i32,
        #[arg(long, short)]
        user: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProviderArg {
    Openai,
    Anthropic,
    Gemini,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Openai => Self::OpenAi,
            ProviderArg::Anthropic => Self::Anthropic,
            ProviderArg::Gemini => Self::Gemini,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => Self::Newest,
            SortArg::Oldest => Self::Oldest,
            SortArg::TitleAsc => Self::TitleAsc,
            SortArg::TitleDesc => Self::TitleDesc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_flags() {
        let cli = Cli::try_parse_from([
            "flowhub", "ls", "-u", "ana", "--sort", "title-desc", "--tag", "crm",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::List {
                user, sort, tag, favorites, ..
            }) => {
                assert_eq!(user, "ana");
                assert_eq!(SortOrder::from(sort), SortOrder::TitleDesc);
                assert_eq!(tag.as_deref(), Some("crm"));
                assert!(!favorites);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn parses_ingest_provider() {
        let cli = Cli::try_parse_from([
            "flowhub", "ingest", "flow.json", "--user", "ana", "--provider", "gemini",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Ingest { provider, .. }) => {
                assert_eq!(provider.map(Provider::from), Some(Provider::Gemini));
            }
            _ => panic!("expected ingest command"),
        }
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(
            Cli::try_parse_from(["flowhub", "set-key", "cohere", "k", "-u", "ana"]).is_err()
        );
    }
}
