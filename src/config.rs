//! Command-line and environment configuration.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::table::{FilterSpec, SortDir, SortKey, SortState, view::DEFAULT_PAGE_SIZE};

/// Browse, filter and summarize the regional development project register
#[derive(Parser, Debug, Clone)]
#[command(name = "devtrack")]
#[command(about = "Browse, filter and summarize the regional development project register")]
pub struct Cli {
    /// SQLite project store
    #[arg(long, env = "DEVTRACK_DB", default_value = "devtrack.db")]
    pub db: PathBuf,

    /// Read projects from a JSON snapshot instead of the SQLite store
    #[arg(long, env = "DEVTRACK_JSON", value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(long, env = "DEVTRACK_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load a JSON snapshot into the SQLite store
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print one page of the project table
    List(ListArgs),
    /// Print dashboard and analytics figures
    Stats {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask the assistant a question
    Ask {
        #[arg(value_name = "QUESTION", required = true, num_args = 1..)]
        question: Vec<String>,

        /// Print only the filter directive as JSON, for `--directive`
        #[arg(long)]
        json: bool,
    },
    /// Print the export summary and mailto link for a filtered view
    Report {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Accept projects tagged with this pillar (repeatable)
    #[arg(long = "pillar", value_name = "PILLAR")]
    pub pillars: Vec<String>,

    /// Accept projects in this state (repeatable)
    #[arg(long = "state", value_name = "STATE")]
    pub states: Vec<String>,

    /// Accept projects in this LGA; must belong to a selected state (repeatable)
    #[arg(long = "lga", value_name = "LGA")]
    pub lgas: Vec<String>,

    /// Accept projects with exactly this status (repeatable)
    #[arg(long = "status", value_name = "STATUS")]
    pub status: Vec<String>,

    /// Start from a serialized filter, e.g. the output of `ask --json`
    #[arg(long, value_name = "JSON")]
    pub directive: Option<String>,
}

impl FilterArgs {
    /// The directive, if any, with each explicitly given field replacing its counterpart.
    pub fn to_spec(&self) -> anyhow::Result<FilterSpec> {
        let mut spec = match &self.directive {
            Some(json) => serde_json::from_str::<Option<FilterSpec>>(json)
                .context("--directive is not a valid filter")?
                .unwrap_or_default(),
            None => FilterSpec::new(),
        };
        if !self.pillars.is_empty() {
            spec = spec.with_pillars(self.pillars.iter().cloned());
        }
        if !self.states.is_empty() {
            spec = spec.with_states(self.states.iter().cloned());
        }
        if !self.lgas.is_empty() {
            spec = spec.with_lgas(self.lgas.iter().cloned());
            let unmatched: Vec<&str> = self
                .lgas
                .iter()
                .filter(|lga| !spec.lgas().contains(*lga))
                .map(String::as_str)
                .collect();
            if !unmatched.is_empty() {
                anyhow::bail!(
                    "--lga {} not in any selected --state",
                    unmatched.join(", ")
                );
            }
        }
        if !self.status.is_empty() {
            spec = spec.with_status(self.status.iter().cloned());
        }
        Ok(spec)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Free-text search over every column
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Column to sort by
    #[arg(long, default_value = "sn", value_parser = parse_sort_key)]
    pub sort: SortKey,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// 1-based page number; out-of-range pages clamp
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

impl ListArgs {
    pub fn sort_state(&self) -> SortState {
        let dir = if self.desc { SortDir::Desc } else { SortDir::Asc };
        SortState::new(self.sort, dir)
    }
}

fn parse_sort_key(name: &str) -> Result<SortKey, String> {
    SortKey::parse(name).ok_or_else(|| {
        let names: Vec<&str> = SortKey::ALL.iter().map(SortKey::name).collect();
        format!("unknown column {name:?}; expected one of {}", names.join(", "))
    })
}
