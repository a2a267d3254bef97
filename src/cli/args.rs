//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Group hierarchy trees with package counts and highlighted sections
#[derive(Parser, Debug)]
#[command(name = "grouptree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Catalog file with groups and packages
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    /// Current user name (admin if listed in `sysadmins`)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Treat the current user as sysadmin
    #[arg(long, global = true)]
    pub admin: bool,

    /// Print JSON instead of a tree
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the full group forest
    Tree {
        /// Group type filter
        #[arg(short = 't', long = "type")]
        group_type: Option<String>,
        /// Top groups by id or name (default: all parentless groups of the type)
        top: Vec<String>,
    },

    /// Show the branch containing a group, with that group highlighted
    Section {
        /// Group id or name
        id: String,
        /// Group type filter
        #[arg(short = 't', long = "type")]
        group_type: Option<String>,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
