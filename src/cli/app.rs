//! Main CLI application structure

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::{delete, list, switch};
use crate::config::{Config, RepoConfig};
use crate::domain::FilterOptions;
use crate::manager::BranchManager;
use crate::output::{Output, OutputFormat};
use crate::repo::GitCli;

#[derive(Parser)]
#[command(name = "gitt")]
#[command(author, version, about = "Git branch management with filtered batch delete and switch")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show branch statistics, then delete or switch interactively
    Branch,

    /// Delete branches selected by a filter or picked interactively
    Delete {
        #[command(flatten)]
        filter: FilterArgs,

        /// Preview mode (no actual deletion)
        #[arg(long)]
        dry_run: bool,

        /// Force deletion of unmerged branches and skip confirmation
        #[arg(long)]
        force: bool,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Switch to another branch
    Switch {
        /// Branch to check out (pick interactively when omitted)
        name: Option<String>,
    },

    /// List branches
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// List every local branch, ignoring filters and protection
        #[arg(long, conflicts_with = "remote")]
        all: bool,

        /// List remote-tracking branches
        #[arg(long)]
        remote: bool,
    },

    /// Show branch statistics
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show details of one branch
    Show {
        /// Branch name
        name: String,
    },
}

/// Filter flags shared by delete, list and stats
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Filter branches by keyword
    #[arg(long = "filter", short = 'f', value_name = "KEYWORD")]
    pub keyword: Option<String>,

    /// Filter branches by regex pattern
    #[arg(long, short = 'r', value_name = "PATTERN")]
    pub regex: Option<String>,

    /// Exclude matching branches
    #[arg(long)]
    pub exclude: bool,

    /// Include merged branches
    #[arg(long, conflicts_with = "no_merged")]
    pub include_merged: bool,

    /// Drop branches already merged into the main branch
    #[arg(long)]
    pub no_merged: bool,

    /// Match keyword or regex case-sensitively
    #[arg(long)]
    pub case_sensitive: bool,
}

impl FilterArgs {
    /// Resolves flags against repository defaults
    pub fn to_options(&self, config: &RepoConfig) -> FilterOptions {
        let include_merged = if self.include_merged {
            Some(true)
        } else if self.no_merged {
            Some(false)
        } else {
            None
        };

        FilterOptions {
            keyword: self.keyword.clone(),
            regex: self.regex.clone(),
            exclude: self.exclude,
            include_merged,
            case_sensitive: self.case_sensitive || config.case_sensitive,
        }
    }
}

/// Everything a command needs: the snapshot, configuration and output
pub struct Session {
    pub manager: BranchManager<GitCli>,
    pub config: Config,
    pub output: Output,
}

impl Session {
    /// Opens the repository containing the working directory
    fn open(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let git = GitCli::discover(&cwd)?;
        let config = Config::for_repo(git.root())?;

        let format = cli.format.unwrap_or(config.global.default_format);
        let output = Output::new(format, cli.verbose || config.global.verbose);
        output.verbose_ctx("init", &format!("Repository root: {}", git.root().display()));

        let git = git.with_main_branch(config.repo.main_branch.clone());
        let manager = BranchManager::initialize(git, output)?;

        Ok(Self {
            manager,
            config,
            output,
        })
    }

    pub fn filter_options(&self, filter: &FilterArgs) -> FilterOptions {
        filter.to_options(&self.config.repo)
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut session = Session::open(&cli)?;

    session.output.verbose("gitt starting");

    match cli.command {
        Commands::Branch => delete::branch_menu(&mut session)?,

        Commands::Delete {
            filter,
            dry_run,
            force,
            yes,
        } => delete::run(&mut session, &filter, dry_run, force, yes)?,

        Commands::Switch { name } => switch::run(&mut session, name.as_deref())?,

        Commands::List { filter, all, remote } => {
            if remote {
                list::remote(&session)?
            } else {
                list::local(&session, &filter, all)?
            }
        }

        Commands::Stats { filter } => list::stats(&session, &filter)?,

        Commands::Show { name } => list::show(&session, &name)?,
    }

    session.output.verbose("Command completed successfully");
    Ok(())
}
