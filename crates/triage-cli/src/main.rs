//! triage - Triage GitHub issues from the terminal
//!
//! List, search, take and comment on the issues of the repository in the
//! current directory.

use anyhow::{Context as _, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use triage_core::{
    Config, Error, FilterKind, FilterSpec, GithubClient, Issue, IssueState, RepoId, remote,
};

mod commands;
mod display;
mod view;

use commands::Context;

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Triage GitHub issues from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Issue number to show, comment on or vote for
    number: Option<u64>,

    /// Add a comment to the issue
    #[arg(long, requires = "number")]
    comment: Option<String>,

    /// Add a +1 to the issue
    #[arg(long, requires = "number", conflicts_with = "comment")]
    vote: bool,

    /// Server-side assignee filter: a login, `none` or `*`
    #[arg(long)]
    assigned: Option<String>,

    /// Issue state to list
    #[arg(long, value_enum, default_value_t = StateArg::Open)]
    state: StateArg,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Config file
    #[arg(long, global = true, env = "TRIAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Repository as owner/name (defaults to the origin remote)
    #[arg(long, global = true)]
    repo: Option<String>,

    /// API token, overriding the stored one
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register or show credentials
    Auth {
        /// Token to store
        #[arg(long)]
        add: Option<String>,

        /// User name to store
        #[arg(long)]
        user: Option<String>,
    },

    #[command(flatten)]
    Tracker(TrackerCommand),
}

/// Commands that talk to the tracker
#[derive(Subcommand)]
enum TrackerCommand {
    /// Search issues
    Search {
        /// Search term
        term: String,

        /// Issue state (default: open)
        #[arg(long, value_enum)]
        state: Option<StateArg>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Issues commented on by this user
        #[arg(long)]
        commenter: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Assign an issue to yourself
    Take {
        /// Issue number
        number: u64,

        /// Take the issue even if someone else has it
        #[arg(long)]
        overwrite: bool,
    },

    /// Age of the least recently updated open issue
    Alru,

    /// Show repository information
    Info,
}

#[derive(Args)]
struct FilterArgs {
    /// Issues created by this user
    #[arg(long)]
    author: Option<String>,

    /// Issues assigned to this user (`none` for unassigned)
    #[arg(long)]
    assignee: Option<String>,

    /// Issues mentioning this user
    #[arg(long)]
    mentions: Option<String>,

    /// Issues created by, assigned to or mentioning this user
    #[arg(long)]
    involves: Option<String>,

    /// Comma separated labels, `!label` to exclude
    #[arg(long)]
    labels: Option<String>,
}

impl FilterArgs {
    fn to_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::default();
        spec.set_opt(FilterKind::Author, self.author.clone());
        spec.set_opt(FilterKind::Assignee, self.assignee.clone());
        spec.set_opt(FilterKind::Mentions, self.mentions.clone());
        spec.set_opt(FilterKind::Involves, self.involves.clone());
        spec.set_opt(FilterKind::Labels, self.labels.clone());
        spec
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Don't truncate titles
    #[arg(long)]
    no_trunc: bool,

    /// Full-screen view
    #[arg(long)]
    screen: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StateArg {
    Open,
    Closed,
}

impl From<StateArg> for IssueState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Open => IssueState::Open,
            StateArg::Closed => IssueState::Closed,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Stored config, with `--token` taking precedence
fn load_config(path: &Path, token: Option<&str>) -> Result<Config> {
    let mut config = match Config::load(path) {
        Ok(config) => config,
        Err(Error::ConfigNotFound(_)) if token.is_some() => Config::default(),
        Err(Error::ConfigNotFound(_)) => {
            bail!("No token registered. Run `triage auth --add <token>` first.")
        }
        Err(e) => return Err(e.into()),
    };
    if let Some(token) = token {
        config.token = token.to_string();
    }
    if !config.has_token() {
        bail!("No token registered. Run `triage auth --add <token>` first.");
    }
    Ok(config)
}

fn present(
    ctx: &Context<'_>,
    issues: &[Issue],
    output: &OutputArgs,
    out: &mut dyn Write,
) -> Result<()> {
    if output.screen || ctx.display.screen {
        view::run(&ctx.repo.full_name(), issues, output.no_trunc)
    } else {
        display::print_issues(out, issues, output.no_trunc, ctx.display.max_title_length)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let command = match cli.command {
        Some(Commands::Auth { add, user }) => {
            return commands::auth(&config_path, add.as_deref(), user.as_deref(), &mut out);
        }
        Some(Commands::Tracker(command)) => Some(command),
        None => None,
    };

    let config = load_config(&config_path, cli.token.as_deref())?;
    if !config.display.colors {
        colored::control::set_override(false);
    }

    let repo: RepoId = match &cli.repo {
        Some(repo) => repo.parse()?,
        None => remote::origin_repo().context("Error resolving repository")?,
    };
    let client = GithubClient::new(&config.api_url, &config.token, repo.clone())?;
    let ctx = Context {
        tracker: &client,
        repo,
        display: config.display,
    };

    match command {
        Some(TrackerCommand::Search {
            term,
            state,
            filters,
            commenter,
            output,
        }) => {
            let mut spec = filters.to_spec();
            spec.set_opt(FilterKind::Commenter, commenter);
            if let Some(state) = state {
                spec.set(FilterKind::State, IssueState::from(state).to_string());
            }
            let issues = commands::search(&ctx, &term, &spec)?;
            present(&ctx, &issues, &output, &mut out)
        }
        Some(TrackerCommand::Take { number, overwrite }) => {
            commands::take(&ctx, number, overwrite, &mut out)
        }
        Some(TrackerCommand::Alru) => commands::alru(&ctx, &mut out),
        Some(TrackerCommand::Info) => commands::info(&ctx, &mut out),
        None => match cli.number {
            Some(number) => {
                if let Some(body) = cli.comment.as_deref() {
                    commands::comment(&ctx, number, body, &mut out)
                } else if cli.vote {
                    commands::vote(&ctx, number, &mut out)
                } else {
                    commands::show(&ctx, number, &mut out)
                }
            }
            None => {
                let issues = commands::list(
                    &ctx,
                    cli.state.into(),
                    cli.assigned.as_deref(),
                    &cli.filters.to_spec(),
                )
                .context("Error getting issues")?;
                present(&ctx, &issues, &cli.output, &mut out)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommand_beats_number() {
        let cli = Cli::try_parse_from(["triage", "take", "42", "--overwrite"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Tracker(TrackerCommand::Take {
                number: 42,
                overwrite: true
            }))
        ));
    }

    #[test]
    fn test_auth_parses_outside_tracker_commands() {
        let cli = Cli::try_parse_from(["triage", "auth", "--add", "t0ken"]).unwrap();
        match cli.command {
            Some(Commands::Auth { add, user }) => {
                assert_eq!(add.as_deref(), Some("t0ken"));
                assert_eq!(user, None);
            }
            _ => panic!("expected the auth command"),
        }
    }

    #[test]
    fn test_listing_flags_build_filters() {
        let cli =
            Cli::try_parse_from(["triage", "--assignee", "bob", "--labels", "bug", "--author", ""])
                .unwrap();
        assert!(cli.number.is_none());
        let spec = cli.filters.to_spec();
        assert_eq!(spec.get(FilterKind::Assignee), Some("bob"));
        assert_eq!(spec.get(FilterKind::Labels), Some("bug"));
        assert_eq!(spec.get(FilterKind::Author), None);
    }

    #[test]
    fn test_comment_requires_number() {
        assert!(Cli::try_parse_from(["triage", "--comment", "hi"]).is_err());
        let cli = Cli::try_parse_from(["triage", "7", "--comment", "hi"]).unwrap();
        assert_eq!(cli.number, Some(7));
        assert_eq!(cli.comment.as_deref(), Some("hi"));
    }

    #[test]
    fn test_load_config_token_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(load_config(&path, None).is_err());
        assert_eq!(load_config(&path, Some("t")).unwrap().token, "t");
    }
}
