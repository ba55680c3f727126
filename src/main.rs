use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use since::changelog::{self, SplitMode};
use since::cli::{self, WorkflowArgs};
use since::config;
use since::domain::TagOrdering;
use since::git::Git2Repository;
use since::history::BoundaryPolicy;
use since::ui;

#[derive(Parser)]
#[command(
    name = "since",
    version,
    about = "Derive the next semantic version and changelog from conventional commits since the last tag"
)]
struct Cli {
    #[arg(long, global = true, default_value = "warn", help = "Log level when RUST_LOG is unset")]
    log_level: String,

    #[arg(short, long, global = true, help = "Turn logging off")]
    quiet: bool,

    #[arg(long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Commands related to changelog files
    Changelog {
        #[arg(short, long, default_value = "CHANGELOG.md", help = "Path to changelog file")]
        changelog: String,

        #[arg(long, help = "Path to output file (otherwise stdout)")]
        output_file: Option<PathBuf>,

        #[command(flatten)]
        history: HistoryArgs,

        #[command(subcommand)]
        action: ChangelogAction,
    },
    /// Commands related to versions and releases
    Project {
        #[command(flatten)]
        history: HistoryArgs,

        #[command(subcommand)]
        action: ProjectAction,
    },
}

#[derive(Subcommand)]
enum ChangelogAction {
    /// Print the changelog with the next release added
    Generate,
    /// Write the changelog with the next release added
    Update,
    /// Print a new changelog covering the whole history
    Init,
    /// Print the changes for one version
    Extract {
        #[arg(short = 'v', long, help = "Version to extract (default: the most recent)")]
        version: Option<String>,

        #[arg(long, help = "Include the version heading")]
        header: bool,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// Print the next version based on changes since the last tag
    Version {
        #[arg(short, long, help = "Just print the current version")]
        current: bool,
    },
    /// List the changes since the last release
    Changes,
    /// Update the changelog, commit it and tag the release
    Release {
        #[arg(short, long, default_value = "CHANGELOG.md", help = "Path to changelog file")]
        changelog: String,
    },
}

#[derive(Args, Clone)]
struct HistoryArgs {
    #[arg(short = 'g', long = "git-repo", default_value = ".", help = "Path to git repository")]
    repo: PathBuf,

    #[arg(
        short,
        long,
        default_value = "semver",
        help = "How to determine the latest tag (alphabetical|commit-date|semver)"
    )]
    order_by: TagOrdering,

    #[arg(short = 't', long = "tag", visible_alias = "after-tag", help = "Include commits after this tag")]
    after_tag: Option<String>,

    #[arg(long, help = "Include commits up to this tag (default: HEAD)")]
    before_tag: Option<String>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, help = "De-duplicate commit messages")]
    unique: bool,

    #[arg(long, help = "Also include the commit of the start tag")]
    include_start: bool,

    #[arg(long, help = "Fail when the changelog has no release heading")]
    strict: bool,
}

impl HistoryArgs {
    fn workflow(&self) -> WorkflowArgs {
        WorkflowArgs {
            repo_path: self.repo.clone(),
            order_by: self.order_by,
            before_tag: self.before_tag.clone(),
            after_tag: self.after_tag.clone(),
            unique: self.unique,
            boundary: if self.include_start {
                BoundaryPolicy::Include
            } else {
                BoundaryPolicy::Exclude
            },
            split_mode: if self.strict {
                SplitMode::Strict
            } else {
                SplitMode::Lenient
            },
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args)?;

    if let Err(err) = run(args) {
        ui::display_error(&err.to_string());
        std::process::exit(err.exit_code());
    }
    Ok(())
}

/// Logs go to stderr: `--quiet` turns them off, then `RUST_LOG`, then `--log-level`
fn init_tracing(args: &Cli) -> Result<()> {
    let filter = if args.quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))
}

fn run(args: Cli) -> since::Result<()> {
    match args.command {
        Command::Changelog {
            changelog: file_name,
            output_file,
            history,
            action,
        } => {
            let workflow = history.workflow();
            let changelog_file = changelog::resolve_changelog_file(&workflow.repo_path, &file_name);
            let output_file = output_file.as_deref();

            match action {
                ChangelogAction::Generate | ChangelogAction::Update => {
                    let repo = Git2Repository::open(&workflow.repo_path)?;
                    let config = config::load_config(args.config.as_deref(), &workflow.repo_path)?;
                    let existing = changelog::read_lines(&changelog_file)?;

                    let updated =
                        cli::updated_changelog(&repo, &workflow, &config, &existing, Utc::now())?;
                    updated.warnings.iter().for_each(ui::display_boundary_warning);

                    if matches!(action, ChangelogAction::Update) {
                        changelog::write_changelog(&changelog_file, &updated.changelog)?;
                        ui::display_success(&format!(
                            "Updated {} for version {}",
                            changelog_file.display(),
                            updated.metadata.new_version
                        ));
                    } else {
                        ui::write_output(&updated.changelog, output_file)?;
                    }
                }
                ChangelogAction::Init => {
                    let repo = Git2Repository::open(&workflow.repo_path)?;
                    let config = config::load_config(args.config.as_deref(), &workflow.repo_path)?;

                    let initial = cli::init_changelog(&repo, &workflow, &config, Utc::now())?;
                    ui::write_output(&initial, output_file)?;
                }
                ChangelogAction::Extract { version, header } => {
                    let lines = changelog::read_lines(&changelog_file)?;
                    let changes = changelog::read_changes(&lines, version.as_deref(), header)?;
                    ui::write_output(&changes.join("\n"), output_file)?;
                }
            }
        }
        Command::Project { history, action } => {
            let workflow = history.workflow();
            let repo = Git2Repository::open(&workflow.repo_path)?;
            let config = config::load_config(args.config.as_deref(), &workflow.repo_path)?;

            match action {
                ProjectAction::Version { current } => {
                    let (version, warnings) =
                        cli::project_version(&repo, &workflow, &config, current)?;
                    warnings.iter().for_each(ui::display_boundary_warning);
                    ui::write_output(&version, None)?;
                }
                ProjectAction::Changes => {
                    let (changes, warnings) = cli::list_changes(&repo, &workflow, &config)?;
                    warnings.iter().for_each(ui::display_boundary_warning);
                    ui::write_output(&changes, None)?;
                }
                ProjectAction::Release {
                    changelog: file_name,
                } => {
                    let changelog_file =
                        changelog::resolve_changelog_file(&workflow.repo_path, &file_name);
                    ui::display_status(&format!(
                        "Releasing from {}",
                        workflow.repo_path.display()
                    ));

                    let metadata =
                        cli::release(&repo, &workflow, &config, &changelog_file, Utc::now())?;
                    ui::display_success(&ui::format_release(&metadata));
                }
            }
        }
    }

    Ok(())
}
