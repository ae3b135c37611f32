use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use git_autotag::cli::{run_release_workflow, ReleaseWorkflowArgs};
use git_autotag::config;
use git_autotag::git::Git2Repository;
use git_autotag::{logging, ui};

#[derive(clap::Parser)]
#[command(
    name = "git-autotag",
    version,
    about = "Derive the next semantic version from conventional commits and tag it"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        default_value = ".",
        help = "Path inside the repository to tag"
    )]
    path: PathBuf,

    #[arg(long, help = "Tag naming pattern, e.g. \"v{version}\"")]
    tag_pattern: Option<String>,

    #[arg(short, long, help = "Push the new tag to the remote")]
    push: bool,

    #[arg(short, long, help = "Remote to push to")]
    remote: Option<String>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config =
        config::load_config(args.config.as_deref()).context("Error loading config")?;
    if let Some(pattern) = args.tag_pattern {
        config.tag_pattern = pattern;
    }

    let repo = Git2Repository::open(&args.path)
        .with_context(|| format!("Git repository error at {}", args.path.display()))?;

    let workflow_args = ReleaseWorkflowArgs {
        dry_run: args.dry_run,
        push: args.push,
        remote: args.remote,
    };
    let result = run_release_workflow(&repo, &config, &workflow_args)?;

    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }

    let Some(tag) = result.tag else {
        ui::display_status(&format!("No release needed; version stays {}", result.version));
        return Ok(());
    };

    ui::display_derivation(&result.applied, result.commit_count);
    ui::display_proposed_tag(result.previous_tag.as_deref(), &tag);

    if args.dry_run {
        ui::display_status(&format!("Dry run: would create tag {}", tag));
    } else if result.created {
        ui::display_success(&format!("Created tag: {}", tag));
    }

    if result.pushed {
        ui::display_success(&format!("Pushed tag: {} to remote", tag));
    } else if result.created {
        let remote = workflow_args.remote.as_deref().unwrap_or(&config.remote.name);
        ui::display_manual_push_instruction(&tag, remote);
    }

    println!("{}", tag);
    Ok(())
}
