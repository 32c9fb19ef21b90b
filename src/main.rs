use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use semrel::git::{Git2Repository, Repository};
use semrel::{config, ui, Decision, LevelBump, ReleaseError};

#[derive(clap::Parser)]
#[command(
    name = "semrel",
    version,
    about = "Compute the next semantic version from commit history"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Branch policy to apply instead of the checked-out branch")]
    branch: Option<String>,

    #[arg(long, default_value = ".", help = "Path inside the repository")]
    repo: String,

    #[arg(long, help = "Abort on commits the grammar cannot classify")]
    strict: bool,

    #[arg(long, help = "Produce a prerelease even on a release branch")]
    as_prerelease: bool,

    #[arg(long, help = "Build metadata appended to the version")]
    build_metadata: Option<String>,

    #[arg(long, group = "force", help = "Force a major bump")]
    major: bool,

    #[arg(long, group = "force", help = "Force a minor bump")]
    minor: bool,

    #[arg(long, group = "force", help = "Force a patch bump")]
    patch: bool,

    #[arg(long, group = "force", help = "Force a prerelease revision bump")]
    prerelease: bool,

    #[arg(long, help = "Print only the tag instead of the version")]
    print_tag: bool,

    #[arg(short, long, help = "Show the commit analysis")]
    verbose: bool,
}

impl Args {
    fn forced_level(&self) -> Option<LevelBump> {
        if self.major {
            Some(LevelBump::Major)
        } else if self.minor {
            Some(LevelBump::Minor)
        } else if self.patch {
            Some(LevelBump::Patch)
        } else if self.prerelease {
            Some(LevelBump::PrereleaseRevision)
        } else {
            None
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    if let Err(e) = run(Args::parse()) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let repo = Git2Repository::discover(&args.repo)
        .with_context(|| format!("Cannot open repository at '{}'", args.repo))?;

    let branch_name = match &args.branch {
        Some(branch) => branch.clone(),
        None => repo.current_branch()?,
    };
    let branch = match config.branch(&branch_name) {
        Ok(branch) => branch,
        Err(e @ ReleaseError::NotAReleaseBranch(_)) if !(config.strict || args.strict) => {
            ui::display_status(&e.to_string());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    debug!(branch = %branch_name, group = %branch.name, "branch policy selected");

    let mut policy = config.policy();
    policy.strict |= args.strict;
    policy.as_prerelease = args.as_prerelease;
    policy.forced_level = args.forced_level();
    policy.build_metadata = args.build_metadata.clone();

    let analyzer = config.analyzer(policy)?;
    let history = repo.history(config.needs_paths())?;
    let outcome = analyzer.next_version(&history, &branch)?;

    if args.verbose {
        ui::display_decision(&outcome, &branch_name);
    }

    match &outcome.decision {
        Decision::Release { version, .. } if args.print_tag => {
            println!("{}", version.as_tag());
            for partial in analyzer.translator().partial_tags(version) {
                println!("{}", partial);
            }
        }
        Decision::Release { version, .. } => println!("{}", version),
        Decision::NoReleaseDue if !args.verbose => ui::display_status("No release due"),
        Decision::NoReleaseDue => {}
    }

    Ok(())
}
