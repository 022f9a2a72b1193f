use clap::Parser;
use cqcfg::commands::generate::{handle_generate, Outcome};
use cqcfg::revision::GitRevisionCounter;
use cqcfg::{GlobalOpts, RunContext};
use cqcfg_logger as logger;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "cqcfg")]
#[command(disable_version_flag = true)]
#[command(
    about = "Generate app.json for a CoolQ Go plugin",
    long_about = "cqcfg scans the Go sources of a CoolQ plugin and writes the app.json manifest \
                  describing its metadata, event handlers and required permissions."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    /// Add the repository's commit count to the version sequence number
    #[arg(short = 'c', long)]
    count_commits: bool,

    /// Print the cqcfg version and exit
    #[arg(short = 'v', long)]
    version: bool,

    /// Directory to write app.json into (default: current directory)
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Fail if app.json is missing or out of date instead of writing it
    #[arg(long)]
    check: bool,

    /// Go package directory to scan
    #[arg(required_unless_present = "version")]
    dir: Option<PathBuf>,
}

fn init_tracing(global: &GlobalOpts) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logger::verbosity_to_filter()));
    let registry = tracing_subscriber::registry().with(filter);
    let result = if global.log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    if let Err(e) = result {
        logger::warn(&format!("Failed to initialize tracing: {}", e));
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("cqcfg {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.quiet) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing(&cli.global);

    let Some(dir) = cli.dir else {
        logger::error("missing directory argument");
        std::process::exit(2);
    };

    let ctx = match RunContext::load(&dir, cli.output.as_deref(), cli.count_commits, cli.check)
    {
        Ok(ctx) => ctx,
        Err(e) => {
            logger::error(&e.to_string());
            if !cli.global.quiet {
                logger::show_log_path();
            }
            std::process::exit(1);
        }
    };

    let counter = GitRevisionCounter::new(&ctx.config);
    match handle_generate(&ctx, &counter) {
        Ok(Outcome::Written(path)) => {
            if !cli.global.quiet {
                logger::success(&format!("Wrote {}", path.display()));
            }
        }
        Ok(Outcome::Current(path)) => {
            if !cli.global.quiet {
                logger::success(&format!("{} is up to date", path.display()));
            }
        }
        Err(e) => {
            logger::error(&e.to_string());
            if !cli.global.quiet {
                logger::show_log_path();
            }
            std::process::exit(1);
        }
    }
}
