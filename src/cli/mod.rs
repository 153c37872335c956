mod args;
mod global;
mod handlers;
mod input;
mod output;

use args::Commands;
use babel_books::{Library, OutputFormat, Settings, Worker};
use clap::Parser;
use global::GlobalArgs;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "babel-books")]
#[command(version)]
#[command(about = "Browse, search and locate books in the Library of Babel", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Everything a command handler needs besides its own arguments.
pub struct Context {
    pub settings: Settings,
    pub format: OutputFormat,
    pub page_headers: bool,
    pub quiet: bool,
    seed: Option<u64>,
    library: Arc<Library>,
}

impl Context {
    fn new(settings: Settings, global: &GlobalArgs) -> Self {
        Context {
            format: global.format.unwrap_or(settings.output.format),
            page_headers: settings.output.page_headers && !global.no_headers,
            quiet: global.quiet,
            seed: global.seed,
            library: Arc::new(Library::new()),
            settings,
        }
    }

    /// A worker over the shared library, seeded when `--seed` was given.
    pub fn worker(&self) -> Worker {
        match self.seed {
            Some(seed) => Worker::with_seed(Arc::clone(&self.library), seed),
            None => Worker::new(Arc::clone(&self.library)),
        }
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose, cli.global.quiet);

    let settings = Settings::load_with_overrides()?;
    let ctx = Context::new(settings, &cli.global);

    match cli.command {
        Commands::Browse(args) => handlers::browse::handle(args, &ctx),
        Commands::Search(args) => handlers::search::handle(args, &ctx),
        Commands::Random(args) => handlers::random::handle(args, &ctx),
        Commands::Metadata(args) => handlers::metadata::handle(args, &ctx),
        Commands::Serve(args) => handlers::serve::handle(args, &ctx),
        Commands::Config => handlers::config::handle(&ctx),
    }
}

/// Logs go to stderr. `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
