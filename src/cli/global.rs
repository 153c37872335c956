use babel_books::OutputFormat;
use clap::{ArgAction, Args};

/// Global arguments that apply to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Output format (overrides the settings file)
    #[arg(short = 'f', long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress informational notices
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Seed for search padding and random books
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Omit page headers in text output
    #[arg(long, global = true)]
    pub no_headers: bool,
}
