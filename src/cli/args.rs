use clap::{ArgGroup, Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a book by its ID or image
    Browse(BrowseArgs),
    /// Find the book that contains some text
    Search(SearchArgs),
    /// Open a book of random text
    Random(RandomArgs),
    /// Show the ID, image and location of a book
    Metadata(MetadataArgs),
    /// Answer JSON requests line by line on stdin/stdout
    Serve(ServeArgs),
    /// Print the effective settings
    Config,
}

/// Arguments for browsing a book
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true)))]
pub struct BrowseArgs {
    /// Book ID (base-94 printable ASCII)
    #[arg(long, group = "source")]
    pub id: Option<String>,

    /// Read the book ID from a file ("-" for stdin)
    #[arg(long, value_name = "FILE", group = "source")]
    pub id_file: Option<PathBuf>,

    /// Read raw book image bytes from a file ("-" for stdin)
    #[arg(long, value_name = "FILE", group = "source")]
    pub image: Option<PathBuf>,

    /// Read the book image as hex, as printed by `metadata --hex` ("-" for stdin)
    #[arg(long, value_name = "FILE", group = "source")]
    pub image_hex: Option<PathBuf>,
}

/// Arguments for searching
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to find (reads stdin if not provided)
    pub text: Option<String>,

    /// Pages of random text around the result; 0 for the bare text
    #[arg(short = 'p', long)]
    pub pages: Option<usize>,
}

/// Arguments for random books
#[derive(Args, Debug)]
pub struct RandomArgs {
    /// Number of pages
    #[arg(short = 'p', long)]
    pub pages: Option<usize>,
}

/// Arguments for book metadata
#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Book as JSON, or plain text with --text (reads stdin if not provided)
    pub file: Option<PathBuf>,

    /// Input is page text rather than JSON; line breaks are ignored
    #[arg(long)]
    pub text: bool,

    /// Write the book image bytes to this file
    #[arg(long, value_name = "FILE")]
    pub image_out: Option<PathBuf>,

    /// Also print the book image as hex, one group per pixel
    #[arg(long)]
    pub hex: bool,
}

/// Arguments for the request loop
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Compute the last book index before taking requests
    #[arg(long)]
    pub preload: bool,
}
