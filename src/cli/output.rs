use babel_books::{Book, OutputFormat, Position, Response};
use std::io::{self, Write};

use crate::cli::Context;

/// Header printed above each page in text output; skipped when reading text back.
pub const PAGE_HEADER_PREFIX: &str = "--- page ";

/// Prints a worker response in the selected format.
///
/// An `error` response or `invalidData` becomes an `Err` so the process
/// exits non-zero; in JSON mode the response is still printed first.
pub fn print_response(response: &Response, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    if ctx.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(response)?);
    }
    if let Some(error) = &response.error {
        return Err(error.clone().into());
    }
    if response.invalid_data {
        return Err("Input does not name any book".into());
    }
    if ctx.format == OutputFormat::Json {
        return Ok(());
    }

    if response.data_truncated {
        note(ctx, "Note: input was truncated to fit one book");
    }
    if let Some(book) = &response.book {
        print_book(book, ctx.page_headers)?;
        if let Some(selection) = book.selection {
            let start = Position::of(selection.start);
            match selection.end {
                Some(end) => note(ctx, &format!("Text found from {} to {}", start, Position::of(end))),
                None => note(ctx, &format!("Text found at {}", start)),
            }
        }
    }
    if let Some(book_id) = &response.book_id {
        note(ctx, &format!("Book ID: {}", book_id));
    }
    Ok(())
}

pub fn print_book(book: &Book, headers: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    for (number, page) in book.pages.iter().enumerate() {
        if headers {
            writeln!(out, "{}{} ---", PAGE_HEADER_PREFIX, number + 1)?;
        }
        for line in &page.lines {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()
}

/// Informational message on stderr, silenced by `--quiet`.
pub fn note(ctx: &Context, message: &str) {
    if !ctx.quiet {
        eprintln!("{}", message);
    }
}
