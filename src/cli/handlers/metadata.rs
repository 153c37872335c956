use crate::cli::{Context, args::MetadataArgs, input, output};
use babel_books::{Book, BookImage, OutputFormat, Page, Request};
use std::fs;

pub fn handle(args: MetadataArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let content = input::read_text(args.file.as_deref())?;
    let book = if args.text {
        book_from_text(&content)
    } else {
        book_from_json(&content)?
    };

    let response = ctx.worker().handle(Request::GetBookMetadata { book });
    if ctx.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    if let Some(error) = response.error {
        return Err(error.into());
    }
    let metadata = response
        .book_metadata
        .ok_or("Worker returned no metadata")?;

    if let Some(path) = &args.image_out {
        fs::write(path, &metadata.book_image_data)?;
        output::note(ctx, &format!("Wrote book image to {}", path.display()));
    }

    if ctx.format == OutputFormat::Text {
        let image = BookImage::from_data(metadata.book_image_data);
        let (width, height) = image.dimensions();
        println!("{}", metadata.book_id);
        if args.hex {
            println!("{}", image.to_hex());
        }
        output::note(ctx, &format!("Location: {}", metadata.location));
        output::note(
            ctx,
            &format!(
                "Image: {} bytes, {} pixels ({}x{})",
                image.data().len(),
                image.pixel_count(),
                width,
                height
            ),
        );
    }
    Ok(())
}

/// Accepts a worker response holding a `book`, or a bare book.
fn book_from_json(content: &str) -> Result<Book, Box<dyn std::error::Error>> {
    let mut value: serde_json::Value = serde_json::from_str(content)?;
    if let Some(book) = value.get_mut("book") {
        return Ok(serde_json::from_value(book.take())?);
    }
    Ok(serde_json::from_value(value)?)
}

/// Page text as printed by `browse`; line breaks and page headers are dropped.
fn book_from_text(content: &str) -> Book {
    let lines = content
        .lines()
        .filter(|line| !line.starts_with(output::PAGE_HEADER_PREFIX))
        .map(str::to_string)
        .collect();
    Book::from_pages(vec![Page { lines }])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_from_response_json() {
        let book = book_from_json(r#"{"operation":"search","book":{"pages":[["ab","c"]]}}"#).unwrap();
        assert_eq!(book.pages[0].lines, vec!["ab", "c"]);
    }

    #[test]
    fn test_book_from_bare_json() {
        let book = book_from_json(r#"{"pages":[["xyz"]],"selection":{"start":0,"end":2}}"#).unwrap();
        assert_eq!(book.pages[0].lines, vec!["xyz"]);
        assert_eq!(book.selection.unwrap().end, Some(2));
    }

    #[test]
    fn test_book_from_text_skips_headers() {
        let book = book_from_text("--- page 1 ---\nhello\nworld\n--- page 2 ---\nagain\n");
        assert_eq!(book.pages.len(), 1);
        assert_eq!(book.pages[0].lines, vec!["hello", "world", "again"]);
    }
}
