use crate::cli::{Context, args::BrowseArgs, input, output};
use babel_books::{BookImage, BrowseSource, Request};

pub fn handle(args: BrowseArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let source = if let Some(id) = args.id {
        BrowseSource::BookId { book_id: id }
    } else if let Some(path) = &args.id_file {
        BrowseSource::BookId {
            book_id: input::read_text(Some(path.as_path()))?,
        }
    } else if let Some(path) = &args.image {
        BrowseSource::BookImage {
            book_image_data: input::read_bytes(Some(path.as_path()))?,
        }
    } else if let Some(path) = &args.image_hex {
        let text = input::read_text(Some(path.as_path()))?;
        BrowseSource::BookImage {
            book_image_data: BookImage::from_hex(&text)?.into_data(),
        }
    } else {
        return Err("Specify --id, --id-file, --image or --image-hex".into());
    };

    let response = ctx.worker().handle(Request::Browse(source));
    output::print_response(&response, ctx)
}
