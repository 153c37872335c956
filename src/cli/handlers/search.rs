use crate::cli::{Context, args::SearchArgs, input, output};
use babel_books::{PageOptions, Request};

pub fn handle(args: SearchArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let search_text = match args.text {
        Some(text) => text,
        None => input::read_text(None)?,
    };
    let number_of_pages = args.pages.unwrap_or(ctx.settings.search.pages);

    let response = ctx.worker().handle(Request::Search {
        search_text,
        search_options: PageOptions { number_of_pages },
    });
    output::print_response(&response, ctx)
}
