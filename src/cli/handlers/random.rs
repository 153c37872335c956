use crate::cli::{Context, args::RandomArgs, output};
use babel_books::{PageOptions, Request};

pub fn handle(args: RandomArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let number_of_pages = args.pages.unwrap_or(ctx.settings.random.pages);
    let response = ctx.worker().handle(Request::Random {
        random_options: PageOptions { number_of_pages },
    });
    output::print_response(&response, ctx)
}
