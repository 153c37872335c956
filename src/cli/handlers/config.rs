use crate::cli::Context;

pub fn handle(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", ctx.settings.to_toml()?);
    Ok(())
}
