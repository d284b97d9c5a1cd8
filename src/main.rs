use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = sia_reshard::cli::parse();
    app::run(args)
}
