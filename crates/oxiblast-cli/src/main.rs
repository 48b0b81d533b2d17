use tracing_subscriber::EnvFilter;

mod command;
mod policy;
mod record;
mod schema;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    command::run()
}
