#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use anyhow::Result;
use tracing::info;

use zombie_race::app::App;
use zombie_race::config::load_config;
use zombie_race::logging::setup_logging;

fn main() -> Result<()> {
    setup_logging();

    let config = load_config()?;
    let mut app = App::new(&config)?;

    info!("Starting game loop");
    while app.run() {}

    Ok(())
}
