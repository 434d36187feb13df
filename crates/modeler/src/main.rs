#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cognitive_complexity)]

use anyhow::Context;
use modeling::ModelingSettings;

fn main() -> anyhow::Result<()> {
    modeler_lib::init_logging();

    let settings = match std::env::args().nth(1) {
        Some(path) => ModelingSettings::from_path(&path)
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => ModelingSettings::default(),
    };
    modeler_lib::run_demo(settings)?;
    Ok(())
}
