#[macro_use]
extern crate log;
extern crate deckforge;

use deckforge::Catalog;
use std::env;
use std::path::Path;

fn main() -> Result<(), deckforge::BuildError> {
    let _ = env_logger::try_init();
    let args: Vec<String> = env::args().collect();
    assert!(args.len() > 2, "Expected 2 arguments, input CSV path and output path");
    let in_path = Path::new(&args[1]);
    let out_path = Path::new(&args[2]);

    info!("Loading tagged catalog CSV @ {}", in_path.display());
    let catalog = Catalog::load_csv(in_path)?;
    info!("Loaded {} cards; writing compiled catalog", catalog.len());
    catalog.save_compiled(out_path)?;
    info!("Wrote {}", out_path.display());
    Ok(())
}
