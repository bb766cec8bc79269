mod logging;
mod runner;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use jumpbuild_engine::Key;

use runner::HeadlessRunner;

/// Run a Jump & Build level without a window and log what happens
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level document (JSON)
    level: PathBuf,

    /// Sprite manifest (JSON) resolving the level's sprite names
    #[arg(short, long)]
    manifest: PathBuf,

    /// Simulation config (JSON); defaults apply when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many seconds; 0 runs until the session ends
    #[arg(short, long, default_value_t = 10.0)]
    seconds: f64,

    /// Key held down for the whole run (e.g. right, shift, space); repeatable
    #[arg(long = "hold")]
    hold: Vec<Key>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut runner =
        HeadlessRunner::load(&args.manifest, &args.level, args.config.as_deref())?.with_held_keys(args.hold);
    let limit = (args.seconds > 0.0).then(|| Duration::from_secs_f64(args.seconds));
    let summary = runner.run_for(limit)?;

    log::info!(
        "Finished ({:?}): score {}, lives {}, won {}",
        summary.exit,
        summary.score,
        summary.lives,
        summary.level_won
    );
    Ok(())
}
