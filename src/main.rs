use clap::Parser;
use handsynth::app::{args::Arguments, run_app};

fn main() {
    let args = Arguments::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level),
    )
    .init();

    log::info!("starting handsynth");

    run_app(args);
}
