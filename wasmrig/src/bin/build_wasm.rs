use anyhow::Result;
use clap::Parser;
use wasmrig::cli::{main_with, with_rig, CommonArgs};

/// Compiles the crate for wasm32 and generates its web bindings.
#[derive(Parser, Debug)]
#[command(name = "build-wasm", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    main_with(|| run_main(Cli::parse()))
}

fn run_main(cli: Cli) -> Result<()> {
    let (config, work_dir) = cli.common.load()?;
    with_rig(&config, &work_dir, |rig| rig.build())
}

#[test]
fn parses_without_arguments() {
    let cli = Cli::parse_from(["build-wasm"]);
    assert!(cli.common.config.is_none());
}
