use anyhow::Result;
use clap::Parser;
use wasmrig::cli::{main_with, with_rig, CommonArgs};

/// Serves the generated bindings, building them first when missing.
#[derive(Parser, Debug)]
#[command(name = "run-wasm", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(short, long, help = "Port for the file server [default: 3000]")]
    port: Option<u16>,
}

fn main() {
    main_with(|| run_main(Cli::parse()))
}

fn run_main(cli: Cli) -> Result<()> {
    let (mut config, work_dir) = cli.common.load()?;
    if let Some(port) = cli.port {
        config.serve.port = port;
    }
    with_rig(&config, &work_dir, |rig| rig.serve())
}

#[test]
fn port_override() {
    let cli = Cli::parse_from(["run-wasm", "-p", "8080"]);
    assert_eq!(cli.port, Some(8080));
    assert!(Cli::try_parse_from(["run-wasm", "--port", "http"]).is_err());
}
