use std::{ffi::OsString, path::PathBuf, process::exit};

use anyhow::{bail, Result};
use log::error;
use wasmrig_util::WorkDir;

use crate::{
    config::{Config, DEFAULT_CONFIG_FILE},
    errors::exit_code,
    runner::SystemRunner,
    tools::PathLocator,
    Rig,
};

/// Arguments shared by both entry points.
#[derive(clap::Args, Debug)]
pub struct CommonArgs {
    #[arg(
        short = 'c',
        long = "config",
        value_name = "CONFIG FILE",
        help = "Use the specified configuration file [default: ./wasmrig.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'w',
        long = "work-dir",
        value_name = "DIR",
        help = "Directory to build and serve from, overriding the config file"
    )]
    pub work_dir: Option<OsString>,
}

impl CommonArgs {
    fn config_path(&self) -> Result<Option<PathBuf>> {
        if let Some(config) = &self.config {
            if !std::fs::exists(config)? {
                bail!(
                    "specified configuration file does not exist: '{}'",
                    config.display()
                );
            }
            return Ok(Some(config.clone()));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        Ok(std::fs::exists(&default)?.then_some(default))
    }

    /// Reads the config file, if any, and resolves the work directory.
    pub fn load(&self) -> Result<(Config, WorkDir)> {
        let config_path = self.config_path()?;
        let config = match &config_path {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let work_dir = WorkDir::resolve(
            self.work_dir.as_deref(),
            config_path.as_deref(),
            config.work_dir.as_deref(),
        )?;
        Ok((config, work_dir))
    }
}

/// Runs `f` against the real process runner and search path.
pub fn with_rig<F>(config: &Config, work_dir: &WorkDir, f: F) -> Result<()>
where
    F: FnOnce(&Rig) -> Result<()>,
{
    let runner = SystemRunner::new();
    let rig = Rig::new(config, work_dir.path(), &runner, &PathLocator)?;
    f(&rig)
}

/// Entry point wrapper: sets up logging, runs `f` and exits with the code
/// matching its result.
pub fn main_with<F>(f: F) -> !
where
    F: FnOnce() -> Result<()>,
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match f() {
        Ok(()) => exit(0),
        Err(err) => {
            let code = exit_code(&err);
            error!("exiting with code {code}");
            eprintln!("Error: {err:#}");
            exit(code)
        }
    }
}
