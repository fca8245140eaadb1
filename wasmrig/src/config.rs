use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Deserialize;
use wasmrig_util::ToolSpec;

pub const DEFAULT_CONFIG_FILE: &str = "wasmrig.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub work_dir: Option<PathBuf>,
    /// Installer selector, see [`crate::tools::INSTALLER_REGISTRY`].
    pub installer: Option<String>,

    pub build: BuildConfig,
    pub bindgen: BindgenConfig,
    pub serve: ServeConfig,
}

#[derive(Deserialize, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub cargo: PathBuf,
    pub crate_name: Option<String>,
    pub target: String,
    pub profile: Profile,
    pub target_dir: PathBuf,
    pub cargo_args: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Release,
    Debug,
}

impl Profile {
    pub fn dir_name(self) -> &'static str {
        match self {
            Profile::Release => "release",
            Profile::Debug => "debug",
        }
    }

    pub fn cargo_flag(self) -> Option<&'static str> {
        match self {
            Profile::Release => Some("--release"),
            Profile::Debug => None,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct BindgenConfig {
    pub tool: ToolSpec,
    pub out_dir: PathBuf,
    pub target: String,
}

#[derive(Deserialize, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    pub tool: ToolSpec,
    pub port: u16,
    pub index: PathBuf,
    pub spa: bool,
    pub dir: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            cargo: "cargo".into(),
            crate_name: None,
            target: "wasm32-unknown-unknown".into(),
            profile: Profile::Release,
            target_dir: "target".into(),
            cargo_args: vec![],
        }
    }
}

impl Default for BindgenConfig {
    fn default() -> Self {
        Self {
            tool: ToolSpec::with_package("wasm-bindgen", "wasm-bindgen-cli"),
            out_dir: "pkg".into(),
            target: "web".into(),
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            tool: ToolSpec::named("miniserve"),
            port: 3000,
            index: "web/index.html".into(),
            spa: true,
            dir: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) => bail!("could not read config file `{}`: {}", path.display(), err),
        };

        match toml::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(err) => bail!("unable to load config from `{}`: {}", path.display(), err),
        }
    }
}
