use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{bail, Result};
use log::{debug, info};
use wasmrig_util::{Registry, ToolSpec};

use crate::runner::{Invocation, Runner};

/// Looks up executables on the search path.
pub trait ToolLocator {
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Builds the command that installs a package providing a tool.
pub trait Installer: Sync + Send {
    fn invocation(&self, package: &str) -> Invocation;
}

pub struct InstallContext {
    pub cargo: PathBuf,
}

pub struct CargoInstall {
    cargo: PathBuf,
    extra: Option<String>,
}

impl Installer for CargoInstall {
    fn invocation(&self, package: &str) -> Invocation {
        Invocation::new(&self.cargo)
            .arg("install")
            .args(self.extra.iter())
            .arg(package)
    }
}

pub struct CargoBinstall {
    cargo: PathBuf,
}

impl Installer for CargoBinstall {
    fn invocation(&self, package: &str) -> Invocation {
        Invocation::new(&self.cargo).args(["binstall", "--no-confirm", package])
    }
}

/// `cargo-install[ARG]` passes `ARG` through to `cargo install`, e.g.
/// `cargo-install[--locked]`.
pub static INSTALLER_REGISTRY: LazyLock<Registry<InstallContext, dyn Installer>> =
    LazyLock::new(|| {
        Registry::new()
            .add("cargo-install", |ctx: &InstallContext, arg: Option<&str>| {
                Ok(Box::new(CargoInstall {
                    cargo: ctx.cargo.clone(),
                    extra: arg.map(str::to_owned),
                }) as Box<dyn Installer>)
            })
            .add("cargo-binstall", |ctx: &InstallContext, arg: Option<&str>| {
                if arg.is_some() {
                    bail!("takes no argument");
                }
                Ok(Box::new(CargoBinstall {
                    cargo: ctx.cargo.clone(),
                }) as Box<dyn Installer>)
            })
            .with_default("cargo-install")
    });

/// Presence checks plus on-demand installation.
pub struct Toolbox<'a> {
    locator: &'a dyn ToolLocator,
    installer: Box<dyn Installer>,
    runner: &'a dyn Runner,
    root: &'a Path,
}

impl<'a> Toolbox<'a> {
    pub fn new(
        locator: &'a dyn ToolLocator,
        installer: Box<dyn Installer>,
        runner: &'a dyn Runner,
        root: &'a Path,
    ) -> Self {
        Self {
            locator,
            installer,
            runner,
            root,
        }
    }

    /// Installs the tool's package unless the program is already on the
    /// search path. Returns whether an install ran.
    pub fn ensure(&self, tool: &ToolSpec) -> Result<bool> {
        if let Some(path) = self.locator.locate(&tool.program) {
            debug!("found {} at {}", tool.program, path.display());
            return Ok(false);
        }
        info!(
            "{} not found on PATH, installing {}",
            tool.program,
            tool.package()
        );
        let invocation = self.installer.invocation(tool.package()).current_dir(self.root);
        self.runner
            .run(&invocation)?
            .into_result(format!("installing {}", tool.package()))?;
        Ok(true)
    }
}
