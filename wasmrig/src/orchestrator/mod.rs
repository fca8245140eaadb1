mod build;
mod serve;

use std::path::Path;

use anyhow::Result;

use crate::{
    config::Config,
    runner::{Invocation, Runner},
    tools::{InstallContext, ToolLocator, Toolbox, INSTALLER_REGISTRY},
};

/// Drives the build and serve sequences for one project directory.
pub struct Rig<'a> {
    config: &'a Config,
    root: &'a Path,
    runner: &'a dyn Runner,
    toolbox: Toolbox<'a>,
}

impl<'a> Rig<'a> {
    pub fn new(
        config: &'a Config,
        root: &'a Path,
        runner: &'a dyn Runner,
        locator: &'a dyn ToolLocator,
    ) -> Result<Self> {
        let install_ctx = InstallContext {
            cargo: config.build.cargo.clone(),
        };
        let installer = INSTALLER_REGISTRY.build(&install_ctx, config.installer.as_deref())?;
        Ok(Self {
            config,
            root,
            runner,
            toolbox: Toolbox::new(locator, installer, runner, root),
        })
    }

    fn invocation(&self, program: impl AsRef<std::ffi::OsStr>) -> Invocation {
        Invocation::new(program).current_dir(self.root)
    }

    fn run_step(&self, step: &str, invocation: &Invocation) -> Result<()> {
        self.runner.run(invocation)?.into_result(step)
    }
}
