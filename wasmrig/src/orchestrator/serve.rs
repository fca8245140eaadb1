use anyhow::Result;
use log::info;

use super::Rig;
use crate::runner::{Invocation, Outcome};

impl Rig<'_> {
    /// Builds if the output directory is missing, ensures the file server and
    /// runs it until it exits. A Ctrl-C ends the server cleanly.
    pub fn serve(&self) -> Result<()> {
        let out_dir = self.root.join(&self.config.bindgen.out_dir);
        if std::fs::exists(&out_dir)? {
            info!("{} exists, skipping build", self.config.bindgen.out_dir.display());
        } else {
            self.build()?;
        }

        let serve = &self.config.serve;
        self.toolbox.ensure(&serve.tool)?;

        info!("serving on http://localhost:{}", serve.port);
        match self.runner.run_interruptible(&self.server())? {
            Outcome::Interrupted => {
                info!("interrupted, shutting down");
                Ok(())
            }
            outcome => outcome.into_result(&*serve.tool.program),
        }
    }

    fn server(&self) -> Invocation {
        let serve = &self.config.serve;
        let mut invocation = self
            .invocation(&*serve.tool.program)
            .arg("-p")
            .arg(serve.port.to_string());
        if serve.spa {
            invocation = invocation.arg("--spa");
        }
        invocation
            .arg("--index")
            .arg(&serve.index)
            .args(serve.dir.iter())
    }
}
