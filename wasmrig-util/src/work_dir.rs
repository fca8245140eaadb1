use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};

/// Directory the wrapped tools run in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// Resolves the work directory.
    ///
    /// The command line wins, then the `work_dir` entry of the config file
    /// (relative to the file's directory), then the config file's directory,
    /// and finally the current directory. Inputs may start with `<CWD>` or
    /// `<CFD>` to anchor them at the current or config file directory.
    pub fn resolve(
        cli_arg: Option<&OsStr>,
        config_path: Option<&Path>,
        configured: Option<&Path>,
    ) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config_dir = match config_path {
            Some(config_path) => {
                let config_path = config_path.canonicalize()?;
                config_path
                    .parent()
                    .ok_or_else(|| {
                        anyhow!("cannot resolve config dir from: {}", config_path.display())
                    })?
                    .to_path_buf()
            }
            None => cwd.clone(),
        };
        if let Some(cli_arg) = cli_arg {
            return Ok(Self::parse(cli_arg, &cwd, &cwd, &config_dir));
        }
        if let Some(configured) = configured {
            return Ok(Self::parse(configured.as_os_str(), &config_dir, &cwd, &config_dir));
        }
        Ok(Self { path: config_dir })
    }

    fn parse(input: &OsStr, base: &Path, cwd: &Path, config_dir: &Path) -> Self {
        let input_bytes = input.as_encoded_bytes();
        let anchored = |anchor: &Path, suffix: &[u8]| {
            let mut path = anchor.as_os_str().to_os_string();
            // SAFETY: `suffix` follows an ASCII prefix of a valid OsStr.
            path.push(unsafe { OsStr::from_encoded_bytes_unchecked(suffix) });
            PathBuf::from(path)
        };
        let path = if let Some(suffix) = input_bytes.strip_prefix(b"<CWD>") {
            anchored(cwd, suffix)
        } else if let Some(suffix) = input_bytes.strip_prefix(b"<CFD>") {
            anchored(config_dir, suffix)
        } else {
            base.join(input)
        };
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
