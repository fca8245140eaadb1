use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use serde::Deserialize;

/// The cargo package being built, located by its `Cargo.toml`.
#[derive(Debug)]
pub struct Project {
    root_dir: PathBuf,
}

impl Project {
    /// Walks up from `dir` to the first directory holding a `Cargo.toml`.
    pub fn find_from(dir: &Path) -> Result<Project> {
        let mut dir = dir.to_path_buf();
        while !std::fs::exists(dir.join("Cargo.toml"))? {
            if !dir.pop() {
                bail!("could not find a Cargo.toml in your current file hierarchy");
            }
        }
        Ok(Project { root_dir: dir })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root_dir.join("Cargo.toml")
    }

    pub fn package_name(&self) -> Result<String> {
        let manifest_path = self.manifest_path();
        let Some(package) = Manifest::read(&manifest_path)?.package else {
            bail!(
                "{} has no [package] section, set `build.crate_name` instead",
                manifest_path.display()
            );
        };
        Ok(package.name)
    }

    /// File stem cargo gives the compiled `.wasm` artifact.
    pub fn artifact_name(&self) -> Result<String> {
        Ok(self.package_name()?.replace('-', "_"))
    }

    /// Directory cargo resolves a relative target dir against: the nearest
    /// enclosing workspace root, or the package itself.
    pub fn target_root(&self) -> Result<PathBuf> {
        let mut dir = self.root_dir.clone();
        loop {
            let manifest_path = dir.join("Cargo.toml");
            if std::fs::exists(&manifest_path)?
                && Manifest::read(&manifest_path)?.workspace.is_some()
            {
                return Ok(dir);
            }
            if !dir.pop() {
                return Ok(self.root_dir.clone());
            }
        }
    }
}

#[derive(Deserialize)]
struct Manifest {
    package: Option<Package>,
    workspace: Option<toml::Table>,
}

#[derive(Deserialize)]
struct Package {
    name: String,
}

impl Manifest {
    fn read(path: &Path) -> Result<Manifest> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| anyhow!("cannot parse {}: {}", path.display(), e))
    }
}
