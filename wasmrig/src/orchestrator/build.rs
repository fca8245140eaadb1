use std::path::PathBuf;

use anyhow::Result;
use log::info;

use super::Rig;
use crate::{project::Project, runner::Invocation};

impl Rig<'_> {
    /// Ensures the bindings generator, compiles the crate for the wasm target
    /// and writes the web bindings into the output directory.
    pub fn build(&self) -> Result<()> {
        let artifact = self.artifact_path()?;
        let bindgen = &self.config.bindgen;

        self.toolbox.ensure(&bindgen.tool)?;
        self.run_step("cargo build", &self.cargo_build())?;
        self.run_step(&bindgen.tool.program, &self.bindgen(artifact))?;

        info!("bindings written to {}", bindgen.out_dir.display());
        Ok(())
    }

    /// Path of the compiled module. Relative to the work directory when the
    /// target dir lies below it, absolute otherwise.
    pub fn artifact_path(&self) -> Result<PathBuf> {
        let build = &self.config.build;
        let (name, target_root) = match (&build.crate_name, Project::find_from(self.root)) {
            (Some(name), Ok(project)) => (name.clone(), project.target_root()?),
            (Some(name), Err(_)) => (name.clone(), self.root.to_path_buf()),
            (None, project) => {
                let project = project?;
                (project.artifact_name()?, project.target_root()?)
            }
        };
        let path = target_root
            .join(&build.target_dir)
            .join(&build.target)
            .join(build.profile.dir_name())
            .join(name + ".wasm");
        match path.strip_prefix(self.root) {
            Ok(relative) => Ok(relative.to_path_buf()),
            Err(_) => Ok(path),
        }
    }

    fn cargo_build(&self) -> Invocation {
        let build = &self.config.build;
        self.invocation(&build.cargo)
            .arg("build")
            .args(build.profile.cargo_flag())
            .args(["--target", build.target.as_str()])
            .args(&build.cargo_args)
    }

    fn bindgen(&self, artifact: PathBuf) -> Invocation {
        let bindgen = &self.config.bindgen;
        self.invocation(&*bindgen.tool.program)
            .arg(artifact)
            .arg("--out-dir")
            .arg(&bindgen.out_dir)
            .args(["--target", bindgen.target.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use anyhow::Result;

    use crate::{
        config::{Config, Profile},
        errors::exit_code,
        orchestrator::Rig,
        test_utils::{FakeLocator, Recorder},
    };

    fn config() -> Config {
        let mut config = Config::default();
        config.build.crate_name = Some("totk_map".into());
        config
    }

    fn project() -> Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"totk-map\"\nversion = \"0.1.0\"\n",
        )?;
        Ok(dir)
    }

    const BUILD: &str = "cargo build --release --target wasm32-unknown-unknown";
    const BINDGEN: &str =
        "wasm-bindgen target/wasm32-unknown-unknown/release/totk_map.wasm --out-dir pkg --target web";

    #[test]
    fn builds_without_installing_present_tool() -> Result<()> {
        let dir = project()?;
        let config = config();
        let runner = Recorder::default();
        let locator = FakeLocator::with(&["wasm-bindgen"]);
        Rig::new(&config, dir.path(), &runner, &locator)?.build()?;
        assert_eq!(runner.calls(), [BUILD, BINDGEN]);
        Ok(())
    }

    #[test]
    fn installs_missing_bindgen_first() -> Result<()> {
        let dir = project()?;
        let config = config();
        let runner = Recorder::default();
        let locator = FakeLocator::with(&[]);
        Rig::new(&config, dir.path(), &runner, &locator)?.build()?;
        assert_eq!(
            runner.calls(),
            ["cargo install wasm-bindgen-cli", BUILD, BINDGEN]
        );
        Ok(())
    }

    #[test]
    fn failed_compile_stops_the_sequence() -> Result<()> {
        let dir = project()?;
        let config = config();
        let runner = Recorder::failing_on("cargo build", 101);
        let locator = FakeLocator::with(&["wasm-bindgen"]);
        let err = Rig::new(&config, dir.path(), &runner, &locator)?
            .build()
            .unwrap_err();
        assert_eq!(exit_code(&err), 101);
        assert_eq!(runner.calls(), [BUILD]);
        Ok(())
    }

    #[test]
    fn failed_install_stops_before_compiling() -> Result<()> {
        let dir = project()?;
        let config = config();
        let runner = Recorder::failing_on("cargo install", 1);
        let locator = FakeLocator::with(&[]);
        let err = Rig::new(&config, dir.path(), &runner, &locator)?
            .build()
            .unwrap_err();
        assert_eq!(exit_code(&err), 1);
        assert_eq!(runner.calls(), ["cargo install wasm-bindgen-cli"]);
        Ok(())
    }

    #[test]
    fn debug_profile_and_extra_args() -> Result<()> {
        let dir = project()?;
        let mut config = config();
        config.build.profile = Profile::Debug;
        config.build.cargo_args = vec!["--features".into(), "webgl".into()];
        let runner = Recorder::default();
        let locator = FakeLocator::with(&["wasm-bindgen"]);
        Rig::new(&config, dir.path(), &runner, &locator)?.build()?;
        assert_eq!(
            runner.calls(),
            [
                "cargo build --target wasm32-unknown-unknown --features webgl",
                "wasm-bindgen target/wasm32-unknown-unknown/debug/totk_map.wasm --out-dir pkg --target web",
            ]
        );
        Ok(())
    }

    #[test]
    fn artifact_name_from_manifest() -> Result<()> {
        let dir = project()?;
        let config = Config::default();
        let runner = Recorder::default();
        let locator = FakeLocator::with(&[]);
        let rig = Rig::new(&config, dir.path(), &runner, &locator)?;
        assert_eq!(
            rig.artifact_path()?,
            Path::new("target/wasm32-unknown-unknown/release/totk_map.wasm")
        );
        Ok(())
    }

    #[test]
    fn artifact_from_nested_work_dir() -> Result<()> {
        let dir = project()?;
        let nested = dir.path().join("web");
        std::fs::create_dir(&nested)?;
        let config = Config::default();
        let runner = Recorder::default();
        let locator = FakeLocator::with(&["wasm-bindgen"]);
        let rig = Rig::new(&config, &nested, &runner, &locator)?;

        let expected = dir
            .path()
            .join("target/wasm32-unknown-unknown/release/totk_map.wasm");
        assert_eq!(nested.join(rig.artifact_path()?), expected);

        rig.build()?;
        assert_eq!(
            runner.calls()[1],
            format!(
                "wasm-bindgen {} --out-dir pkg --target web",
                expected.display()
            )
        );
        Ok(())
    }

    #[test]
    fn artifact_of_workspace_member() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("Cargo.toml"),
            "[workspace]\nmembers = [\"app\"]\n",
        )?;
        let member = dir.path().join("app");
        std::fs::create_dir(&member)?;
        std::fs::write(
            member.join("Cargo.toml"),
            "[package]\nname = \"totk-map\"\nversion = \"0.1.0\"\n",
        )?;
        let config = Config::default();
        let runner = Recorder::default();
        let locator = FakeLocator::with(&[]);
        let rig = Rig::new(&config, &member, &runner, &locator)?;
        assert_eq!(
            rig.artifact_path()?,
            dir.path()
                .join("target/wasm32-unknown-unknown/release/totk_map.wasm")
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn absolute_target_dir_is_kept() -> Result<()> {
        let dir = project()?;
        let mut config = config();
        config.build.target_dir = "/var/cache/wasm-target".into();
        let runner = Recorder::default();
        let locator = FakeLocator::with(&[]);
        let rig = Rig::new(&config, dir.path(), &runner, &locator)?;
        assert_eq!(
            rig.artifact_path()?,
            Path::new("/var/cache/wasm-target/wasm32-unknown-unknown/release/totk_map.wasm")
        );
        Ok(())
    }

    #[test]
    fn unresolvable_artifact_runs_nothing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("Cargo.toml"), "[workspace]\n")?;
        let config = Config::default();
        let runner = Recorder::default();
        let locator = FakeLocator::with(&[]);
        assert!(Rig::new(&config, dir.path(), &runner, &locator)?
            .build()
            .is_err());
        assert!(runner.calls().is_empty());
        Ok(())
    }
}
