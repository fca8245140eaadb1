use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::PathBuf,
    process::{Command, ExitStatus},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Once,
    },
};

use anyhow::Result;
use log::info;

use crate::errors::RigError;

/// One external command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: vec![],
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Non-zero exit. `None` when the process was killed by a signal.
    Failed(Option<i32>),
    /// Ended by a user interrupt. Only reported by
    /// [`Runner::run_interruptible`].
    Interrupted,
}

impl Outcome {
    /// Turns anything but [`Outcome::Success`] into a [`RigError::StepFailed`].
    pub fn into_result(self, step: impl Into<String>) -> Result<()> {
        match self {
            Outcome::Success => Ok(()),
            Outcome::Failed(code) => Err(RigError::StepFailed {
                step: step.into(),
                code,
            }
            .into()),
            Outcome::Interrupted => Err(RigError::StepFailed {
                step: step.into(),
                code: None,
            }
            .into()),
        }
    }
}

pub trait Runner {
    /// Runs the invocation to completion.
    fn run(&self, invocation: &Invocation) -> Result<Outcome>;

    /// Runs a long-lived invocation the user is expected to stop with Ctrl-C.
    fn run_interruptible(&self, invocation: &Invocation) -> Result<Outcome> {
        self.run(invocation)
    }
}

/// Spawns real processes, inheriting stdio.
pub struct SystemRunner {
    interrupted: Arc<AtomicBool>,
    handler: Once,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemRunner {
    pub fn new() -> Self {
        Self {
            interrupted: Arc::new(AtomicBool::new(false)),
            handler: Once::new(),
        }
    }

    /// Installs the Ctrl-C handler. The child shares our process group and
    /// receives the interrupt itself, so the handler only records it.
    fn watch_interrupts(&self) -> Result<()> {
        let mut result = Ok(());
        self.handler.call_once(|| {
            let interrupted = self.interrupted.clone();
            result = ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst));
        });
        Ok(result?)
    }

    fn spawn_and_wait(&self, invocation: &Invocation) -> Result<ExitStatus> {
        info!("running `{}`", invocation);
        let status = invocation
            .command()
            .spawn()
            .and_then(|mut child| child.wait())
            .map_err(|source| RigError::Spawn {
                program: invocation.program().to_string_lossy().into_owned(),
                source,
            })?;
        Ok(status)
    }
}

/// Exit code of a process that ended on SIGINT after handling it (128 + 2).
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[cfg(unix)]
fn killed_by_interrupt(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    const SIGINT: i32 = 2;
    status.signal() == Some(SIGINT)
}

#[cfg(not(unix))]
fn killed_by_interrupt(_status: &ExitStatus) -> bool {
    false
}

/// Classifies how a long-lived process ended. The handler flag may be set
/// after the child has already exited, so the exit status is checked too.
fn interruptible_outcome(status: &ExitStatus, flagged: bool) -> Outcome {
    if status.success() {
        Outcome::Success
    } else if flagged
        || killed_by_interrupt(status)
        || status.code() == Some(INTERRUPTED_EXIT_CODE)
    {
        Outcome::Interrupted
    } else {
        Outcome::Failed(status.code())
    }
}

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<Outcome> {
        let status = self.spawn_and_wait(invocation)?;
        if status.success() {
            Ok(Outcome::Success)
        } else {
            Ok(Outcome::Failed(status.code()))
        }
    }

    fn run_interruptible(&self, invocation: &Invocation) -> Result<Outcome> {
        self.watch_interrupts()?;
        let status = self.spawn_and_wait(invocation)?;
        Ok(interruptible_outcome(
            &status,
            self.interrupted.load(Ordering::SeqCst),
        ))
    }
}
