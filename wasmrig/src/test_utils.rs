use std::{cell::RefCell, collections::BTreeSet, path::PathBuf};

use anyhow::Result;

use crate::{
    runner::{Invocation, Outcome, Runner},
    tools::ToolLocator,
};

/// Locator that only knows a fixed set of programs.
pub struct FakeLocator(BTreeSet<String>);

impl FakeLocator {
    pub fn with(programs: &[&str]) -> Self {
        Self(programs.iter().map(|p| p.to_string()).collect())
    }
}

impl ToolLocator for FakeLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.0
            .contains(program)
            .then(|| PathBuf::from("/fake/bin").join(program))
    }
}

/// Runner that records invocations instead of spawning them.
#[derive(Default)]
pub struct Recorder {
    calls: RefCell<Vec<String>>,
    fail_on: Option<(&'static str, i32)>,
    interrupt_on: Option<&'static str>,
}

impl Recorder {
    pub fn failing_on(prefix: &'static str, code: i32) -> Self {
        Self {
            fail_on: Some((prefix, code)),
            ..Default::default()
        }
    }

    pub fn interrupting(prefix: &'static str) -> Self {
        Self {
            interrupt_on: Some(prefix),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, invocation: &Invocation) -> String {
        let line = invocation.to_string();
        self.calls.borrow_mut().push(line.clone());
        line
    }
}

impl Runner for Recorder {
    fn run(&self, invocation: &Invocation) -> Result<Outcome> {
        let line = self.record(invocation);
        match self.fail_on {
            Some((prefix, code)) if line.starts_with(prefix) => Ok(Outcome::Failed(Some(code))),
            _ => Ok(Outcome::Success),
        }
    }

    fn run_interruptible(&self, invocation: &Invocation) -> Result<Outcome> {
        let line = invocation.to_string();
        match self.interrupt_on {
            Some(prefix) if line.starts_with(prefix) => {
                self.record(invocation);
                Ok(Outcome::Interrupted)
            }
            _ => self.run(invocation),
        }
    }
}
