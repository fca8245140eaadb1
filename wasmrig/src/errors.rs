use thiserror::Error;

#[derive(Error, Debug)]
pub enum RigError {
    #[error("{step} failed with code: {code:?}")]
    StepFailed { step: String, code: Option<i32> },

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// Exit code used when the failure is not a wrapped command's own exit code.
pub const INTERNAL_FAILURE: i32 = 2;

/// Maps an orchestration error to the process exit code.
///
/// A failed step surfaces the wrapped command's own code, or 1 when the
/// command was killed before producing one.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref() {
        Some(RigError::StepFailed { code, .. }) => match code {
            Some(0) | None => 1,
            Some(code) => *code,
        },
        _ => INTERNAL_FAILURE,
    }
}
