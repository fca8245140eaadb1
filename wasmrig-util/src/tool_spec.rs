use std::{
    borrow::Cow,
    fmt::{Debug, Write},
};

use serde::Deserialize;

type CowStr = Cow<'static, str>;

/// Splits `name[arg]` into its parts. A bare `name` has no argument.
pub fn split_bracketed(input: &str) -> Option<(&str, Option<&str>)> {
    const BRACKETS: &[char] = &['[', ']'];
    let Some((name, rest)) = input.split_once('[') else {
        return (!input.is_empty() && !input.contains(BRACKETS)).then_some((input, None));
    };
    let arg = rest.strip_suffix(']')?;
    if name.is_empty() || arg.is_empty() || arg.contains(BRACKETS) {
        return None;
    }
    Some((name, Some(arg)))
}

/// An executable looked up on the search path, together with the package that
/// provides it.
///
/// Written as `program[package]`, e.g. `wasm-bindgen[wasm-bindgen-cli]`. A
/// bare `program` is installed from the package of the same name.
#[derive(Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub program: CowStr,
    package: Option<CowStr>,
}

impl ToolSpec {
    pub const fn named(program: &'static str) -> Self {
        Self {
            program: Cow::Borrowed(program),
            package: None,
        }
    }

    pub const fn with_package(program: &'static str, package: &'static str) -> Self {
        Self {
            program: Cow::Borrowed(program),
            package: Some(Cow::Borrowed(package)),
        }
    }

    pub fn new(input: impl Into<CowStr>) -> Result<Self, ToolSpecParseError> {
        use ToolSpecParseError::*;
        let input = input.into();
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Required);
        }
        let Some((program, package)) = split_bracketed(trimmed) else {
            return Err(Invalid(input));
        };
        Ok(Self {
            program: program.to_owned().into(),
            package: package.map(|p| p.to_owned().into()),
        })
    }

    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or(&self.program)
    }
}

impl std::fmt::Display for ToolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        if let Some(package) = self.package.as_ref() {
            f.write_char('[')?;
            f.write_str(package)?;
            f.write_char(']')?;
        }
        Ok(())
    }
}

impl Debug for ToolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ToolSpec({})", self)
    }
}

impl<'de> Deserialize<'de> for ToolSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let input = String::deserialize(deserializer)?;
        ToolSpec::new(input).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug)]
pub enum ToolSpecParseError {
    Required,
    Invalid(CowStr),
}

impl std::fmt::Display for ToolSpecParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ToolSpecParseError::*;
        match self {
            Required => write!(f, "tool name required"),
            Invalid(input) => write!(f, "invalid tool spec: {:?}", input),
        }
    }
}

impl std::error::Error for ToolSpecParseError {}

#[macro_export]
macro_rules! tool_spec {
    ($input:expr) => {
        $crate::ToolSpec::new($input).unwrap()
    };
}
