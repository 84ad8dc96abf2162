//! Execution backend selection.
//!
//! The structural cycle stepper (`interpret`) is the only backend this
//! build carries. The `jit` and `compile` tags are recognized so that
//! harnesses can name them, but constructing a machine with either fails
//! with [`crate::Error::BackendUnavailable`].

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Straight structural cycle stepper.
    Interpret,
    /// Specialize the decode table into direct-dispatch handlers at runtime.
    Jit,
    /// Ahead-of-time generated dispatcher.
    Compile,
}

impl Backend {
    /// Whether this backend is compiled into the current build.
    pub fn is_available(self) -> bool {
        matches!(self, Backend::Interpret)
    }
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Interpret
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Backend::Interpret => "interpret",
            Backend::Jit => "jit",
            Backend::Compile => "compile",
        };
        f.write_str(tag)
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interpret" => Ok(Backend::Interpret),
            "jit" => Ok(Backend::Jit),
            "compile" => Ok(Backend::Compile),
            other => Err(format!(
                "unknown backend `{}` (expected interpret, jit or compile)",
                other
            )),
        }
    }
}
