//! Match narration settings
//!
//! Passed into each match instead of process-wide logging switches. The
//! `tracing` subscriber still decides what is finally printed.

use serde::{Deserialize, Serialize};

/// How much a match narrates about itself
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verbosity {
    /// Nothing below warnings
    Quiet,
    /// Hand outcomes at debug level
    #[default]
    Normal,
    /// Deals, every action and the table after each turn
    Verbose,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub verbosity: Verbosity,
}

impl Diagnostics {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn quiet() -> Self {
        Self::new(Verbosity::Quiet)
    }

    pub fn verbose() -> Self {
        Self::new(Verbosity::Verbose)
    }

    /// Report hand outcomes
    pub fn outcomes(&self) -> bool {
        self.verbosity >= Verbosity::Normal
    }

    /// Report individual deals and actions
    pub fn actions(&self) -> bool {
        self.verbosity >= Verbosity::Verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_nest() {
        assert!(!Diagnostics::quiet().outcomes());
        assert!(Diagnostics::default().outcomes());
        assert!(!Diagnostics::default().actions());
        assert!(Diagnostics::verbose().actions());
        assert!(Diagnostics::verbose().outcomes());
    }
}
