// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stages and the transition table
//!
//! A lead moves through a fixed set of seven stages. `WON` and `LOST` are
//! terminal. Every legal move is listed in [`Stage::allowed_next`]; anything
//! not listed there is rejected before the store is touched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing a closed enum from its wire string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Normalize a wire token: trim, upper-case, `-` and spaces become `_`
pub(crate) fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// A pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Stage {
    New,
    Qualifying,
    Contacted,
    EstimateSent,
    Negotiating,
    Won,
    Lost,
}

/// Error for a rejected stage move
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("lead is already in {0}")]
    Unchanged(Stage),
    #[error("{0} is terminal; no transitions are allowed out of it")]
    Terminal(Stage),
    #[error("cannot move a lead from {from} to {to}")]
    NotAllowed { from: Stage, to: Stage },
}

impl Stage {
    /// All stages in pipeline order
    pub const ALL: [Stage; 7] = [
        Stage::New,
        Stage::Qualifying,
        Stage::Contacted,
        Stage::EstimateSent,
        Stage::Negotiating,
        Stage::Won,
        Stage::Lost,
    ];

    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::New => "NEW",
            Stage::Qualifying => "QUALIFYING",
            Stage::Contacted => "CONTACTED",
            Stage::EstimateSent => "ESTIMATE_SENT",
            Stage::Negotiating => "NEGOTIATING",
            Stage::Won => "WON",
            Stage::Lost => "LOST",
        }
    }

    /// Human-readable column label
    pub fn label(self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::Qualifying => "Qualifying",
            Stage::Contacted => "Contacted",
            Stage::EstimateSent => "Estimate Sent",
            Stage::Negotiating => "Negotiating",
            Stage::Won => "Won",
            Stage::Lost => "Lost",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Won | Stage::Lost)
    }

    /// Stages a lead in `self` may be moved to.
    ///
    /// Open stages can move forward or back to any other open stage (the
    /// board lets a lead be dropped into any column) and can close as won or
    /// lost. Terminal stages have no exits.
    pub fn allowed_next(self) -> &'static [Stage] {
        use Stage::*;
        match self {
            New => &[Qualifying, Contacted, EstimateSent, Negotiating, Won, Lost],
            Qualifying => &[New, Contacted, EstimateSent, Negotiating, Won, Lost],
            Contacted => &[New, Qualifying, EstimateSent, Negotiating, Won, Lost],
            EstimateSent => &[New, Qualifying, Contacted, Negotiating, Won, Lost],
            Negotiating => &[New, Qualifying, Contacted, EstimateSent, Won, Lost],
            Won | Lost => &[],
        }
    }

    pub fn can_transition_to(self, to: Stage) -> bool {
        self.allowed_next().contains(&to)
    }

    /// Check a move against the transition table
    pub fn check_transition(self, to: Stage) -> Result<(), TransitionError> {
        if self == to {
            return Err(TransitionError::Unchanged(self));
        }
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }
        if !self.can_transition_to(to) {
            return Err(TransitionError::NotAllowed { from: self, to });
        }
        Ok(())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "NEW" => Ok(Stage::New),
            "QUALIFYING" => Ok(Stage::Qualifying),
            "CONTACTED" => Ok(Stage::Contacted),
            "ESTIMATE_SENT" => Ok(Stage::EstimateSent),
            "NEGOTIATING" => Ok(Stage::Negotiating),
            "WON" => Ok(Stage::Won),
            "LOST" => Ok(Stage::Lost),
            _ => Err(ParseError::new("stage", s)),
        }
    }
}

impl TryFrom<String> for Stage {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.as_str().to_string()
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
