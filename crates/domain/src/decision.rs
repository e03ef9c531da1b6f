// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-line estimate decisions from automated and human sources.
//!
//! Each estimate line can carry decisions from two sources: the
//! automated evaluator and a human reviewer. Decisions are append-only
//! facts; a re-decision by the same source supersedes the prior one by
//! timestamp order, and a human decision that disagrees with the
//! automated one overrides it while both remain in history.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A decision verdict on one estimate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The line is approved.
    Approve,
    /// The line needs further review.
    Review,
    /// The line is rejected.
    Reject,
}

impl Verdict {
    /// Returns the string representation of the verdict.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Review => "review",
            Self::Reject => "reject",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "approve" => Ok(Self::Approve),
            "review" => Ok(Self::Review),
            "reject" => Ok(Self::Reject),
            _ => Err(DomainError::InvalidVerdict {
                verdict: s.to_string(),
            }),
        }
    }
}

impl FromStr for Verdict {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who bears the cost of the repair line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Responsibility {
    /// The car owner (lessor) pays.
    Lessor,
    /// The lessee/customer pays.
    Customer,
    /// Responsibility has not been determined.
    Unknown,
}

impl Responsibility {
    /// Returns the string representation of the responsibility.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lessor => "lessor",
            Self::Customer => "customer",
            Self::Unknown => "unknown",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "lessor" => Ok(Self::Lessor),
            "customer" => Ok(Self::Customer),
            "unknown" => Ok(Self::Unknown),
            _ => Err(DomainError::InvalidResponsibility {
                responsibility: s.to_string(),
            }),
        }
    }
}

impl FromStr for Responsibility {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for Responsibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The source of a line decision.
///
/// Confidence exists only for automated decisions, so it lives inside
/// the variant rather than as a nullable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "confidence")]
pub enum DecisionSource {
    /// Produced by the automated evaluator, with a confidence in [0, 1].
    Automated(Decimal),
    /// Recorded by a human reviewer.
    Human,
}

impl DecisionSource {
    /// Returns the persisted string form of the source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Automated(_) => "automated",
            Self::Human => "human",
        }
    }

    /// Returns the confidence score for automated decisions.
    #[must_use]
    pub const fn confidence(&self) -> Option<Decimal> {
        match self {
            Self::Automated(confidence) => Some(*confidence),
            Self::Human => None,
        }
    }

    /// Returns true for human decisions.
    #[must_use]
    pub const fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Reassembles a source from its persisted parts.
    ///
    /// Confidence is required for `automated`, must lie in [0, 1], and is
    /// rejected for `human`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source string is unknown or the confidence
    /// pairing is invalid.
    pub fn from_parts(source: &str, confidence: Option<Decimal>) -> Result<Self, DomainError> {
        match source {
            "automated" => {
                let confidence: Decimal = confidence.ok_or(DomainError::ConfidenceMissing)?;
                if confidence < Decimal::ZERO || confidence > Decimal::ONE {
                    return Err(DomainError::ConfidenceOutOfRange { value: confidence });
                }
                Ok(Self::Automated(confidence))
            }
            "human" => {
                if confidence.is_some() {
                    return Err(DomainError::ConfidenceNotAllowed);
                }
                Ok(Self::Human)
            }
            _ => Err(DomainError::InvalidDecisionSource {
                source: source.to_string(),
            }),
        }
    }
}

/// One recorded decision on one estimate line.
///
/// Decisions are append-only; superseding and overriding are derived at
/// read time, never stored as mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDecision {
    /// Internal identifier.
    pub decision_id: i64,
    /// The decided estimate line.
    pub line_id: i64,
    /// Who (or what) decided.
    pub source: DecisionSource,
    /// The verdict.
    pub verdict: Verdict,
    /// Who bears the cost.
    pub responsibility: Responsibility,
    /// Classification of the justification (e.g. `rule`, `photo`,
    /// `inspection_report`).
    pub basis_type: String,
    /// Pointer to the justification (rule id, document reference, …).
    pub basis_reference: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// The deciding actor.
    pub decided_by: String,
    /// Decision time (RFC 3339).
    pub decided_at: String,
}

impl LineDecision {
    /// Ordering key for "latest" semantics: timestamp first, row id as
    /// tiebreaker (RFC 3339 text timestamps can collide in one
    /// transaction).
    fn recency_key(&self) -> (&str, i64) {
        (self.decided_at.as_str(), self.decision_id)
    }

    /// Returns true if two decisions disagree on verdict or
    /// responsibility.
    #[must_use]
    pub fn disagrees_with(&self, other: &Self) -> bool {
        self.verdict != other.verdict || self.responsibility != other.responsibility
    }
}

/// Returns the latest decision from the given source, if any.
#[must_use]
pub fn latest_by_source<'a>(
    decisions: &'a [LineDecision],
    human: bool,
) -> Option<&'a LineDecision> {
    decisions
        .iter()
        .filter(|d| d.source.is_human() == human)
        .max_by_key(|d| d.recency_key())
}

/// Resolves the effective decision for a line.
///
/// The latest human decision is authoritative when present; otherwise the
/// latest automated decision applies. Returns `None` for an undecided
/// line.
#[must_use]
pub fn effective_decision<'a>(decisions: &'a [LineDecision]) -> Option<&'a LineDecision> {
    latest_by_source(decisions, true).or_else(|| latest_by_source(decisions, false))
}

/// Returns true when the line is overridden: both sources are present and
/// the latest of each disagree on verdict or responsibility.
///
/// Derived, never stored. The automated decision remains a fact in
/// history either way.
#[must_use]
pub fn is_override(decisions: &[LineDecision]) -> bool {
    match (
        latest_by_source(decisions, true),
        latest_by_source(decisions, false),
    ) {
        (Some(human), Some(automated)) => human.disagrees_with(automated),
        _ => false,
    }
}
