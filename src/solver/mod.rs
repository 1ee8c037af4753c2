//! Assignment generation: the exclusion lookup, the matching seam and the
//! integrity checks every run goes through before its output is returned.

mod greedy;
mod ilp;
mod retry;

pub use greedy::GreedyMatcher;
pub use ilp::IlpMatcher;
pub use retry::RetryingMatcher;

use crate::data::{Assignment, Member, PriorAssignment};
use crate::error::AssignmentError;
use itertools::Itertools;
use log::{info, warn};
use rand::RngCore;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

/// giver email -> prior-round recipient email
#[derive(Debug, Clone, Default)]
pub struct Exclusions<'a> {
    prior_recipient: HashMap<&'a str, &'a str>,
}

impl<'a> Exclusions<'a> {
    /// The first prior record for a giver wins.
    pub fn from_prior(prior_assignments: &'a [PriorAssignment]) -> Self {
        let mut prior_recipient = HashMap::new();
        for record in prior_assignments {
            prior_recipient
                .entry(record.giver_email.as_str())
                .or_insert(record.recipient_email.as_str());
        }
        Self { prior_recipient }
    }

    pub fn prior_recipient(&self, giver_email: &str) -> Option<&'a str> {
        self.prior_recipient.get(giver_email).copied()
    }

    /// True when `recipient` is neither the giver nor the giver's prior recipient.
    pub fn allows(&self, giver: &Member, recipient: &Member) -> bool {
        recipient.email != giver.email
            && self.prior_recipient(&giver.email) != Some(recipient.email.as_str())
    }

    pub fn len(&self) -> usize {
        self.prior_recipient.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prior_recipient.is_empty()
    }
}

/// Produces one recipient per member. Implementations may fail but never
/// return partial output.
pub trait Matcher {
    fn name(&self) -> &'static str;

    fn assign(
        &self,
        members: &[Member],
        exclusions: &Exclusions<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Assignment>, AssignmentError>;
}

/// Which matcher a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    Greedy,
    Ilp,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Greedy => write!(f, "greedy"),
            Strategy::Ilp => write!(f, "ilp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}', expected 'greedy' or 'ilp'")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Strategy::Greedy),
            "ilp" => Ok(Strategy::Ilp),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

/// Builds the matcher for a strategy. Only the greedy matcher is randomized
/// in a way that retrying can help, so only it gets wrapped.
pub fn build_matcher(strategy: Strategy, max_attempts: u32) -> Box<dyn Matcher + Send + Sync> {
    match strategy {
        Strategy::Greedy if max_attempts > 1 => {
            Box::new(RetryingMatcher::new(GreedyMatcher, max_attempts))
        }
        Strategy::Greedy => Box::new(GreedyMatcher),
        Strategy::Ilp => Box::new(IlpMatcher),
    }
}

/// Generates assignments with the greedy matcher and a thread-local RNG.
/// The caller must have validated the input first.
pub fn generate(
    members: &[Member],
    prior_assignments: &[PriorAssignment],
) -> Result<Vec<Assignment>, AssignmentError> {
    generate_with(
        members,
        prior_assignments,
        &GreedyMatcher,
        &mut rand::thread_rng(),
    )
}

pub fn generate_with<M: Matcher + ?Sized>(
    members: &[Member],
    prior_assignments: &[PriorAssignment],
    matcher: &M,
    rng: &mut dyn RngCore,
) -> Result<Vec<Assignment>, AssignmentError> {
    let start_time = Instant::now();
    let exclusions = Exclusions::from_prior(prior_assignments);
    info!(
        "Generating assignments for {} members with {} prior exclusions using the {} matcher",
        members.len(),
        exclusions.len(),
        matcher.name()
    );

    let assignments = matcher.assign(members, &exclusions, rng).inspect_err(|e| {
        warn!("Assignment run failed: {}", e);
    })?;
    check_integrity(members, &exclusions, &assignments)?;

    info!(
        "Generated {} assignments in {:.2?}",
        assignments.len(),
        start_time.elapsed()
    );
    Ok(assignments)
}

/// Re-checks a finished run. These should never fire for a correct matcher.
pub fn check_integrity(
    members: &[Member],
    exclusions: &Exclusions<'_>,
    assignments: &[Assignment],
) -> Result<(), AssignmentError> {
    if assignments.len() != members.len() {
        return Err(AssignmentError::Incomplete {
            expected: members.len(),
            actual: assignments.len(),
        });
    }

    if let Some(email) = assignments
        .iter()
        .map(|a| a.recipient_email.as_str())
        .duplicates()
        .next()
    {
        return Err(AssignmentError::DuplicateRecipient {
            email: email.to_string(),
        });
    }

    for assignment in assignments {
        if assignment.giver_email == assignment.recipient_email {
            return Err(AssignmentError::SelfAssignment {
                giver: assignment.giver_name.clone(),
            });
        }
        if exclusions.prior_recipient(&assignment.giver_email)
            == Some(assignment.recipient_email.as_str())
        {
            return Err(AssignmentError::RepeatedPriorRecipient {
                giver: assignment.giver_name.clone(),
            });
        }
    }

    Ok(())
}
