use super::{Exclusions, Matcher};
use crate::data::{Assignment, Member};
use crate::error::AssignmentError;
use log::{info, warn};
use rand::RngCore;

/// Re-runs a randomized matcher up to `max_attempts` times. Only a dead end
/// for one giver is worth retrying; any other error is returned at once.
#[derive(Debug, Clone)]
pub struct RetryingMatcher<M> {
    inner: M,
    max_attempts: u32,
}

impl<M: Matcher> RetryingMatcher<M> {
    pub fn new(inner: M, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl<M: Matcher> Matcher for RetryingMatcher<M> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn assign(
        &self,
        members: &[Member],
        exclusions: &Exclusions<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Assignment>, AssignmentError> {
        let mut attempt = 1;
        loop {
            match self.inner.assign(members, exclusions, &mut *rng) {
                Ok(assignments) => {
                    if attempt > 1 {
                        info!("Found assignments on attempt {}", attempt);
                    }
                    return Ok(assignments);
                }
                Err(e @ AssignmentError::NoCandidate { .. }) if attempt < self.max_attempts => {
                    warn!(
                        "Attempt {}/{} failed: {}",
                        attempt, self.max_attempts, e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
