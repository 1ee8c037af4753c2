use super::{Exclusions, Matcher};
use crate::data::{Assignment, Member};
use crate::error::AssignmentError;
use log::{debug, trace};
use rand::RngCore;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Single pass over the members in input order, drawing each recipient
/// uniformly from whoever is still eligible. No backtracking, so it can
/// fail on inputs that do have a valid assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyMatcher;

impl Matcher for GreedyMatcher {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn assign(
        &self,
        members: &[Member],
        exclusions: &Exclusions<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Assignment>, AssignmentError> {
        let mut pool: Vec<&Member> = members.iter().collect();
        let mut taken: HashSet<&str> = HashSet::with_capacity(members.len());
        let mut assignments = Vec::with_capacity(members.len());

        for giver in members {
            let candidates: Vec<&Member> = pool
                .iter()
                .copied()
                .filter(|c| exclusions.allows(giver, c) && !taken.contains(c.email.as_str()))
                .collect();
            trace!("{} has {} candidates", giver.email, candidates.len());

            let Some(&recipient) = candidates.choose(&mut *rng) else {
                debug!(
                    "No candidate left for {} with {} members still in the pool",
                    giver.email,
                    pool.len()
                );
                return Err(AssignmentError::NoCandidate {
                    giver: giver.name.clone(),
                });
            };

            assignments.push(Assignment::pair(giver, recipient));
            taken.insert(recipient.email.as_str());
            pool.retain(|m| m.email != recipient.email);
        }

        Ok(assignments)
    }
}
