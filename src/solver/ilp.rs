use super::{Exclusions, Matcher};
use crate::data::{Assignment, Member};
use crate::error::AssignmentError;
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    default_solver, variable,
};
use itertools::Itertools;
use log::{debug, info, trace};
use rand::{Rng, RngCore};
use std::collections::HashMap;
use std::time::Instant;

/// Finds a perfect matching on the bipartite giver/recipient graph with the
/// forbidden edges removed, solved as a 0/1 program with HiGHS. Edge weights
/// are drawn from the RNG so repeated runs give different pairings. Fails only
/// when no valid assignment exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct IlpMatcher;

impl Matcher for IlpMatcher {
    fn name(&self) -> &'static str {
        "ilp"
    }

    fn assign(
        &self,
        members: &[Member],
        exclusions: &Exclusions<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Assignment>, AssignmentError> {
        let start_time = Instant::now();

        // (giver index, recipient index) for every allowed pairing
        let edges: Vec<(usize, usize)> = members
            .iter()
            .enumerate()
            .cartesian_product(members.iter().enumerate())
            .filter(|((_, giver), (_, recipient))| exclusions.allows(giver, recipient))
            .map(|((g, _), (r, _))| (g, r))
            .collect();
        trace!(
            "Kept {} allowed pairings out of {}",
            edges.len(),
            members.len() * members.len()
        );

        let by_giver: HashMap<usize, Vec<usize>> = edges
            .iter()
            .enumerate()
            .map(|(e, (g, _))| (*g, e))
            .into_group_map();
        let by_recipient: HashMap<usize, Vec<usize>> = edges
            .iter()
            .enumerate()
            .map(|(e, (_, r))| (*r, e))
            .into_group_map();

        // an empty row or column makes the program trivially infeasible; name the member instead
        if let Some(giver) = members
            .iter()
            .enumerate()
            .find(|(g, _)| !by_giver.contains_key(g))
        {
            return Err(AssignmentError::NoCandidate {
                giver: giver.1.name.clone(),
            });
        }
        if let Some(recipient) = members
            .iter()
            .enumerate()
            .find(|(r, _)| !by_recipient.contains_key(r))
        {
            return Err(AssignmentError::NoGiver {
                recipient: recipient.1.name.clone(),
            });
        }

        let mut problem = ProblemVariables::new();
        let pair_vars: Vec<Variable> = problem.add_vector(variable().binary(), edges.len());
        let objective: Expression = pair_vars
            .iter()
            .map(|var| rng.gen_range(1.0_f64..2.0) * Expression::from(*var))
            .sum();

        let mut model = problem
            .maximise(objective)
            .using(default_solver)
            .set_option("threads", 1)
            .set_option("log_to_console", "false");

        // every member gives exactly once
        for giver_edges in by_giver.values() {
            let gives: Expression = giver_edges.iter().map(|e| pair_vars[*e]).sum();
            model.add_constraint(constraint!(gives == 1));
        }
        // and receives exactly once
        for recipient_edges in by_recipient.values() {
            let receives: Expression = recipient_edges.iter().map(|e| pair_vars[*e]).sum();
            model.add_constraint(constraint!(receives == 1));
        }

        info!(
            "Solving matching over {} members and {} allowed pairings...",
            members.len(),
            edges.len()
        );
        let solution = match model.solve() {
            Ok(s) => s,
            Err(ResolutionError::Infeasible) => return Err(AssignmentError::Infeasible),
            Err(e) => return Err(AssignmentError::Solver(e.to_string())),
        };
        debug!("Matching solved in {:.2?}", start_time.elapsed());

        let chosen: HashMap<usize, usize> = edges
            .iter()
            .zip(&pair_vars)
            .filter(|(_, var)| solution.value(**var) > 0.5)
            .map(|(edge, _)| *edge)
            .collect();

        members
            .iter()
            .enumerate()
            .map(|(g, giver)| {
                chosen
                    .get(&g)
                    .map(|r| Assignment::pair(giver, &members[*r]))
                    .ok_or_else(|| AssignmentError::Incomplete {
                        expected: members.len(),
                        actual: chosen.len(),
                    })
            })
            .collect()
    }
}
