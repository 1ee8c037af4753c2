use rand::SeedableRng;
use rand::rngs::StdRng;
use secret_santa_solver::solver::{
    GreedyMatcher, IlpMatcher, Matcher, RetryingMatcher, generate_with,
};
use secret_santa_solver::{
    Assignment, AssignmentError, Member, PriorAssignment, Violation, generate, validate,
};
use std::collections::{HashMap, HashSet};

fn members(names: &[&str]) -> Vec<Member> {
    names
        .iter()
        .map(|n| Member::new(*n, format!("{}@x", n.to_ascii_lowercase())))
        .collect()
}

fn assert_valid_run(members: &[Member], prior: &[PriorAssignment], assignments: &[Assignment]) {
    assert_eq!(assignments.len(), members.len());

    let givers: HashSet<&str> = assignments.iter().map(|a| a.giver_email.as_str()).collect();
    let recipients: Vec<&str> = assignments
        .iter()
        .map(|a| a.recipient_email.as_str())
        .collect();
    let recipient_set: HashSet<&str> = recipients.iter().copied().collect();
    let member_set: HashSet<&str> = members.iter().map(|m| m.email.as_str()).collect();
    assert_eq!(recipient_set.len(), recipients.len(), "repeated recipient");
    assert_eq!(recipient_set, member_set);
    assert_eq!(givers, member_set);

    let excluded: HashMap<&str, &str> = prior
        .iter()
        .map(|p| (p.giver_email.as_str(), p.recipient_email.as_str()))
        .collect();
    for a in assignments {
        assert_ne!(a.giver_email, a.recipient_email);
        assert_ne!(
            excluded.get(a.giver_email.as_str()),
            Some(&a.recipient_email.as_str())
        );
    }
}

fn run_many(matcher: &dyn Matcher, members: &[Member], prior: &[PriorAssignment], runs: u64) -> usize {
    let mut successes = 0;
    for seed in 0..runs {
        match generate_with(members, prior, matcher, &mut StdRng::seed_from_u64(seed)) {
            Ok(assignments) => {
                assert_valid_run(members, prior, &assignments);
                successes += 1;
            }
            Err(AssignmentError::NoCandidate { .. }) => {}
            Err(other) => panic!("unexpected failure: {other}"),
        }
    }
    successes
}

#[test]
fn scenario_a_never_self_assigns() {
    let group = members(&["A", "B", "C"]);
    let successes = run_many(&GreedyMatcher, &group, &[], 100);
    assert!(successes > 0);
}

#[test]
fn scenario_a_with_thread_rng() {
    let group = members(&["A", "B", "C"]);
    for _ in 0..100 {
        if let Ok(assignments) = generate(&group, &[]) {
            assert_valid_run(&group, &[], &assignments);
        }
    }
}

#[test]
fn scenario_b_fails_naming_the_blocked_giver() {
    let group = members(&["A", "B"]);
    let prior = vec![PriorAssignment::new(&group[0], &group[1])];

    let matchers: [&dyn Matcher; 3] = [
        &GreedyMatcher,
        &IlpMatcher,
        &RetryingMatcher::new(GreedyMatcher, 10),
    ];
    for matcher in matchers {
        let err = generate_with(&group, &prior, matcher, &mut StdRng::seed_from_u64(9))
            .unwrap_err();
        assert_eq!(err.to_string(), "No valid secret child found for A");
    }
}

#[test]
fn scenario_c_empty_members_is_a_violation() {
    let group = members(&["A", "B"]);
    let prior = vec![PriorAssignment::new(&group[0], &group[1])];

    let violations = validate(&[], &prior);
    assert_eq!(violations, vec![Violation::MissingMembers]);
}

#[test]
fn scenario_d_duplicate_email_references_second_position() {
    let mut group = members(&["A", "B", "C"]);
    group.push(Member::new("B2", "b@x"));
    let prior = vec![PriorAssignment::new(&group[0], &group[1])];

    let violations = validate(&group, &prior);
    assert_eq!(
        violations,
        vec![Violation::DuplicateEmail {
            email: "b@x".to_string(),
            row: 4,
        }]
    );
}

#[test]
fn validator_reports_every_violation() {
    let mut group = members(&["A", "B", "C", "D", "E"]);
    group[0].name.clear();
    group[2].email = " ".to_string();
    group[3].name.clear();
    group.push(Member::new("A2", "a@x"));
    group.push(Member::new("E2", "e@x"));
    let prior = vec![PriorAssignment::new(&group[1], &group[4])];

    // three broken fields plus two duplicates
    assert_eq!(validate(&group, &prior).len(), 5);
}

#[test]
fn greedy_respects_all_constraints_with_exclusions() {
    let group = members(&["A", "B", "C", "D", "E", "F", "G"]);
    let prior: Vec<PriorAssignment> = (0..group.len())
        .map(|i| PriorAssignment::new(&group[i], &group[(i + 1) % group.len()]))
        .collect();

    let successes = run_many(&GreedyMatcher, &group, &prior, 200);
    assert!(successes > 0);
}

#[test]
fn ilp_always_succeeds_when_a_solution_exists() {
    let group = members(&["A", "B", "C", "D", "E", "F"]);
    let prior: Vec<PriorAssignment> = (0..group.len())
        .map(|i| PriorAssignment::new(&group[i], &group[(i + 1) % group.len()]))
        .collect();

    assert_eq!(run_many(&IlpMatcher, &group, &prior, 20), 20);
}

#[test]
fn retrying_greedy_solves_tight_groups() {
    let group = members(&["A", "B", "C", "D"]);
    let prior = vec![
        PriorAssignment::new(&group[0], &group[1]),
        PriorAssignment::new(&group[1], &group[0]),
        PriorAssignment::new(&group[2], &group[3]),
        PriorAssignment::new(&group[3], &group[2]),
    ];
    let matcher = RetryingMatcher::new(GreedyMatcher, 64);

    assert_eq!(run_many(&matcher, &group, &prior, 30), 30);
}

#[test]
fn failed_run_returns_no_output() {
    // A has to take C, which leaves B with only A, its prior recipient.
    let group = members(&["A", "B", "C"]);
    let prior = vec![
        PriorAssignment::new(&group[0], &group[1]),
        PriorAssignment::new(&group[1], &group[0]),
    ];
    let result = generate_with(
        &group,
        &prior,
        &GreedyMatcher,
        &mut StdRng::seed_from_u64(2),
    );
    assert_eq!(
        result,
        Err(AssignmentError::NoCandidate {
            giver: "B".to_string()
        })
    );
}
