use thiserror::Error;

/// A run that could not produce a complete assignment. No partial output survives it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    /// Every remaining candidate is the giver, their prior recipient, or already taken.
    #[error("No valid secret child found for {giver}")]
    NoCandidate { giver: String },

    /// Nobody is allowed to give to this member.
    #[error("No member can be assigned {recipient} as a secret child")]
    NoGiver { recipient: String },

    #[error("No complete assignment satisfies the exclusion rules")]
    Infeasible,

    #[error("Failed to generate complete Secret Santa assignments: expected {expected}, got {actual}")]
    Incomplete { expected: usize, actual: usize },

    #[error("Duplicate secret child assignments detected for {email}")]
    DuplicateRecipient { email: String },

    #[error("{giver} was assigned to themselves")]
    SelfAssignment { giver: String },

    #[error("{giver} was assigned their previous year secret child")]
    RepeatedPriorRecipient { giver: String },

    #[error("Solver error: {0}")]
    Solver(String),
}
