pub mod config;
pub mod data;
pub mod error;
pub mod server;
pub mod solver;
pub mod validate;

pub use data::{Assignment, Member, PriorAssignment};
pub use error::AssignmentError;
pub use solver::{generate, generate_with};
pub use validate::{Violation, validate};
