use serde::{Deserialize, Serialize};
use std::fmt;

pub const FIELD_EMPLOYEE_NAME: &str = "Employee_Name";
pub const FIELD_EMPLOYEE_EMAIL: &str = "Employee_EmailID";
pub const FIELD_SECRET_CHILD_NAME: &str = "Secret_Child_Name";
pub const FIELD_SECRET_CHILD_EMAIL: &str = "Secret_Child_EmailID";

/// A member of the current group. The email identifies the member within a round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    #[serde(rename = "Employee_Name", default)]
    pub name: String,
    #[serde(rename = "Employee_EmailID", default)]
    pub email: String,
}

impl Member {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// One giver -> recipient pairing from an earlier round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PriorAssignment {
    #[serde(rename = "Employee_Name", default)]
    pub giver_name: String,
    #[serde(rename = "Employee_EmailID", default)]
    pub giver_email: String,
    #[serde(rename = "Secret_Child_Name", default)]
    pub recipient_name: String,
    #[serde(rename = "Secret_Child_EmailID", default)]
    pub recipient_email: String,
}

impl PriorAssignment {
    pub fn new(giver: &Member, recipient: &Member) -> Self {
        Self {
            giver_name: giver.name.clone(),
            giver_email: giver.email.clone(),
            recipient_name: recipient.name.clone(),
            recipient_email: recipient.email.clone(),
        }
    }
}

/// A generated pairing. Created once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Assignment {
    #[serde(rename = "Employee_Name")]
    pub giver_name: String,
    #[serde(rename = "Employee_EmailID")]
    pub giver_email: String,
    #[serde(rename = "Secret_Child_Name")]
    pub recipient_name: String,
    #[serde(rename = "Secret_Child_EmailID")]
    pub recipient_email: String,
}

impl Assignment {
    pub fn pair(giver: &Member, recipient: &Member) -> Self {
        Self {
            giver_name: giver.name.clone(),
            giver_email: giver.email.clone(),
            recipient_name: recipient.name.clone(),
            recipient_email: recipient.email.clone(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> -> {} <{}>",
            self.giver_name, self.giver_email, self.recipient_name, self.recipient_email
        )
    }
}

/// Request body shared by the validate and generate endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub prior_assignments: Vec<PriorAssignment>,
    /// Fixes the random draw so a run can be reproduced.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<String>,
}

/// The output of a successful generation run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub strategy: String,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}
