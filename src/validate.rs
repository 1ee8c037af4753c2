use crate::data::{
    FIELD_EMPLOYEE_EMAIL, FIELD_EMPLOYEE_NAME, FIELD_SECRET_CHILD_EMAIL, FIELD_SECRET_CHILD_NAME,
    Member, PriorAssignment,
};
use log::debug;
use std::collections::HashSet;
use std::fmt;

/// Which input collection a violation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Members,
    PriorAssignments,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Members => write!(f, "employee data"),
            Dataset::PriorAssignments => write!(f, "previous year data"),
        }
    }
}

/// A structural defect in the input. Rows are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingMembers,
    MissingPriorAssignments,
    MissingField {
        dataset: Dataset,
        field: &'static str,
        row: usize,
    },
    DuplicateEmail {
        email: String,
        row: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingMembers => write!(f, "Employee data is required"),
            Violation::MissingPriorAssignments => {
                write!(f, "Previous year assignment data is required")
            }
            Violation::MissingField {
                dataset,
                field,
                row,
            } => write!(f, "Missing or empty {} in {} at row {}", field, dataset, row),
            Violation::DuplicateEmail { email, row } => write!(
                f,
                "Duplicate {} \"{}\" in {} at row {}",
                FIELD_EMPLOYEE_EMAIL,
                email,
                Dataset::Members,
                row
            ),
        }
    }
}

/// Checks both collections and reports every violation found, in input order.
pub fn validate(members: &[Member], prior_assignments: &[PriorAssignment]) -> Vec<Violation> {
    let mut violations = Vec::new();

    if members.is_empty() {
        violations.push(Violation::MissingMembers);
    }
    if prior_assignments.is_empty() {
        violations.push(Violation::MissingPriorAssignments);
    }

    let mut seen_emails: HashSet<&str> = HashSet::new();
    for (index, member) in members.iter().enumerate() {
        let row = index + 1;
        let fields = [
            (FIELD_EMPLOYEE_NAME, &member.name),
            (FIELD_EMPLOYEE_EMAIL, &member.email),
        ];
        violations.extend(missing_fields(Dataset::Members, row, &fields));

        // blank emails are already reported as missing
        if !is_blank(&member.email) && !seen_emails.insert(member.email.as_str()) {
            violations.push(Violation::DuplicateEmail {
                email: member.email.clone(),
                row,
            });
        }
    }

    for (index, record) in prior_assignments.iter().enumerate() {
        let fields = [
            (FIELD_EMPLOYEE_NAME, &record.giver_name),
            (FIELD_EMPLOYEE_EMAIL, &record.giver_email),
            (FIELD_SECRET_CHILD_NAME, &record.recipient_name),
            (FIELD_SECRET_CHILD_EMAIL, &record.recipient_email),
        ];
        violations.extend(missing_fields(
            Dataset::PriorAssignments,
            index + 1,
            &fields,
        ));
    }

    debug!(
        "Validated {} members and {} prior assignments: {} violations",
        members.len(),
        prior_assignments.len(),
        violations.len()
    );
    violations
}

fn missing_fields<'a>(
    dataset: Dataset,
    row: usize,
    fields: &'a [(&'static str, &String)],
) -> impl Iterator<Item = Violation> + 'a {
    fields
        .iter()
        .filter(|(_, value)| is_blank(value))
        .map(move |&(field, _)| Violation::MissingField {
            dataset,
            field,
            row,
        })
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members() -> Vec<Member> {
        vec![
            Member::new("Alice", "alice@example.com"),
            Member::new("Bob", "bob@example.com"),
            Member::new("Carol", "carol@example.com"),
        ]
    }

    fn prior() -> Vec<PriorAssignment> {
        let m = members();
        vec![PriorAssignment::new(&m[0], &m[1])]
    }

    #[test]
    fn test_valid_input_has_no_violations() {
        assert!(validate(&members(), &prior()).is_empty());
    }

    #[test]
    fn test_empty_collections_are_both_reported() {
        let violations = validate(&[], &[]);
        assert_eq!(
            violations,
            vec![Violation::MissingMembers, Violation::MissingPriorAssignments]
        );
        assert_eq!(violations[0].to_string(), "Employee data is required");
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let mut members = members();
        members[0].name = "   ".to_string();
        members[2].email.clear();
        members[2].name.clear();

        let violations = validate(&members, &prior());
        assert_eq!(violations.len(), 3);
        assert_eq!(
            violations[0].to_string(),
            "Missing or empty Employee_Name in employee data at row 1"
        );
        assert_eq!(
            violations[2],
            Violation::MissingField {
                dataset: Dataset::Members,
                field: FIELD_EMPLOYEE_EMAIL,
                row: 3,
            }
        );
    }

    #[test]
    fn test_duplicate_email_names_second_row() {
        let mut members = members();
        members.push(Member::new("Alice Again", "alice@example.com"));

        let violations = validate(&members, &prior());
        assert_eq!(
            violations,
            vec![Violation::DuplicateEmail {
                email: "alice@example.com".to_string(),
                row: 4,
            }]
        );
        assert_eq!(
            violations[0].to_string(),
            "Duplicate Employee_EmailID \"alice@example.com\" in employee data at row 4"
        );
    }

    #[test]
    fn test_member_violations_precede_prior_violations() {
        let mut members = members();
        members[1].name.clear();
        let prior = vec![PriorAssignment {
            giver_name: "Alice".to_string(),
            giver_email: "alice@example.com".to_string(),
            ..Default::default()
        }];

        let violations = validate(&members, &prior);
        assert_eq!(violations.len(), 3);
        assert!(matches!(
            violations[0],
            Violation::MissingField {
                dataset: Dataset::Members,
                row: 2,
                ..
            }
        ));
        assert_eq!(
            violations[1].to_string(),
            "Missing or empty Secret_Child_Name in previous year data at row 1"
        );
        assert_eq!(
            violations[2].to_string(),
            "Missing or empty Secret_Child_EmailID in previous year data at row 1"
        );
    }
}
