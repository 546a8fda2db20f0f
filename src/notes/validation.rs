//! Declarative validation for note payloads
//!
//! A [`Schema`] maps field names to a list of constraints. Validation runs
//! every rule against every supplied field and collects all violations, so a
//! caller always sees the full list of problems in one response.

use super::models::{CreateNoteRequest, Priority, UpdateNoteRequest};
use serde::{Deserialize, Serialize};

/// Minimum length (in characters) of a note title or description
pub const MIN_TEXT_CHARS: usize = 5;

/// A single failed constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// A check applied to one field value
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    /// At least this many characters
    MinChars(usize),
    /// Exactly one of these values
    OneOf(&'static [&'static str]),
}

impl Constraint {
    fn holds(&self, value: &str) -> bool {
        match self {
            Constraint::MinChars(min) => value.chars().count() >= *min,
            Constraint::OneOf(allowed) => allowed.contains(&value),
        }
    }
}

/// Constraints for one field, each paired with the message reported on failure
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraints: Vec<(Constraint, &'static str)>,
}

#[derive(Debug, Clone)]
pub struct Schema {
    rules: Vec<FieldRule>,
}

const PRIORITY_VALUES: &[&str] = &["LOW", "MED", "HIGH"];

impl Schema {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// The schema shared by create and update
    pub fn note() -> Self {
        Self::new(vec![
            FieldRule {
                field: "title",
                constraints: vec![(Constraint::MinChars(MIN_TEXT_CHARS), "title too short")],
            },
            FieldRule {
                field: "description",
                constraints: vec![(
                    Constraint::MinChars(MIN_TEXT_CHARS),
                    "description too short",
                )],
            },
            FieldRule {
                field: "priority",
                constraints: vec![(Constraint::OneOf(PRIORITY_VALUES), "invalid priority")],
            },
        ])
    }

    /// Validate the supplied fields. `None` values are skipped; fields the
    /// schema does not know are ignored.
    pub fn validate<'a, I>(&self, fields: I) -> Vec<Violation>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let supplied: Vec<(&str, &str)> = fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect();

        let mut violations = Vec::new();
        for rule in &self.rules {
            for (_, value) in supplied.iter().filter(|(name, _)| *name == rule.field) {
                for (constraint, message) in &rule.constraints {
                    if !constraint.holds(value) {
                        violations.push(Violation {
                            field: rule.field.to_string(),
                            message: (*message).to_string(),
                        });
                    }
                }
            }
        }
        violations
    }
}

/// Validated create input
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCreate {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

/// Validate a create request; every field is required.
pub fn validate_create(req: &CreateNoteRequest) -> Result<ValidCreate, Vec<Violation>> {
    let violations = Schema::note().validate([
        ("title", Some(req.title.as_str())),
        ("description", Some(req.description.as_str())),
        ("priority", Some(req.priority.as_str())),
    ]);
    if !violations.is_empty() {
        return Err(violations);
    }

    let priority = req.priority.parse::<Priority>().map_err(|_| {
        vec![Violation {
            field: "priority".into(),
            message: "invalid priority".into(),
        }]
    })?;

    Ok(ValidCreate {
        title: req.title.clone(),
        description: req.description.clone(),
        priority,
    })
}

/// Validate the fields supplied in an update request.
pub fn validate_update(req: &UpdateNoteRequest) -> Result<super::NotePatch, Vec<Violation>> {
    let violations = Schema::note().validate([
        ("title", req.title.as_deref()),
        ("description", req.description.as_deref()),
        ("priority", req.priority.as_deref()),
    ]);
    if !violations.is_empty() {
        return Err(violations);
    }

    let priority = req
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()
        .map_err(|_| {
            vec![Violation {
                field: "priority".into(),
                message: "invalid priority".into(),
            }]
        })?;

    Ok(super::NotePatch {
        title: req.title.clone(),
        description: req.description.clone(),
        priority,
    })
}
