use thiserror::Error;

use crate::model::entity::Name;

/// Malformed configuration values, rejected when they are constructed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Minimum seats ({min_seats}) cannot be greater than maximum seats ({max_seats})")]
    MinAboveMax { min_seats: usize, max_seats: usize },
    #[error("Minimum seats must be at least 2, got {min_seats}")]
    MinTooSmall { min_seats: usize },
    #[error(
        "Diversity weights must be finite, non-negative and not all zero \
         (gender {gender}, seniority {seniority}, field {field})"
    )]
    Weights { gender: f64, seniority: f64, field: f64 },
}

/// The requested seating cannot be satisfied by any arrangement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("At least one table (the head table) is required")]
    NoTables,
    #[error(
        "Need at least {required} attendees: {head_seats} for head table \
         and {min_seats} each for {other_tables} other tables"
    )]
    InsufficientAttendees {
        required: usize,
        head_seats: usize,
        min_seats: usize,
        other_tables: usize,
    },
    #[error("Too many head table assignments ({assigned}, maximum is {max_seats})")]
    HeadTableOverAssigned { assigned: usize, max_seats: usize },
    #[error("Head table assignment {0} is not among the attendees")]
    UnknownHeadAssignment(Name),
    #[error("Head table assignment {0} is listed more than once")]
    DuplicateHeadAssignment(Name),
    #[error("Only {available} attendees are free to fill {needed} open head table seats")]
    HeadTableUnderfilled { needed: usize, available: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SeatingError {
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
    #[error("Could not find valid seating arrangement in {iterations} iterations")]
    Infeasible { iterations: usize },
    /// A search that reported success produced a malformed head table.
    #[error("Internal error: head table has {actual} seats instead of required {expected}")]
    Internal { expected: usize, actual: usize },
}
