use thiserror::Error;

use crate::model::entity::Attendee;
use crate::model::seating::{Table, TableConstraints};

/// One sampled pool cannot be split within the seat bounds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapacityError {
    #[error("Cannot create table with only {size} attendees (minimum is {min_seats})")]
    BelowMinimum { size: usize, min_seats: usize },
    #[error("Table size {size} exceeds maximum of {max_seats}")]
    AboveMaximum { size: usize, max_seats: usize },
    #[error("{remaining} attendees left over with no tables to seat them")]
    NoTables { remaining: usize },
}

/// Exact-remainder sizing: every table gets `pool / n`, and the first
/// `pool % n` tables get one more.
pub fn table_sizes(
    pool_size: usize,
    num_tables: usize,
    constraints: &TableConstraints,
) -> Result<Vec<usize>, CapacityError> {
    if num_tables == 0 {
        return match pool_size {
            0 => Ok(Vec::new()),
            remaining => Err(CapacityError::NoTables { remaining }),
        };
    }
    let base = pool_size / num_tables;
    let extra = pool_size % num_tables;
    if base < constraints.min_seats() {
        return Err(CapacityError::BelowMinimum {
            size: base,
            min_seats: constraints.min_seats(),
        });
    }
    let largest = if extra > 0 { base + 1 } else { base };
    if largest > constraints.max_seats() {
        return Err(CapacityError::AboveMaximum {
            size: largest,
            max_seats: constraints.max_seats(),
        });
    }
    Ok((0..num_tables).map(|index| if index < extra { base + 1 } else { base }).collect())
}

/// Splits `pool` in order into `num_tables` tables. Every attendee lands in
/// exactly one table; callers shuffle beforehand.
pub fn partition(
    pool: Vec<Attendee>,
    num_tables: usize,
    constraints: &TableConstraints,
) -> Result<Vec<Table>, CapacityError> {
    let sizes = table_sizes(pool.len(), num_tables, constraints)?;
    let mut pool = pool.into_iter();
    Ok(sizes
        .into_iter()
        .map(|size| Table::from(pool.by_ref().take(size).collect::<Vec<_>>()))
        .collect())
}
