use std::collections::HashSet;
use std::iter;

use rand::prelude::SliceRandom;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::{ConstraintError, SeatingError, ValidationError};
use crate::history::SeatingHistory;
use crate::model::condition::DiversityWeights;
use crate::model::entity::Attendee;
use crate::model::seating::{Arrangement, Table, TableConstraints};
use crate::partition::partition;
use crate::score::ScoreCard;

pub const DEFAULT_ITERATIONS: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub iterations: usize,
    pub weights: DiversityWeights,
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Params { iterations: DEFAULT_ITERATIONS, weights: DiversityWeights::default(), seed: None }
    }
}

/// What to seat: the population, the table count including the head table,
/// and optionally who must sit at the head table instead of the flagged
/// attendees.
#[derive(Debug, Clone, Copy)]
pub struct SeatingRequest<'a> {
    pub attendees: &'a [Attendee],
    pub num_tables: usize,
    pub head_table: Option<&'a [Attendee]>,
}

impl<'a> SeatingRequest<'a> {
    pub fn new(attendees: &'a [Attendee], num_tables: usize) -> SeatingRequest<'a> {
        SeatingRequest { attendees, num_tables, head_table: None }
    }

    pub fn with_head_table(mut self, head_table: &'a [Attendee]) -> SeatingRequest<'a> {
        self.head_table = Some(head_table);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub arrangement: Arrangement,
    pub score: ScoreCard,
    /// Iteration at which the returned arrangement was sampled.
    pub found_at: usize,
    pub feasible: usize,
    pub skipped: usize,
}

struct State {
    best: Option<(Arrangement, ScoreCard, usize)>,
    feasible: usize,
    skipped: usize,
}

impl State {
    fn offer(&mut self, arrangement: Arrangement, score: ScoreCard, iteration: usize) {
        self.feasible += 1;
        let improves = self
            .best
            .as_ref()
            .map_or(true, |(_, best, _)| score.composite > best.composite);
        if improves {
            debug!(iteration, composite = score.composite, "New best arrangement");
            self.best = Some((arrangement, score, iteration));
        }
    }
}

/// The validated split of a request: who is pinned to the head table, who
/// may be drawn to fill it, and who can only go to a flexible table.
struct HeadTableSampler {
    fixed: Vec<Attendee>,
    candidates: Vec<Attendee>,
    elsewhere: Vec<Attendee>,
    open_seats: usize,
}

impl HeadTableSampler {
    /// Draws the open head seats uniformly without replacement and returns
    /// the head table with the shuffled remainder.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (Table, Vec<Attendee>) {
        let mut pool = self.candidates.clone();
        pool.shuffle(rng);
        let rest = pool.split_off(self.open_seats);
        let head = Table::from(self.fixed.iter().cloned().chain(pool).collect::<Vec<_>>());
        let mut remaining: Vec<Attendee> =
            rest.into_iter().chain(self.elsewhere.iter().cloned()).collect();
        remaining.shuffle(rng);
        (head, remaining)
    }
}

pub struct SeatingOptimizer {
    constraints: TableConstraints,
    params: Params,
}

impl SeatingOptimizer {
    pub fn new(
        constraints: TableConstraints,
        params: Params,
    ) -> Result<SeatingOptimizer, ValidationError> {
        params.weights.validate()?;
        Ok(SeatingOptimizer { constraints, params })
    }

    pub fn constraints(&self) -> &TableConstraints {
        &self.constraints
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Seeds from `params.seed` when set, otherwise from entropy.
    pub fn optimize(
        &self,
        request: &SeatingRequest<'_>,
        history: &SeatingHistory,
    ) -> Result<SearchOutcome, SeatingError> {
        let mut rng = match self.params.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        self.optimize_with_rng(request, history, &mut rng)
    }

    /// Samples `params.iterations` independent arrangements and keeps the
    /// first one with the highest composite score. Samples whose flexible
    /// tables cannot respect the seat bounds are skipped.
    pub fn optimize_with_rng<R: Rng + ?Sized>(
        &self,
        request: &SeatingRequest<'_>,
        history: &SeatingHistory,
        rng: &mut R,
    ) -> Result<SearchOutcome, SeatingError> {
        let sampler = self.validate(request)?;
        let memory = history.pairing_memory();
        let other_tables = request.num_tables - 1;
        let mut state = State { best: None, feasible: 0, skipped: 0 };

        for iteration in 0..self.params.iterations {
            let (head, remaining) = sampler.sample(rng);
            let flexible = match partition(remaining, other_tables, &self.constraints) {
                Ok(tables) => tables,
                Err(err) => {
                    debug!(iteration, %err, "Skipping infeasible sample");
                    state.skipped += 1;
                    continue;
                }
            };
            let arrangement = Arrangement { tables: iter::once(head).chain(flexible).collect() };
            let score = arrangement.evaluate(&memory, &self.params.weights, &self.constraints);
            state.offer(arrangement, score, iteration);
        }

        let (arrangement, score, found_at) = state.best.ok_or(SeatingError::Infeasible {
            iterations: self.params.iterations,
        })?;
        let head_size = arrangement.head().map_or(0, Table::len);
        if head_size != self.constraints.max_seats() {
            return Err(SeatingError::Internal {
                expected: self.constraints.max_seats(),
                actual: head_size,
            });
        }
        info!(
            iterations = self.params.iterations,
            feasible = state.feasible,
            skipped = state.skipped,
            composite = score.composite,
            found_at,
            "Seating search finished"
        );
        Ok(SearchOutcome {
            arrangement,
            score,
            found_at,
            feasible: state.feasible,
            skipped: state.skipped,
        })
    }

    fn validate(&self, request: &SeatingRequest<'_>) -> Result<HeadTableSampler, ConstraintError> {
        let max_seats = self.constraints.max_seats();
        if request.num_tables == 0 {
            return Err(ConstraintError::NoTables);
        }
        let required = self.constraints.required_attendees(request.num_tables);
        if request.attendees.len() < required {
            return Err(ConstraintError::InsufficientAttendees {
                required,
                head_seats: max_seats,
                min_seats: self.constraints.min_seats(),
                other_tables: request.num_tables - 1,
            });
        }

        let fixed: Vec<Attendee> = match request.head_table {
            Some(assigned) => {
                let mut listed: HashSet<&str> = HashSet::new();
                assigned
                    .iter()
                    .map(|wanted| {
                        if !listed.insert(wanted.name.as_str()) {
                            return Err(ConstraintError::DuplicateHeadAssignment(
                                wanted.name.clone(),
                            ));
                        }
                        request
                            .attendees
                            .iter()
                            .find(|a| *a == wanted)
                            .cloned()
                            .ok_or_else(|| {
                                ConstraintError::UnknownHeadAssignment(wanted.name.clone())
                            })
                    })
                    .collect::<Result<_, _>>()?
            }
            None => request.attendees.iter().filter(|a| a.head_table_fixed).cloned().collect(),
        };
        if fixed.len() > max_seats {
            return Err(ConstraintError::HeadTableOverAssigned {
                assigned: fixed.len(),
                max_seats,
            });
        }

        let pinned: HashSet<&str> = fixed.iter().map(|a| a.name.as_str()).collect();
        let (candidates, elsewhere): (Vec<Attendee>, Vec<Attendee>) = request
            .attendees
            .iter()
            .filter(|a| !pinned.contains(a.name.as_str()))
            .cloned()
            .partition(|a| !a.head_table_fixed);
        if !elsewhere.is_empty() {
            warn!(
                unlisted = elsewhere.len(),
                "Flagged attendees missing from the head table list go to other tables"
            );
        }
        let open_seats = max_seats - fixed.len();
        if candidates.len() < open_seats {
            return Err(ConstraintError::HeadTableUnderfilled {
                needed: open_seats,
                available: candidates.len(),
            });
        }
        Ok(HeadTableSampler { fixed, candidates, elsewhere, open_seats })
    }
}
