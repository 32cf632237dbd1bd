use std::collections::HashSet;

use itertools::Itertools;

use crate::memory::PairingMemory;
use crate::model::condition::{DiversityWeights, Score};
use crate::model::entity::{Attendee, FEMALE, SENIOR};
use crate::model::seating::{Arrangement, Table, TableConstraints};

pub const DIVERSITY_SHARE: Score = 0.60;
pub const RECENCY_SHARE: Score = 0.25;
pub const BALANCE_SHARE: Score = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCard {
    pub diversity: Score,
    pub recency: Score,
    pub balance: Score,
    pub composite: Score,
}

impl Table {
    fn fraction(&self, predicate: impl Fn(&Attendee) -> bool) -> Score {
        let matching = self.members.iter().filter(|member| predicate(*member)).count();
        matching as Score / self.len() as Score
    }

    /// Categorical balance of one table in `[0, 1]`, or `0.0` below the
    /// minimum table size.
    pub fn diversity(&self, weights: &DiversityWeights, constraints: &TableConstraints) -> Score {
        if self.is_empty() || self.len() < constraints.min_seats() {
            return 0.0;
        }
        let gender = 1.0 - (0.5 - self.fraction(|a| a.gender == FEMALE)).abs();
        let seniority = 1.0 - (0.5 - self.fraction(|a| a.seniority == SENIOR)).abs();
        let fields: HashSet<&str> = self.members.iter().map(|a| a.field.as_str()).collect();
        let field = fields.len() as Score / self.len() as Score;

        (gender * weights.gender + seniority * weights.seniority + field * weights.field)
            / weights.total()
    }
}

/// `1 - sum(|size_i - size_j|) / (tables * max_seats)` over all pairs of
/// flexible tables, floored at zero.
pub fn size_balance(flexible: &[Table], constraints: &TableConstraints) -> Score {
    if flexible.len() < 2 {
        return 1.0;
    }
    let spread: usize = flexible
        .iter()
        .map(Table::len)
        .tuple_combinations()
        .map(|(a, b)| a.abs_diff(b))
        .sum();
    let capacity = (flexible.len() * constraints.max_seats()) as Score;
    (1.0 - spread as Score / capacity).max(0.0)
}

impl Arrangement {
    pub fn evaluate(
        &self,
        memory: &PairingMemory,
        weights: &DiversityWeights,
        constraints: &TableConstraints,
    ) -> ScoreCard {
        let n_tables = self.tables.len().max(1) as Score;
        let diversity =
            self.tables.iter().map(|t| t.diversity(weights, constraints)).sum::<Score>() / n_tables;
        let recency =
            self.tables.iter().map(|t| memory.penalty(t, constraints)).sum::<Score>() / n_tables;
        let balance = size_balance(self.flexible(), constraints);
        ScoreCard {
            diversity,
            recency,
            balance,
            composite: DIVERSITY_SHARE * diversity
                + RECENCY_SHARE * recency
                + BALANCE_SHARE * balance,
        }
    }
}
