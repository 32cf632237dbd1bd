pub mod entity {
    use std::hash::{Hash, Hasher};

    pub type Name = String;
    pub type Tag = String;

    pub const FEMALE: &str = "F";
    pub const SENIOR: &str = "senior";

    /// One person to be seated. Identity is the name: two records with the
    /// same name compare equal and hash alike regardless of their categories.
    #[derive(Debug, Clone)]
    pub struct Attendee {
        pub name: Name,
        pub gender: Tag,
        pub seniority: Tag,
        pub field: Tag,
        pub head_table_fixed: bool,
    }

    impl Attendee {
        pub fn new(
            name: impl Into<Name>,
            gender: impl Into<Tag>,
            seniority: impl Into<Tag>,
            field: impl Into<Tag>,
        ) -> Attendee {
            Attendee {
                name: name.into(),
                gender: gender.into(),
                seniority: seniority.into(),
                field: field.into(),
                head_table_fixed: false,
            }
        }

        pub fn at_head_table(mut self) -> Attendee {
            self.head_table_fixed = true;
            self
        }
    }

    impl PartialEq for Attendee {
        fn eq(&self, other: &Self) -> bool {
            self.name == other.name
        }
    }

    impl Eq for Attendee {}

    impl Hash for Attendee {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.name.hash(state);
        }
    }
}


pub mod seating {
    use std::collections::{BTreeSet, HashSet};

    use chrono::NaiveDateTime;
    use itertools::Itertools;
    use serde::{Deserialize, Serialize};

    use super::entity::{Attendee, Name};
    use crate::error::ValidationError;

    /// Unordered pair of attendee names.
    pub type PairKey = BTreeSet<Name>;

    pub fn pair_key(a: &str, b: &str) -> PairKey {
        BTreeSet::from([a.to_owned(), b.to_owned()])
    }

    /// Seat bounds shared by every table. The head table always takes
    /// `max_seats`; flexible tables take anything in `[min_seats, max_seats]`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TableConstraints {
        min_seats: usize,
        max_seats: usize,
    }

    impl TableConstraints {
        pub fn new(
            min_seats: usize,
            max_seats: usize,
        ) -> Result<TableConstraints, ValidationError> {
            if min_seats > max_seats {
                return Err(ValidationError::MinAboveMax { min_seats, max_seats });
            }
            if min_seats < 2 {
                return Err(ValidationError::MinTooSmall { min_seats });
            }
            Ok(TableConstraints { min_seats, max_seats })
        }

        pub fn min_seats(&self) -> usize {
            self.min_seats
        }

        pub fn max_seats(&self) -> usize {
            self.max_seats
        }

        pub fn admits(&self, size: usize) -> bool {
            (self.min_seats..=self.max_seats).contains(&size)
        }

        /// Smallest population that fills the head table and gives every
        /// other table its minimum.
        pub fn required_attendees(&self, num_tables: usize) -> usize {
            self.max_seats + self.min_seats * num_tables.saturating_sub(1)
        }

        /// Head table plus enough flexible tables to seat `population` at
        /// roughly `max_seats` each, rounding half up.
        pub fn suggested_table_count(&self, population: usize) -> usize {
            (2 * population + self.max_seats) / (2 * self.max_seats) + 1
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Table {
        pub members: Vec<Attendee>,
    }

    impl Table {
        pub fn len(&self) -> usize {
            self.members.len()
        }

        pub fn is_empty(&self) -> bool {
            self.members.is_empty()
        }

        pub fn contains(&self, name: &str) -> bool {
            self.members.iter().any(|member| member.name == name)
        }

        pub fn pairs(&self) -> impl Iterator<Item = (&Attendee, &Attendee)> + '_ {
            self.members.iter().tuple_combinations()
        }
    }

    impl From<Vec<Attendee>> for Table {
        fn from(members: Vec<Attendee>) -> Self {
            Table { members }
        }
    }

    /// Ordered tables; index 0 is the head table.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Arrangement {
        pub tables: Vec<Table>,
    }

    impl Arrangement {
        pub fn head(&self) -> Option<&Table> {
            self.tables.first()
        }

        pub fn flexible(&self) -> &[Table] {
            self.tables.get(1..).unwrap_or(&[])
        }

        pub fn sizes(&self) -> Vec<usize> {
            self.tables.iter().map(Table::len).collect()
        }

        pub fn seated(&self) -> usize {
            self.tables.iter().map(Table::len).sum()
        }

        pub fn attendees(&self) -> impl Iterator<Item = &Attendee> + '_ {
            self.tables.iter().flat_map(|table| table.members.iter())
        }

        pub fn co_seated_pairs(&self) -> HashSet<PairKey> {
            self.tables
                .iter()
                .flat_map(|table| table.pairs())
                .map(|(a, b)| pair_key(&a.name, &b.name))
                .collect()
        }
    }

    /// One occupied seat. Extra attendee fields in stored history (gender,
    /// seniority, field) are ignored on load.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Seat {
        pub name: Name,
        #[serde(default, rename = "assign_head_table", alias = "fixed")]
        pub fixed: bool,
    }

    /// A committed arrangement: who sat at which table, and when.
    ///
    /// Serialized as `{"date": "2024-09-01T10:30:00", "arrangement": [[...]]}`.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SeatingEvent {
        pub date: NaiveDateTime,
        #[serde(rename = "arrangement", alias = "tables")]
        pub tables: Vec<Vec<Seat>>,
    }

    impl SeatingEvent {
        /// Only head-table seats keep the attendee's fixed flag.
        pub fn from_arrangement(arrangement: &Arrangement, date: NaiveDateTime) -> SeatingEvent {
            let tables = arrangement
                .tables
                .iter()
                .enumerate()
                .map(|(table_index, table)| {
                    table
                        .members
                        .iter()
                        .map(|member| Seat {
                            name: member.name.clone(),
                            fixed: table_index == 0 && member.head_table_fixed,
                        })
                        .collect()
                })
                .collect();
            SeatingEvent { date, tables }
        }
    }
}

pub mod condition {
    use serde::{Deserialize, Serialize};

    use crate::error::ValidationError;

    pub type Score = f64;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct DiversityWeights {
        #[serde(default = "unit_weight")]
        pub gender: Score,
        #[serde(default = "unit_weight")]
        pub seniority: Score,
        #[serde(default = "unit_weight")]
        pub field: Score,
    }

    fn unit_weight() -> Score {
        1.0
    }

    impl Default for DiversityWeights {
        fn default() -> Self {
            DiversityWeights { gender: 1.0, seniority: 1.0, field: 1.0 }
        }
    }

    impl DiversityWeights {
        pub fn new(
            gender: Score,
            seniority: Score,
            field: Score,
        ) -> Result<DiversityWeights, ValidationError> {
            let weights = DiversityWeights { gender, seniority, field };
            weights.validate()?;
            Ok(weights)
        }

        pub fn validate(&self) -> Result<(), ValidationError> {
            let all = [self.gender, self.seniority, self.field];
            if all.iter().all(|w| w.is_finite() && *w >= 0.0) && self.total() > 0.0 {
                Ok(())
            } else {
                Err(ValidationError::Weights {
                    gender: self.gender,
                    seniority: self.seniority,
                    field: self.field,
                })
            }
        }

        pub fn total(&self) -> Score {
            self.gender + self.seniority + self.field
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::condition::DiversityWeights;
    use super::entity::Attendee;
    use super::seating::{pair_key, Arrangement, SeatingEvent, Table, TableConstraints};
    use crate::error::ValidationError;

    #[test]
    fn constraints_reject_min_above_max() {
        assert_eq!(
            TableConstraints::new(5, 4),
            Err(ValidationError::MinAboveMax { min_seats: 5, max_seats: 4 })
        );
    }

    #[test]
    fn constraints_reject_min_below_two() {
        assert_eq!(TableConstraints::new(1, 5), Err(ValidationError::MinTooSmall { min_seats: 1 }));
    }

    #[test]
    fn constraints_accept_equal_bounds() {
        let constraints = TableConstraints::new(2, 2).unwrap();
        assert_eq!(constraints.min_seats(), 2);
        assert_eq!(constraints.max_seats(), 2);
        assert!(constraints.admits(2));
        assert!(!constraints.admits(3));
    }

    #[test]
    fn required_attendees_counts_full_head_table() {
        let constraints = TableConstraints::new(4, 8).unwrap();
        assert_eq!(constraints.required_attendees(2), 12);
        assert_eq!(constraints.required_attendees(3), 16);
        assert_eq!(constraints.required_attendees(1), 8);
    }

    #[test]
    fn suggested_table_count_rounds_half_up() {
        let constraints = TableConstraints::new(4, 6).unwrap();
        assert_eq!(constraints.suggested_table_count(24), 5);
        assert_eq!(constraints.suggested_table_count(27), 6);
        assert_eq!(constraints.suggested_table_count(26), 5);
    }

    #[test]
    fn attendees_compare_by_name_only() {
        let a = Attendee::new("Ada", "F", "senior", "Physics");
        let b = Attendee::new("Ada", "M", "junior", "Biology").at_head_table();
        let set: HashSet<Attendee> = [a.clone(), b].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&a));
    }

    #[test]
    fn pair_key_is_unordered() {
        assert_eq!(pair_key("a", "b"), pair_key("b", "a"));
    }

    #[test]
    fn event_keeps_fixed_flag_only_at_head_table() {
        let pinned = Attendee::new("Ada", "F", "senior", "Physics").at_head_table();
        let stray = Attendee::new("Bo", "M", "junior", "Biology").at_head_table();
        let arrangement = Arrangement {
            tables: vec![
                Table::from(vec![pinned, Attendee::new("Cy", "M", "senior", "Math")]),
                Table::from(vec![stray, Attendee::new("Di", "F", "junior", "Math")]),
            ],
        };
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|day| day.and_hms_opt(18, 0, 0))
            .unwrap();
        let event = SeatingEvent::from_arrangement(&arrangement, date);
        assert!(event.tables[0][0].fixed);
        assert!(!event.tables[0][1].fixed);
        assert!(!event.tables[1][0].fixed);
        assert_eq!(arrangement.co_seated_pairs().len(), 2);
        assert_eq!(arrangement.flexible().len(), 1);
    }

    #[test]
    fn weights_must_be_positive_somewhere() {
        assert!(DiversityWeights::new(0.0, 0.0, 0.0).is_err());
        assert!(DiversityWeights::new(-1.0, 1.0, 1.0).is_err());
        assert!(DiversityWeights::new(f64::NAN, 1.0, 1.0).is_err());
        assert!(DiversityWeights::new(0.0, 0.0, 2.0).is_ok());
    }
}
