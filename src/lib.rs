//! Seats a recurring population at one fixed-size head table and several
//! flexible tables, favouring mixed tables and people who have not sat
//! together recently.
//!
//! The search draws many independent random arrangements and keeps the best
//! by a composite of diversity, pairing freshness and table-size balance.

pub mod config;
pub mod error;
pub mod history;
pub mod memory;
pub mod model;
pub mod optimize;
pub mod partition;
pub mod score;

pub use config::{ConfigError, PlannerConfig};
pub use error::{ConstraintError, SeatingError, ValidationError};
pub use history::{HistoryError, SeatingHistory};
pub use memory::PairingMemory;
pub use model::condition::{DiversityWeights, Score};
pub use model::entity::Attendee;
pub use model::seating::{Arrangement, Seat, SeatingEvent, Table, TableConstraints};
pub use optimize::{Params, SearchOutcome, SeatingOptimizer, SeatingRequest};
pub use partition::CapacityError;
pub use score::ScoreCard;
