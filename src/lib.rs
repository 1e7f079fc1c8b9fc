// Library surface shared by the binary and the integration tests.
pub mod balance;
pub mod config;
pub mod corpus;
pub mod error;
pub mod frequency;
pub mod partition;
pub mod report;
pub mod search;

pub use balance::{evaluate, is_balanced, TrialResult};
pub use error::DraftError;
pub use frequency::{FrequencyTable, LetterStat};
pub use partition::{Group, Partitioner};
pub use search::{search, ChosenDraft, SearchConfig, SearchLoop, SearchOutcome, SearchState};
