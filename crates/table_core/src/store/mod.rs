//! Persistence and roster collaborators.
//!
//! The engine only sees the `MatchRepository` and `RosterProvider` traits.

pub mod error;
pub mod format;
pub mod repository;
pub mod roster;

pub use error::RepositoryError;
pub use format::{decompress_and_deserialize, serialize_and_compress};
pub use repository::{FileRepository, InMemoryRepository, MatchRepository, StoredMatchInfo};
pub use roster::{RosterError, RosterProvider, StaticRosterProvider};
