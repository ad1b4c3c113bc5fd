//! Persistence layer: storage for submitted screenings.

pub mod json_file;
pub mod traits;

pub use json_file::JsonFileStore;
pub use traits::CandidateStore;
