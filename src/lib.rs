//! Planning-poker vote tally and the page glue around it: snapshot providers,
//! panel lifecycle, estimate push to an issue tracker, and table sorting.

pub mod config;
pub mod db;
pub mod error;
pub mod issue;
pub mod models;
pub mod panel;
pub mod table;
pub mod tasks;
pub mod voting;

pub use error::{AppError, Result};
pub use models::{TallyResult, VoteEntry};
pub use voting::tally;
