//! `tabmatch-engine`: table unification and duplicate detection.
//!
//! Pure engine crate: receives row batches, returns a unified table, search
//! hits and duplicate groups. No file or format dependencies.

pub mod analysis;
pub mod batch;
pub mod cell;
pub mod config;
pub mod error;
pub mod filter;
pub mod group;
pub mod key;
pub mod normalize;
pub mod report;
pub mod table;
pub mod unify;

pub use analysis::{analyze, Analysis};
pub use batch::RowBatch;
pub use cell::CellValue;
pub use config::{MatchConfig, MatchProfile};
pub use error::EngineError;
pub use normalize::{normalize, NormalizeOptions};
pub use table::{Record, Table};
pub use unify::unify;
