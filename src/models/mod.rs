//! Core data models for the match ledger.

mod achievement;
mod campaign;
mod duel;
mod goal;
mod ids;
mod match_record;
mod morale;
mod player;
mod records;
mod table;

pub use achievement::*;
pub use campaign::*;
pub use duel::*;
pub use goal::*;
pub use ids::*;
pub use match_record::*;
pub use morale::*;
pub use player::*;
pub use records::*;
pub use table::*;
