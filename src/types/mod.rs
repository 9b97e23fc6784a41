//! Data types for the grid.

mod column;
mod config;
mod data_source;
mod filter;
mod row;
mod sort;
mod state;

pub use column::*;
pub use config::*;
pub use data_source::*;
pub use filter::*;
pub use row::*;
pub use sort::*;
pub use state::*;
