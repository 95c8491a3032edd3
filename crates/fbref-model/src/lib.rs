pub mod dataset;
pub mod table;
pub mod team;

pub use dataset::*;
pub use table::*;
pub use team::*;
