pub mod catalog;
pub mod dataset;
pub mod program;
pub mod sede;

pub use catalog::*;
pub use dataset::*;
pub use program::*;
pub use sede::*;
