//! Error types for the Bykilt protocol layer.

mod dispatch;
mod process;

pub use dispatch::*;
pub use process::*;
