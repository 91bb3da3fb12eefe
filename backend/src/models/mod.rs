//! Domain types shared by the feature deriver, classifiers and the HTTP layer.

pub mod labels;
pub mod macros;
pub mod temporal;

pub use labels::*;
pub use temporal::*;
