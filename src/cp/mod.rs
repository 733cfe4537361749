//! A small finite-domain constraint engine: bounded integer variables,
//! all-different constraints over affine views and a forward-checking search.

pub mod domain;
pub mod model;
pub mod search;

pub use model::{CpModel, IntVar, IntView};
pub use search::CpSearch;
