//! N-Queens: the board, its encodings, the solver adapters and the driver
//! that enumerates placements through them.

pub mod adapter;
pub mod attack;
pub mod backtrack;
pub mod board;
pub mod decode;
pub mod driver;
pub mod encoding;
pub mod variables;

pub use adapter::{Assignment, Backend, EngineConfig, SolverAdapter, VariableSelectionType};
pub use board::{Board, Cell};
pub use decode::{Placement, decode};
pub use driver::{EnumerationDriver, EnumerationMode, EnumerationReport, solve_board};
pub use encoding::PairEncoding;
