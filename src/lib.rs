mod accumulator;
pub mod blocks;
mod check;
mod io;
mod languages;
pub mod timing;
pub mod tree;

pub use accumulator::{DEFAULT_BOUND, closed_form, count};
pub use blocks::{BlockIndex, FunctionBlock, extract_all, extract_blocks};
pub use check::{Finding, unbounded_loops};
pub use io::CxxBlocksError;
pub use languages::{Language, language_for_path};
pub use tree::{AstNode, AstPrinter, Coordinate, LiteralValue, Location, NodeKind};
