pub mod access_table;
pub mod basic_blocks;

pub use access_table::AccessTable;
pub use basic_blocks::{BasicBlock, BasicBlocks, BlockId};
