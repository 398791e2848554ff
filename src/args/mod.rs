//! Argument handling for ticalabash.
//!
//! ```text
//! Raw args → Partition (FlagTable) → testing-tool args + build args
//! ```
//!
//! The flag table is plain data built from the registry, so a new testing-tool
//! flag is one more `FlagDef` entry.

mod partition;
mod registry;

pub use partition::{partition, PartitionResult};
pub use registry::{
    extraction_table, flag_registry, FlagArity, FlagDef, FlagSpec, FlagTable, FlagTableError,
};
