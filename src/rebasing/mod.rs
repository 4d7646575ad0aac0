// Rebasing entrypoint
pub mod neighbors;     // per-snapshot adjacency between pairs
pub mod paths;         // bounded, cycle-free path search toward the reference asset
pub mod composer;      // shallow/deep rate conversion along paths
pub mod orchestrator;  // parallel fan-out over every pair of a market
pub mod error;

pub use composer::{deep_rebase, shallow_rebase, DeepRebase};
pub use error::{RebaseError, RebaseResult};
pub use neighbors::{NeighborIndex, Neighbors};
pub use orchestrator::{rebase_market, RebaseOrchestrator, RebaseOutcome, RebaseStatus};
pub use paths::{find_paths, Direction, Path, RebasePaths};
