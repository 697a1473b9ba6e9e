//! Divide-and-conquer epicenter estimation

pub mod triangulation;
pub mod partition;
pub mod combiner;
pub mod locator;

pub use combiner::combine_estimates;
pub use locator::{LeafReason, Locator, NodeKind, PartitionNode};
pub use partition::{partition_stations, Partition, PartitionBucket};
pub use triangulation::Triangulator;
