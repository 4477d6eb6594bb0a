//! Infrastructure layer - indexer and datum decoder collaborators

pub mod datum;
pub mod indexer;
pub mod snapshot;

pub use datum::{DatumDecoder, JsonDatumDecoder};
pub use indexer::{AddressHolding, AssetMetadata, ChainIndexer, Utxo};
pub use snapshot::{Snapshot, SnapshotIndexer};
