//! Concurrent well decoding
//!
//! This module runs the per-well decode tasks:
//! - The pluggable symbol decoding backend and its per-attempt parameters
//! - The multi-scale retry task for one well
//! - The run-scoped registry that deduplicates messages
//! - The worker pool that executes tasks and contains decoder faults
//! - Runtime configuration

/// Runtime settings and environment overrides
pub mod config;
/// Dedicated rayon pool with per-task fault isolation
pub mod pool;
/// First-writer-wins message registry
pub mod registry;
/// Symbol decoding backend interface
pub mod symbol;
/// Multi-scale decode task for a single well
pub mod well_decoder;

pub use config::DecoderConfig;
pub use pool::WorkerPool;
pub use registry::{BarcodeRegistry, Registration, RegistryEntries};
pub use symbol::{DecodedSymbol, ScanParams, SymbolDecoder};
pub use well_decoder::{DecodeContext, DecodeOutcome, WellDecoder, WellResult};
