// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by training and inference:
//
//   checkpoint.rs       - model weights via Burn's CompactRecorder,
//                         latest-epoch pointer, TrainConfig JSON
//
//   vectorizer_store.rs - vocabulary + max lengths as JSON, so
//                         `ask` encodes text exactly like training
//
//   metrics.rs          - per-epoch loss / accuracy CSV
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Vectorizer persistence
pub mod vectorizer_store;

/// Training metrics CSV logger
pub mod metrics;
