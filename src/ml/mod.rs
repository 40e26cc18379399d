// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All Burn model and training code lives here.
//
//   model.rs      - two-encoder LSTM answer classifier
//                   plus categorical cross-entropy / accuracy
//
//   trainer.rs    - epoch loop with Adam, validation every
//                   epoch, checkpoints, final test evaluation
//
//   inferencer.rs - loads a checkpoint, vectorizes free text,
//                   returns the most probable answer word
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Hochreiter & Schmidhuber (1997) LSTM

/// Two-encoder LSTM model
pub mod model;

/// Training loop with validation, checkpointing and test evaluation
pub mod trainer;

/// Inference engine
pub mod inferencer;
