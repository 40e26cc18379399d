// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Pure Rust structs and traits describing the bAbI task:
// stories, questions, answers and the sources they come from.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Everything in here can be unit tested without a GPU
// and without the dataset on disk.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Sentences and parsed question records
pub mod story;

// The 20 bAbI tasks and their archive member paths
pub mod task;

// Core abstractions (traits) that other layers implement
pub mod traits;
