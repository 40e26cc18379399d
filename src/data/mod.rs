// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from the bAbI tarball to tensor batches.
//
//   babi_tasks_1-20_v1-2.tar.gz
//       │
//       ▼
//   archive        → downloads once, reads one task member
//       │
//       ▼
//   parser         → numbered lines → StoryQuery records
//       │             (uses tokenizer on every sentence)
//       ▼
//   vectorizer     → vocabulary + max lengths, padded ids, one-hot
//       │
//       ▼
//   splitter       → seeded train / validation split
//       │
//       ▼
//   QaDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   StoryBatcher   → stacks samples into tensor batches
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Downloads and reads the bAbI tarball
pub mod archive;

/// Regex word / punctuation tokenizer
pub mod tokenizer;

/// Numbered bAbI lines → StoryQuery records
pub mod parser;

/// Sorted word ↔ index mapping with a reserved padding slot
pub mod vocab;

/// Padded index sequences and one-hot answers
pub mod vectorizer;

/// Implements Burn's Dataset trait for vectorized samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded train/validation split
pub mod splitter;
