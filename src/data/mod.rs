/// Data layer: core types, loading, and the filtering engine.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CaseDataset (load once, cached by path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  normalize    │  cell → labels
///   │  options      │  column → sorted option set
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  service      │  helsetjeneste keyword toggles
///   │  filter       │  selection + ANY/ALL → mask, counts
///   │  compose      │  AND (cascade) / OR (union of masks)
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resolve   │  (row, column) in final view → full row
///   └──────────┘
/// ```

pub mod compose;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod options;
pub mod pipeline;
pub mod resolve;
pub mod service;
