/// Data layer: core types, ingestion, profiling, analysis and export.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → raw cells
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  infer    │  tag each column Numeric / Boolean / Datetime / Text
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  ordered, equally long columns (immutable)
///   └──────────┘
///     │      │       │
///     ▼      ▼       ▼
///  profile  analyze  export
///  stats,   univariate, bivariate,   CSV bytes for download
///  missing  correlation (+ density)
/// ```

pub mod analyze;
pub mod density;
pub mod export;
pub mod infer;
pub mod loader;
pub mod model;
pub mod profile;
pub mod selection;
