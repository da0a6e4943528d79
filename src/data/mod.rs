/// Data layer: core types, parsing, filtering, and export.
///
/// Architecture:
/// ```text
///  raw export text (.csv)
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  text + AcquisitionMode → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   Dataset     │  one typed variant per acquisition mode
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  filter   │      │  export   │  vendor CSV / JSON
///   └──────────┘      └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod model;
pub mod parser;
