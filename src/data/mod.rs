/// Data layer: core types, parsing, calibration and export.
///
/// Architecture:
/// ```text
///   XPS text export (.txt)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  Region sections → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ calibration  │  reference peak → CalibrationOffset
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ revision  │  energy - delta, per category
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  result units + summary files
///   └──────────┘
/// ```

pub mod calibration;
pub mod export;
pub mod loader;
pub mod model;
pub mod revision;
