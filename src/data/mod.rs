/// Data layer: core types, loading, filtering, aggregation, and export.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalesDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ SalesDataset │  Vec<SalesRecord>, value indices, date span
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSelection → filtered indices
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌──────────┐
///   │ aggregate  │  │  export   │  KPIs + group sums / CSV + XLSX buffers
///   └───────────┘  └──────────┘
/// ```
///
/// Everything in this module is a pure transform over immutable snapshots;
/// the UI layer re-invokes it per interaction.

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
