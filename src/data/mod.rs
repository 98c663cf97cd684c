//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  <city>.csv / .parquet / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → TripTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ TripTable │  Vec<Trip>, optional column set
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  month / weekday selection → filtered TripTable
//!   └──────────┘
//! ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
