//! Output of solutions
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! └── export/             ← Data export
//!     ├── mod.rs          ← Exporter trait
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use deq_rs::Solution;
//! use deq_rs::output::{CsvExporter, Exporter};
//!
//! let solution = Solution::series(2.0, vec![1.0, 2.0, 4.0]);
//! let table = CsvExporter::default().render(&solution).unwrap();
//! assert!(table.starts_with("t,x\n"));
//! ```

pub mod export;

pub use export::{CsvConfig, CsvError, CsvExporter, CsvMetadata, Exporter};
