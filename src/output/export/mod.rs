//! Export of solutions to tabular files
//!
//! # Architecture
//!
//! The [`Exporter`] trait abstracts the file format. Each format lives in
//! its own sub-module with its own error type.
//!
//! | Format  | Module      |
//! |---------|-------------|
//! | CSV     | [`csv`]     |
//!
//! # Table layout
//!
//! Row and column headers are the sample coordinates derived from
//! [`Solution::dimensions`](crate::equation::Solution::dimensions); the value
//! cells match the solution's shape exactly.
//!
//! - ODE: two columns, `t` and `x`, one row per time sample.
//! - PDE: a header row of space coordinates, then one row per time sample
//!   starting with its time coordinate.
//!
//! # Usage example
//!
//! ```rust,no_run
//! use deq_rs::output::export::{CsvExporter, Exporter};
//! # fn demo(solution: &deq_rs::Solution) -> Result<(), deq_rs::output::export::CsvError> {
//! let exporter = CsvExporter::default();
//! exporter.export(solution, "heat.csv")?;
//! # Ok(())
//! # }
//! ```

pub mod csv;

pub use csv::{CsvConfig, CsvError, CsvExporter, CsvMetadata};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::equation::Solution;

/// Abstraction trait for all export formats.
///
/// Implementors only provide [`write`](Exporter::write); file handling is
/// shared.
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error + From<std::io::Error>;

    /// Write `solution` to `writer`.
    fn write(&self, solution: &Solution, writer: &mut dyn Write) -> Result<(), Self::Error>;

    /// Create (or truncate) the file at `path` and write `solution` into it.
    fn export(&self, solution: &Solution, path: impl AsRef<Path>) -> Result<(), Self::Error>
    where
        Self: Sized,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(solution, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Render `solution` into a string.
    fn render(&self, solution: &Solution) -> Result<String, Self::Error>
    where
        Self: Sized,
    {
        let mut buffer = Vec::new();
        self.write(solution, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
