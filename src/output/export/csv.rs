//! CSV export of solutions
//!
//! Output is readable by spreadsheets, pandas and most plotting tools.
//!
//! # Features
//!
//! - **Metadata support**: optional `#` comment header with solver diagnostics
//! - **Customizable**: delimiter, decimal separator, precision, headers
//! - **Validation**: refuses NaN/Inf cells and inconsistent dimensions
//!
//! # Examples
//!
//! ## ODE
//!
//! ```csv
//! t,x
//! 0.000000,1.000000
//! 1.000000,2.000000
//! 2.000000,4.000000
//! ```
//!
//! ## PDE
//!
//! The first row holds the space coordinates, the first column the time
//! coordinates:
//!
//! ```csv
//! t \ x,0.000000,0.500000,1.000000
//! 0.000000,0.000000,1.000000,0.000000
//! 0.500000,0.000000,0.500000,0.000000
//! ```
//!
//! ## With Metadata
//!
//! ```csv
//! # Differential Equation Solution
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Equation: heat_equation
//! # Solver: Heat equation (explicit FTCS)
//! # Time Period: 0.1
//! # Time Samples: 161
//! # Space Samples: 21
//! # dt: 0.000625
//! #
//! t \ x,0.000000,...
//! ```

use std::io::{self, Write};

use thiserror::Error;

use crate::equation::{EquationFamily, Solution, SolutionValues};
use crate::output::export::Exporter;

// =============================================================================
// Errors
// =============================================================================

/// CSV export failure
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The solution holds no samples
    #[error("empty solution: nothing to export")]
    Empty,

    /// `dimensions` does not match the value layout
    #[error("solution has {got} dimensions, expected {expected}")]
    Dimensions { expected: usize, got: usize },

    /// A cell holds NaN or Inf
    #[error("invalid data: non-finite value at time sample {row}, column {column}")]
    NonFinite { row: usize, column: usize },
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use deq_rs::output::export::CsvConfig;
///
/// let config = CsvConfig::european().precision(10);
/// assert_eq!(config.delimiter, ';');
/// assert_eq!(config.precision, 10);
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Header of the time column (default: "t")
    pub time_header: String,

    /// Header of the value column of ODE tables (default: "x")
    pub value_header: String,

    /// Top-left cell of PDE tables (default: "t \ x")
    pub corner_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            time_header: "t".to_string(),
            value_header: "x".to_string(),
            corner_header: "t \\ x".to_string(),
        }
    }
}

impl CsvConfig {
    /// Semicolon delimiter, comma decimal separator
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// 12 decimal places
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Enable the comment header
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only fields that are set end up in the header.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Family tag, e.g. `heat_equation`
    pub equation: Option<EquationFamily>,

    pub solver_name: Option<String>,

    pub time_period: Option<f64>,

    pub time_samples: Option<usize>,

    pub space_samples: Option<usize>,

    /// Additional key/value lines, written in order
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Collect what the solution knows about itself.
    ///
    /// Solver diagnostics (`dt`, `dx`, `r`) become sorted custom entries.
    pub fn from_solution(family: EquationFamily, solution: &Solution) -> Self {
        let mut custom: Vec<(String, String)> = solution
            .metadata
            .iter()
            .filter(|(key, _)| key.as_str() != "solver")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        custom.sort();

        Self {
            equation: Some(family),
            solver_name: solution.get_metadata("solver").map(str::to_string),
            time_period: solution.dimensions.first().map(|(_, end)| *end),
            time_samples: Some(solution.time_samples()),
            space_samples: solution.space_samples(),
            custom,
        }
    }

    pub fn add_custom(&mut self, key: &str, value: &str) {
        self.custom.push((key.to_string(), value.to_string()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header(writer: &mut dyn Write, metadata: &CsvMetadata) -> io::Result<()> {
    writeln!(writer, "# Differential Equation Solution")?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(equation) = &metadata.equation {
        writeln!(writer, "# Equation: {}", equation)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(writer, "# Solver: {}", solver)?;
    }
    if let Some(time_period) = metadata.time_period {
        writeln!(writer, "# Time Period: {}", time_period)?;
    }
    if let Some(time_samples) = metadata.time_samples {
        writeln!(writer, "# Time Samples: {}", time_samples)?;
    }
    if let Some(space_samples) = metadata.space_samples {
        writeln!(writer, "# Space Samples: {}", space_samples)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(writer, "# {}: {}", key, value)?;
    }

    writeln!(writer, "#")
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

// =============================================================================
// Exporter
// =============================================================================

/// Writes solutions as CSV tables
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    fn validate(solution: &Solution) -> Result<(), CsvError> {
        let expected = match &solution.values {
            SolutionValues::Series(_) => 1,
            SolutionValues::Grid(_) => 2,
        };
        if solution.dimensions.len() != expected {
            return Err(CsvError::Dimensions {
                expected,
                got: solution.dimensions.len(),
            });
        }

        if solution.time_samples() == 0 || solution.space_samples() == Some(0) {
            return Err(CsvError::Empty);
        }

        match &solution.values {
            SolutionValues::Series(values) => {
                if let Some(row) = values.iter().position(|value| !value.is_finite()) {
                    return Err(CsvError::NonFinite { row, column: 0 });
                }
            }
            SolutionValues::Grid(values) => {
                for row in 0..values.nrows() {
                    if let Some(column) = values.row(row).iter().position(|value| !value.is_finite()) {
                        return Err(CsvError::NonFinite { row, column });
                    }
                }
            }
        }

        Ok(())
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn write(&self, solution: &Solution, writer: &mut dyn Write) -> Result<(), CsvError> {
        Self::validate(solution)?;
        let config = &self.config;
        let delimiter = config.delimiter;

        if config.include_metadata
            && let Some(metadata) = &config.metadata
        {
            write_metadata_header(writer, metadata)?;
        }

        let times = solution.axis(0).unwrap_or_default();

        match &solution.values {
            SolutionValues::Series(values) => {
                writeln!(writer, "{}{}{}", config.time_header, delimiter, config.value_header)?;
                for (t, value) in times.iter().zip(values.iter()) {
                    writeln!(
                        writer,
                        "{}{}{}",
                        format_number(*t, config),
                        delimiter,
                        format_number(*value, config)
                    )?;
                }
            }
            SolutionValues::Grid(values) => {
                let positions = solution.axis(1).unwrap_or_default();

                write!(writer, "{}", config.corner_header)?;
                for x in &positions {
                    write!(writer, "{}{}", delimiter, format_number(*x, config))?;
                }
                writeln!(writer)?;

                for (k, t) in times.iter().enumerate() {
                    write!(writer, "{}", format_number(*t, config))?;
                    for value in values.row(k).iter() {
                        write!(writer, "{}{}", delimiter, format_number(*value, config))?;
                    }
                    writeln!(writer)?;
                }
            }
        }

        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    fn ode() -> Solution {
        Solution::series(2.0, vec![1.0, 2.0, 4.0])
    }

    fn pde() -> Solution {
        Solution::grid(1.0, 1.0, 3, 3, &[0.0, 1.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.25, 0.0])
    }

    #[test]
    fn test_ode_table() {
        let text = CsvExporter::default().render(&ode()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["t,x", "0.000000,1.000000", "1.000000,2.000000", "2.000000,4.000000"]);
    }

    #[test]
    fn test_pde_table_shape() {
        let text = CsvExporter::default().render(&pde()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "t \\ x,0.000000,0.500000,1.000000");
        assert_eq!(lines[2], "0.500000,0.000000,0.500000,0.000000");
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), 4);
        }
    }

    #[test]
    fn test_european_format() {
        let exporter = CsvExporter::new(CsvConfig::european().precision(2));
        let text = exporter.render(&ode()).unwrap();
        assert!(text.lines().any(|line| line == "1,00;2,00"));
    }

    #[test]
    fn test_metadata_header() {
        let solution = {
            let mut solution = ode();
            solution.add_metadata("solver", "Euler");
            solution.add_metadata("dt", "1");
            solution
        };
        let metadata = CsvMetadata::from_solution(EquationFamily::FirstOrderOde, &solution);
        let exporter = CsvExporter::new(CsvConfig::default().with_metadata(metadata));
        let text = exporter.render(&solution).unwrap();

        assert!(text.starts_with("# Differential Equation Solution\n"));
        assert!(text.contains("# Generated: "));
        assert!(text.contains("# Equation: first_order_ode\n"));
        assert!(text.contains("# Solver: Euler\n"));
        assert!(text.contains("# Time Samples: 3\n"));
        assert!(text.contains("# dt: 1\n"));
        assert!(!text.contains("# Space Samples"));
    }

    #[test]
    fn test_rejects_non_finite() {
        let solution = Solution::grid(1.0, 1.0, 2, 2, &[0.0, 1.0, f64::NAN, 0.0]);
        let result = CsvExporter::default().render(&solution);
        assert!(matches!(result, Err(CsvError::NonFinite { row: 1, column: 0 })));
    }

    #[test]
    fn test_rejects_inconsistent_dimensions() {
        let mut solution = ode();
        solution.dimensions.push((0.0, 1.0));
        let result = CsvExporter::default().render(&solution);
        assert!(matches!(result, Err(CsvError::Dimensions { expected: 1, got: 2 })));
    }

    #[test]
    fn test_rejects_empty() {
        let solution = Solution::series(1.0, Vec::new());
        assert!(matches!(CsvExporter::default().render(&solution), Err(CsvError::Empty)));
    }

    #[test]
    fn test_export_to_file() {
        let file = NamedTempFile::new().unwrap();
        CsvExporter::default().export(&pde(), file.path()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.lines().count(), 4);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(matches!(CsvExporter::default().export(&ode(), path), Err(CsvError::Io(_))));
    }
}
