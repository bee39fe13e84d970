//! Tabular export of sampled colors

pub mod csv;

pub use self::csv::CsvExporter;
