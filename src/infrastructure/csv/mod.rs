// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing, encoding fallback, and column type inference

mod csv_parser;

pub use csv_parser::CsvParser;
