mod csv_out;
mod json;
mod minimal;
mod table;

use clap::ValueEnum;
use serde_json::Value;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Full envelope, pretty-printed
    #[default]
    Json,
    /// Field/value or row tables
    Table,
    /// Rows for arrays and curves, field/value pairs otherwise
    Csv,
    /// Headline figure only
    Minimal,
}

impl OutputFormat {
    pub fn render(self, value: &Value) {
        let print: fn(&Value) = match self {
            OutputFormat::Json => json::print_json,
            OutputFormat::Table => table::print_table,
            OutputFormat::Csv => csv_out::print_csv,
            OutputFormat::Minimal => minimal::print_minimal,
        };
        print(value);
    }
}
