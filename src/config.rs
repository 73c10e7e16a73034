use crate::error::{ReportError, Result};
use crate::pipeline::SourceFormats;
use crate::util::NumberFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecimalArg {
    /// `1.234,5`
    Comma,
    /// `1,234.5`
    Dot,
}

impl From<DecimalArg> for NumberFormat {
    fn from(d: DecimalArg) -> Self {
        match d {
            DecimalArg::Comma => NumberFormat::DecimalComma,
            DecimalArg::Dot => NumberFormat::DecimalPoint,
        }
    }
}

/// Productivity (STD, hours per unit of output) reports for painting and
/// scaffolding work orders.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Paint consumption export
    #[arg(long)]
    pub painting: Option<PathBuf>,

    /// Scaffold assembly export
    #[arg(long)]
    pub scaffolding: Option<PathBuf>,

    /// Hour log for painting crews
    #[arg(long)]
    pub painting_hours: Option<PathBuf>,

    /// Hour log for scaffolding crews
    #[arg(long)]
    pub scaffold_hours: Option<PathBuf>,

    /// Field delimiter of every source file
    #[arg(long, default_value_t = ';')]
    pub delimiter: char,

    /// Decimal convention of numeric cells
    #[arg(long, value_enum, default_value_t = DecimalArg::Comma)]
    pub decimal: DecimalArg,

    /// Directory the report files are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Rows shown per table in the console preview
    #[arg(long, default_value_t = 5)]
    pub preview: usize,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Load and generate once, without the menu
    #[arg(long, default_value = "false")]
    pub batch: bool,
}

impl Args {
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ReportError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }

    pub fn formats(&self) -> SourceFormats {
        SourceFormats::uniform(self.decimal.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["field_std"]);
        assert_eq!(args.delimiter_byte().unwrap(), b';');
        assert_eq!(args.decimal, DecimalArg::Comma);
        assert_eq!(args.preview, 5);
        assert_eq!(args.log_level, tracing::Level::INFO);
        assert!(!args.batch);
        assert!(args.painting.is_none());
    }

    #[test]
    fn explicit_sources() {
        let args = Args::parse_from([
            "field_std",
            "--painting",
            "consumo_pintura.csv",
            "--scaffold-hours",
            "sge_andaime.csv",
            "--delimiter",
            ",",
            "--decimal",
            "dot",
            "--log-level",
            "debug",
            "--batch",
        ]);
        assert_eq!(args.painting, Some(PathBuf::from("consumo_pintura.csv")));
        assert_eq!(args.scaffold_hours, Some(PathBuf::from("sge_andaime.csv")));
        assert_eq!(args.delimiter_byte().unwrap(), b',');
        assert_eq!(args.formats().painting, NumberFormat::DecimalPoint);
        assert_eq!(args.log_level, tracing::Level::DEBUG);
        assert!(args.batch);
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let args = Args::parse_from(["field_std", "--delimiter", "§"]);
        assert!(matches!(args.delimiter_byte(), Err(ReportError::Config(_))));
    }
}
