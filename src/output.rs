use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "csv written");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    debug!(path = %path.display(), "json written");
    Ok(())
}

/// Markdown table of the first `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricRow;

    fn row(id: &str, std: &str) -> MetricRow {
        MetricRow {
            work_order: id.to_string(),
            output: "1.00".to_string(),
            hours: "2.00".to_string(),
            std: std.to_string(),
        }
    }

    #[test]
    fn renders_markdown_and_truncates() {
        let rows = vec![row("OS1", "2.0000"), row("OS2", "n/a"), row("OS3", "0.1000")];
        let table = render_table(&rows, 2);
        assert!(table.contains("| WorkOrder"));
        assert!(table.contains("OS2"));
        assert!(!table.contains("OS3"));
    }

    #[test]
    fn empty_table() {
        assert_eq!(render_table::<MetricRow>(&[], 5), "(no rows)");
    }

    #[test]
    fn csv_round_trip_to_disk() {
        let path = std::env::temp_dir().join(format!("field_std_output_{}.csv", std::process::id()));
        write_csv(&path, &[row("OS1", "n/a")]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(text, "WorkOrder,Output,Hours,STD\nOS1,1.00,2.00,n/a\n");
    }
}
