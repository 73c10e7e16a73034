// Entry point and CLI flow.
//
// - Option [1] loads the four source exports and prints row counts.
// - Option [2] runs the pipeline, writes the report files and previews them.
// - `--batch` does both once and exits.
use clap::Parser;
use field_std::config::Args;
use field_std::loader;
use field_std::output;
use field_std::pipeline::{self, SourceRows};
use field_std::reports;
use field_std::types::{Domain, RawRow};
use field_std::util::{format_int, format_number, format_ratio};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

// Loaded sources, kept so reports can be regenerated without reloading.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { sources: None }));

struct AppState {
    sources: Option<SourceRows>,
}

/// `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// `true` for Y, `false` for N (or end of input).
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Missing or unreadable sources are reported and treated as empty.
fn load_source(label: &str, path: Option<&Path>, delimiter: u8) -> Vec<RawRow> {
    let Some(path) = path else {
        info!(source = label, "no file given, using an empty source");
        return Vec::new();
    };
    match loader::load_rows(path, delimiter) {
        Ok((rows, report)) => {
            println!(
                "{}: {} rows loaded ({} skipped) from {}",
                label,
                format_int(report.loaded_rows),
                format_int(report.skipped_rows),
                path.display()
            );
            rows
        }
        Err(e) => {
            warn!(source = label, error = %e, "source unavailable, using an empty source");
            println!("{}: unavailable ({})", label, e);
            Vec::new()
        }
    }
}

fn handle_load(args: &Args) -> field_std::Result<()> {
    let delimiter = args.delimiter_byte()?;
    let sources = SourceRows {
        painting: load_source("Painting", args.painting.as_deref(), delimiter),
        scaffolding: load_source("Scaffolding", args.scaffolding.as_deref(), delimiter),
        painting_hours: load_source("Painting hours", args.painting_hours.as_deref(), delimiter),
        scaffold_hours: load_source("Scaffold hours", args.scaffold_hours.as_deref(), delimiter),
    };
    println!();
    let mut state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
    state.sources = Some(sources);
    Ok(())
}

fn handle_generate_reports(args: &Args) -> field_std::Result<()> {
    let sources = {
        let state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
        state.sources.clone()
    };
    let Some(sources) = sources else {
        println!("Error: No data loaded. Please load the source files first (option 1).\n");
        return Ok(());
    };

    let out = pipeline::run(&sources, &args.formats());
    std::fs::create_dir_all(&args.out_dir)?;

    println!("Generating reports...\n");

    for report in [&out.painting, &out.scaffolding] {
        let rows = reports::metric_rows(report);
        let file = match report.domain {
            Domain::Painting => "std_painting.csv",
            Domain::Scaffolding => "std_scaffolding.csv",
        };
        output::write_csv(&args.out_dir.join(file), &rows)?;
        output::preview_table(
            &format!("{} STD per Work Order ({})", report.domain.label(), report.domain.unit()),
            Some("Highest STD first; n/a = no output recorded"),
            &rows,
            args.preview,
        );
        println!("(Full table exported to {})\n", file);
    }

    let liters = reports::liters_rows(&out);
    output::write_csv(&args.out_dir.join("paint_liters.csv"), &liters)?;
    output::preview_table("Paint Liters per Work Order", None, &liters, args.preview);

    let monthly = reports::monthly_paint_rows(&out);
    output::write_csv(&args.out_dir.join("paint_monthly.csv"), &monthly)?;
    output::preview_table("Painted Area and Liters per Month", None, &monthly, args.preview);

    let colors = reports::color_rows(&out);
    output::write_csv(&args.out_dir.join("paint_colors.csv"), &colors)?;
    output::preview_table("Paint Liters per Color", None, &colors, args.preview);

    let summary = reports::generate_summary(&out);
    output::write_json(&args.out_dir.join("summary.json"), &summary)?;
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"total_hours\": {}, \"total_output\": {}, \"global_std\": {}}}\n",
        format_number(summary.total_hours, 2),
        format_number(summary.total_output, 2),
        format_ratio(summary.global_ratio, 4)
    );
    info!(out_dir = %args.out_dir.display(), "reports written");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.batch {
        handle_load(&args)?;
        handle_generate_reports(&args)?;
        return Ok(());
    }

    loop {
        println!("Field STD Reports:");
        println!("[1] Load the files");
        println!("[2] Generate Reports\n");
        let Some(choice) = read_choice() else {
            break;
        };
        match choice.as_str() {
            "1" => {
                if let Err(e) = handle_load(&args) {
                    error!(error = %e, "load failed");
                }
            }
            "2" => {
                println!();
                if let Err(e) = handle_generate_reports(&args) {
                    error!(error = %e, "report generation failed");
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
    Ok(())
}
