//! Walk a small contact list through load, filter and every export format.
//!
//! Run with: cargo run --example sheet_demo -p sheetsift-sheet

use rust_xlsxwriter::Workbook;
use sheetsift_sheet::heuristics::phone_columns;
use sheetsift_sheet::{encode, filter_rows, ExportFormat, ExportSpec, FilterSpec, MatchMode, Table};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== sheetsift Sheet Demo ===\n");

    let temp_dir = env::temp_dir();

    // =========================================================================
    // Build a workbook in memory
    // =========================================================================
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let data = [
        ["Name", "Mobile", "City"],
        ["Alice", "555-0100", "Oslo"],
        ["Bob", "555-0101", "Bergen"],
        ["", "555-0102", "Oslo"],
        ["Dana", "555-0103", "Trondheim"],
    ];
    for (r, cells) in data.iter().enumerate() {
        for (c, value) in cells.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32, c as u16, *value)?;
            }
        }
    }
    let bytes = workbook.save_to_buffer()?;

    // =========================================================================
    // Load and inspect
    // =========================================================================
    println!("--- Loading ---\n");

    let table = Table::from_bytes(&bytes)?;
    println!("Headers: {:?}", table.headers.as_slice());
    println!("Rows: {}", table.row_count());
    println!("Phone columns: {:?}", phone_columns(table.headers.iter()));

    // =========================================================================
    // Filter
    // =========================================================================
    println!("\n--- Filtering (City contains \"oslo\") ---\n");

    let filter = FilterSpec {
        columns: vec!["City".to_string()],
        query: "oslo".to_string(),
        mode: MatchMode::Contains,
        case_sensitive: false,
    };
    let kept = filter_rows(table.rows, &filter);
    for row in &kept {
        println!("  {row:?}");
    }

    // =========================================================================
    // Export
    // =========================================================================
    println!("\n--- Exporting ---\n");

    for format in ExportFormat::ALL {
        let columns = match format {
            ExportFormat::ContactCard => vec!["Mobile".to_string()],
            _ => vec!["Name".to_string(), "Mobile".to_string()],
        };
        let mut spec = ExportSpec::new(columns, format);
        if format == ExportFormat::ContactCard {
            spec.contact_name_suffix = Some("(Oslo)".to_string());
        }

        let payload = encode(&kept, &spec)?;
        let path = temp_dir.join(format!("sheet_demo.{}", payload.extension));
        std::fs::write(&path, &payload.bytes)?;
        println!(
            "{format}: {} bytes ({}) -> {}",
            payload.bytes.len(),
            payload.media_type,
            path.display()
        );
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
