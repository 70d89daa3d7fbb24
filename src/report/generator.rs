//! Dashboard rendering.
//!
//! Turns a [`Dashboard`] snapshot into Markdown for the terminal or a file,
//! or into pretty-printed JSON.

use crate::models::{Dashboard, DashboardMetadata, EmissionRecord, ReportLinks, StatusSummary, TrendPoint};
use crate::views::{classify_badge, format_value, render_sparkline};
use anyhow::Result;

const EMPTY_TABLE_NOTICE: &str = "No data yet. Run the analysis to see results.";

/// Generate the complete Markdown dashboard.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    output.push_str("# 🌍 CarbonEye AI\n\n");
    output.push_str("Automated detection of high-emission vehicles and industries.\n\n");
    output.push_str(&format!("> {}\n\n", dashboard.message));

    output.push_str(&generate_metadata_section(&dashboard.metadata));
    output.push_str(&generate_summary_section(&dashboard.summary));

    output.push_str("## 🚗 High Emission Vehicles\n\n");
    output.push_str(&generate_records_table("Vehicle No", &dashboard.vehicles));

    output.push_str("## 🏭 High Polluting Industries\n\n");
    output.push_str(&generate_records_table("Industry", &dashboard.industries));

    output.push_str(&generate_top_section(dashboard));
    output.push_str(&generate_trend_section(&dashboard.vehicle_trend));
    output.push_str(&generate_downloads_section(&dashboard.links));

    output
}

fn generate_metadata_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Backend:** {}\n", metadata.api_base));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Analysis Run:** {}\n", metadata.run_state));
    section.push_str(&format!("- **Results:** {}\n", metadata.load_status));
    section.push('\n');

    section
}

/// The four aggregate cards, as one table row.
fn generate_summary_section(summary: &StatusSummary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str(
        "| High Emission Vehicles | High Polluting Industries | Total Vehicles Scanned | Total Industries Scanned |\n",
    );
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} flagged vehicles | {} flagged industries | {} | {} |\n\n",
        summary.high_vehicles,
        summary.high_industries,
        summary.total_vehicles,
        summary.total_industries
    ));

    section
}

fn generate_records_table(label: &str, records: &[EmissionRecord]) -> String {
    if records.is_empty() {
        return format!("{}\n\n", EMPTY_TABLE_NOTICE);
    }

    let mut table = String::new();

    table.push_str(&format!("| {} | Predicted CO₂ | Status |\n", label));
    table.push_str("|:---|---:|:---:|\n");
    for record in records {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&record.identifier),
            format_value(record.predicted_value),
            status_badge(record)
        ));
    }
    table.push('\n');

    table
}

fn status_badge(record: &EmissionRecord) -> String {
    let badge = classify_badge(&record.status);
    format!("{} {}", badge.emoji(), escape_cell(&record.status.to_string()))
}

/// Escape pipes so free text cannot split a table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn generate_top_section(dashboard: &Dashboard) -> String {
    let n = dashboard.metadata.top_n;
    let mut section = String::new();

    section.push_str("## 📊 Top Polluters\n\n");

    section.push_str(&format!("### Top {} High Emission Vehicles\n\n", n));
    section.push_str(&generate_ranking_table("Vehicle No", &dashboard.top_vehicles));

    section.push_str(&format!("### Top {} High Polluting Industries\n\n", n));
    section.push_str(&generate_ranking_table("Industry", &dashboard.top_industries));

    section
}

fn generate_ranking_table(label: &str, records: &[EmissionRecord]) -> String {
    if records.is_empty() {
        return format!("{}\n\n", EMPTY_TABLE_NOTICE);
    }

    let mut table = String::new();

    table.push_str(&format!("| # | {} | Predicted CO₂ |\n", label));
    table.push_str("|:---:|:---|---:|\n");
    for (rank, record) in records.iter().enumerate() {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            rank + 1,
            escape_cell(&record.identifier),
            format_value(record.predicted_value)
        ));
    }
    table.push('\n');

    table
}

fn generate_trend_section(trend: &[TrendPoint]) -> String {
    let mut section = String::new();

    section.push_str("## 📈 Emission Trend Analysis\n\n");

    if trend.is_empty() {
        section.push_str(&format!("{}\n\n", EMPTY_TABLE_NOTICE));
        return section;
    }

    let values: Vec<f64> = trend.iter().map(|p| p.record.predicted_value).collect();
    section.push_str(&format!("`{}`\n\n", render_sparkline(&values)));

    section.push_str("| Sample Index | Vehicle No | Predicted CO₂ |\n");
    section.push_str("|:---:|:---|---:|\n");
    for point in trend {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            point.index,
            escape_cell(&point.record.identifier),
            format_value(point.record.predicted_value)
        ));
    }
    section.push('\n');

    section
}

fn generate_downloads_section(links: &ReportLinks) -> String {
    let mut section = String::new();

    section.push_str("## 📁 Download Emission Reports\n\n");
    section.push_str(&format!("- [Vehicle Emission Report]({})\n", links.vehicles));
    section.push_str(&format!("- [Industry Emission Report]({})\n", links.industries));

    section
}

/// Generate a JSON dashboard.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}
