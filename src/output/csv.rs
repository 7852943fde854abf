use crate::catalog::MetricCatalog;
use crate::history::HistoryEntry;

use super::formatter::title_case;

/// Date as shown in exports: "Mar 1 2024 02:30 PM" (UTC, no commas)
pub fn format_export_date(entry: &HistoryEntry) -> String {
    entry.date.format("%b %-d %Y %I:%M %p").to_string()
}

/// Export one saved entry as a two-line CSV document.
///
/// Columns follow catalog order: brand, date, every metric (by label), then
/// every category score with two decimals. Missing values leave an empty
/// cell so columns stay aligned.
pub fn export_csv(catalog: &MetricCatalog, entry: &HistoryEntry) -> String {
    let mut headers = vec!["Brand Name".to_string(), "Date".to_string()];
    headers.extend(catalog.metrics().map(|m| m.label.clone()));
    headers.extend(
        catalog
            .category_names()
            .map(|c| format!("{} Score", title_case(c))),
    );

    let mut values = vec![entry.brand_name.clone(), format_export_date(entry)];
    values.extend(
        catalog
            .metrics()
            .map(|m| entry.metrics.get(&m.key).to_string()),
    );
    values.extend(catalog.category_names().map(|c| {
        entry
            .scores
            .get(c)
            .map(|s| format!("{:.2}", s))
            .unwrap_or_default()
    }));

    [headers, values]
        .iter()
        .map(|row| {
            row.iter()
                .map(|field| escape_field(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Suggested file name: "Acme_Co_2024-03-01_1430_Brand_Metrics_Results.csv"
pub fn export_file_name(entry: &HistoryEntry) -> String {
    let brand: String = entry
        .brand_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!(
        "{}_{}_Brand_Metrics_Results.csv",
        brand,
        entry.date.format("%Y-%m-%d_%H%M")
    )
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
