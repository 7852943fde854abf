pub mod csv;
pub mod formatter;

pub use csv::{export_csv, export_file_name, format_export_date};
pub use formatter::{
    format_breakdown, format_brand_summaries, format_catalog, format_history_detail,
    format_history_table, format_score, format_score_report, should_use_colors, title_case,
};
