use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::catalog::MetricCatalog;
use crate::history::{BrandSummary, HistoryEntry};
use crate::scoring::{classify, MetricContribution, ScoreSet, Tier};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Scores render as whole numbers
pub fn format_score(score: f64) -> String {
    format!("{:.0}", score)
}

/// "awareness" -> "Awareness"
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn paint_tier(tier: Tier, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match tier {
        Tier::Exceptional => text.bright_green().bold().to_string(),
        Tier::VeryEffective | Tier::Effective => text.green().to_string(),
        Tier::ModeratelyEffective => text.yellow().to_string(),
        Tier::NeedsImprovement => text.truecolor(249, 115, 22).to_string(),
        Tier::Ineffective => text.red().to_string(),
    }
}

/// Category scores followed by the overall score and its tier.
/// Category column: 14 chars, score column: 4 chars right-aligned.
pub fn format_score_report(scores: &ScoreSet, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(scores.categories.len() + 1);

    for (category, score) in &scores.categories {
        lines.push(format!(
            "{:<14}{:>4}",
            title_case(category),
            format_score(*score)
        ));
    }

    let tier = classify(scores.overall);
    let overall = format!("{:<14}{:>4}", "Overall", format_score(scores.overall));
    let overall = if use_colors {
        overall.bold().to_string()
    } else {
        overall
    };
    lines.push(format!(
        "{}  {}",
        overall,
        paint_tier(tier, tier.label(), use_colors)
    ));

    lines.join("\n")
}

/// Per-metric detail for verbose mode: normalized value, adjusted weight
/// and contribution to the overall score.
pub fn format_breakdown(
    catalog: &MetricCatalog,
    breakdown: &[MetricContribution],
    use_colors: bool,
) -> String {
    breakdown
        .iter()
        .map(|item| {
            let label = catalog
                .get(&item.key)
                .map(|m| m.label.as_str())
                .unwrap_or(item.key.as_str());
            let line = format!(
                "  {:<34}{:>7.1}  w {:>5.1}%  +{:.2}",
                label,
                item.normalized,
                item.weight * 100.0,
                item.contribution
            );
            if !item.enabled && use_colors {
                format!("{}", line.dimmed())
            } else if !item.enabled {
                format!("{}  (disabled)", line)
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every metric grouped under its category, with base weight and transform
pub fn format_catalog(catalog: &MetricCatalog, use_colors: bool) -> String {
    let mut lines = Vec::new();
    for category in catalog.categories() {
        let weight: f64 = category.metrics.iter().map(|m| m.base_weight).sum();
        let header = format!("{} ({:.1}%)", title_case(&category.name), weight * 100.0);
        lines.push(if use_colors {
            header.bold().to_string()
        } else {
            header
        });

        for metric in &category.metrics {
            let key = format!("{:<22}", metric.key);
            lines.push(format!(
                "  {}{:<34}{:>5.1}%  {}",
                if use_colors {
                    key.cyan().to_string()
                } else {
                    key
                },
                metric.label,
                metric.base_weight * 100.0,
                metric.transform
            ));
        }
    }
    lines.join("\n")
}

/// One line per saved entry: id, date, brand, overall score, tier
pub fn format_history_table(entries: &[&HistoryEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No saved results found.".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            let tier = classify(entry.scores.overall);
            let date = entry.date.format("%Y-%m-%d %H:%M").to_string();
            let score = format!("{:>4}", format_score(entry.scores.overall));
            if use_colors {
                format!(
                    "{:<16}  {}  {}  {}  {}",
                    entry.id.dimmed(),
                    date,
                    score.bold(),
                    entry.brand_name,
                    paint_tier(tier, tier.label(), true)
                )
            } else {
                format!(
                    "{:<16}  {}  {}  {}  {}",
                    entry.id,
                    date,
                    score,
                    entry.brand_name,
                    tier.label()
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-entry series: date, every category score in catalog order, overall,
/// and optionally every raw metric value. Missing values show as `-`.
pub fn format_history_detail(
    catalog: &MetricCatalog,
    entries: &[&HistoryEntry],
    show_metrics: bool,
    use_colors: bool,
) -> String {
    if entries.is_empty() {
        return "No saved results found.".to_string();
    }

    let mut columns: Vec<String> = catalog.category_names().map(title_case).collect();
    columns.push("Overall".to_string());
    if show_metrics {
        columns.extend(catalog.metrics().map(|m| m.key.clone()));
    }
    let widths: Vec<usize> = columns.iter().map(|c| c.len().max(4)).collect();

    let header = render_row("Date", &columns, &widths);
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for entry in entries {
        let mut cells: Vec<String> = catalog
            .category_names()
            .map(|c| entry.scores.get(c).map(format_score).unwrap_or_else(|| "-".to_string()))
            .collect();
        cells.push(format_score(entry.scores.overall));
        if show_metrics {
            cells.extend(catalog.metrics().map(|m| match entry.metrics.get(&m.key) {
                "" => "-".to_string(),
                value => value.to_string(),
            }));
        }
        let date = entry.date.format("%Y-%m-%d %H:%M").to_string();
        lines.push(render_row(&date, &cells, &widths));
    }

    lines.join("\n")
}

fn render_row(first: &str, cells: &[String], widths: &[usize]) -> String {
    let mut row = format!("{:<16}", first);
    for (cell, width) in cells.iter().zip(widths) {
        row.push_str(&format!("  {:>width$}", cell, width = width));
    }
    row
}

/// Brand overview: name, number of saved results, latest overall score
pub fn format_brand_summaries(summaries: &[BrandSummary], use_colors: bool) -> String {
    if summaries.is_empty() {
        return "No brands saved yet.".to_string();
    }

    summaries
        .iter()
        .map(|s| {
            let results = if s.count == 1 { "result" } else { "results" };
            let name = if use_colors {
                s.name.bold().to_string()
            } else {
                s.name.clone()
            };
            format!(
                "{}  {} {}  latest score {}",
                name,
                s.count,
                results,
                format_score(s.latest_overall)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
