use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use brand_score::catalog::{CatalogConfig, MetricCatalog};
use brand_score::config::Config;
use brand_score::error::{CatalogError, InputError};
use brand_score::history::{self, SortKey, TimeRange};
use brand_score::output;
use brand_score::scoring::{self, EnabledSet, RawValues};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every metric with its category, base weight and transform
    Catalog {
        /// Print the catalog as config YAML instead of a table
        #[arg(long)]
        yaml: bool,
    },
    /// Score a brand from raw metric values
    Score {
        /// Metric value as KEY=VALUE (repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// YAML file mapping metric keys to values
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Exclude a metric from scoring (repeatable)
        #[arg(long, value_name = "KEY")]
        disable: Vec<String>,

        /// Score with only these metrics enabled (repeatable)
        #[arg(long, value_name = "KEY", conflicts_with = "disable")]
        only: Vec<String>,

        /// Brand the scores belong to
        #[arg(short, long)]
        brand: Option<String>,

        /// Save the result to history (requires --brand)
        #[arg(long, requires = "brand")]
        save: bool,

        /// Print scores as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved results
    History {
        /// Only show results for this brand
        #[arg(short, long)]
        brand: Option<String>,

        /// Time range: 1w, 1m, 6m, ytd, 1y, 5y, max, or a duration like 10days
        #[arg(short, long, default_value = "max")]
        range: TimeRange,

        /// Sort column: date or brand
        #[arg(short, long, default_value = "date")]
        sort: SortKey,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Show every category score per result
        #[arg(long)]
        detail: bool,

        /// With --detail, also show every raw metric value
        #[arg(long, requires = "detail")]
        metrics: bool,
    },
    /// List brands with their number of saved results and latest score
    Brands {
        /// Only brands whose name contains this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    /// Export a saved result as CSV
    Export {
        /// Id of the saved result
        id: String,

        /// Output file, or a directory to write a generated file name into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a saved result, or every result for a brand
    Delete {
        /// Id of the saved result
        #[arg(required_unless_present = "brand")]
        id: Option<String>,

        /// Delete all results for this brand
        #[arg(long, conflicts_with = "id")]
        brand: Option<String>,
    },
    /// Recompute saved results and check they match what was stored
    Verify {
        /// Id of the saved result (all results if omitted)
        id: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "brand-score")]
#[command(about = "Composite brand performance scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/brand-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to history file (overrides config)
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Everything a command needs, resolved once at startup
struct AppContext {
    config: Config,
    catalog: MetricCatalog,
    history_path: PathBuf,
    verbose: bool,
    use_colors: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match brand_score::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate the catalog at startup
    let catalog = match config.build_catalog() {
        Ok(c) => c,
        Err(errors) => {
            eprintln!("Catalog config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };
    log::debug!(
        "Catalog: {} metrics in {} categories",
        catalog.len(),
        catalog.categories().len()
    );

    let history_path = match cli.history.clone() {
        Some(p) => Ok(p),
        None => config.history_path(),
    };
    let history_path = match history_path {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let ctx = AppContext {
        config,
        catalog,
        history_path,
        verbose: cli.verbose,
        use_colors: output::should_use_colors(),
    };

    if let Err(e) = run(cli.command, &ctx) {
        eprintln!("Error: {:#}", e);
        let code = if e.downcast_ref::<InputError>().is_some()
            || e.downcast_ref::<CatalogError>().is_some()
        {
            EXIT_CONFIG
        } else {
            EXIT_FAILURE
        };
        std::process::exit(code);
    }

    std::process::exit(EXIT_SUCCESS);
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_module("brand_score", log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn run(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Catalog { yaml } => {
            if yaml {
                let config = CatalogConfig::from(&ctx.catalog);
                let text = serde_saphyr::to_string(&config).context("Failed to render catalog")?;
                println!("{}", text);
            } else {
                println!("{}", output::format_catalog(&ctx.catalog, ctx.use_colors));
            }
        }
        Commands::Score {
            set,
            input,
            disable,
            only,
            brand,
            save,
            json,
        } => score(ctx, &set, input, &disable, &only, brand, save, json)?,
        Commands::History {
            brand,
            range,
            sort,
            asc,
            detail,
            metrics,
        } => {
            let store = history::load_history(&ctx.history_path)?;
            let scoped: Vec<_> = match brand {
                Some(ref name) => store.entries_for_brand(name),
                None => store.entries.iter().collect(),
            };
            let mut entries = history::filter_by_range(scoped, range, chrono::Utc::now());
            history::sort_entries(&mut entries, sort, asc);
            if detail {
                println!(
                    "{}",
                    output::format_history_detail(&ctx.catalog, &entries, metrics, ctx.use_colors)
                );
            } else {
                println!("{}", output::format_history_table(&entries, ctx.use_colors));
            }
        }
        Commands::Brands { search } => {
            let store = history::load_history(&ctx.history_path)?;
            let mut summaries = store.brand_summaries();
            if let Some(ref query) = search {
                let matching = store.matching_brands(query);
                summaries.retain(|s| matching.contains(&s.name.as_str()));
            }
            println!("{}", output::format_brand_summaries(&summaries, ctx.use_colors));
        }
        Commands::Export { id, output: target } => {
            let store = history::load_history(&ctx.history_path)?;
            let entry = store
                .get(&id)
                .with_context(|| format!("No saved result with id {}", id))?;
            let csv = output::export_csv(&ctx.catalog, entry);

            match target {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(output::export_file_name(entry))
                    } else {
                        path
                    };
                    std::fs::write(&path, format!("{}\n", csv))
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} to {}", entry.brand_name, path.display());
                }
                None => println!("{}", csv),
            }
        }
        Commands::Delete { id, brand } => {
            let mut store = history::load_history(&ctx.history_path)?;
            match (id, brand) {
                (Some(id), _) => {
                    let removed = store
                        .remove(&id)
                        .with_context(|| format!("No saved result with id {}", id))?;
                    println!("Deleted result {} for {}", removed.id, removed.brand_name);
                }
                (None, Some(brand)) => {
                    let count = store.remove_brand(&brand);
                    if count == 0 {
                        anyhow::bail!("No saved results for brand '{}'", brand);
                    }
                    println!("Deleted {} result(s) for {}", count, brand);
                }
                (None, None) => anyhow::bail!("Give an id or --brand"),
            }
            history::save_history(&ctx.history_path, &store)?;
        }
        Commands::Verify { id } => {
            let store = history::load_history(&ctx.history_path)?;
            let entries: Vec<_> = match id {
                Some(ref id) => vec![store
                    .get(id)
                    .with_context(|| format!("No saved result with id {}", id))?],
                None => store.entries.iter().collect(),
            };

            let mut inconsistent = 0;
            for entry in entries {
                let verification = history::verify_entry(&ctx.catalog, entry)?;
                if verification.is_consistent() {
                    println!("{}  {}  ok", entry.id, entry.brand_name);
                } else {
                    inconsistent += 1;
                    println!("{}  {}  MISMATCH", entry.id, entry.brand_name);
                    for m in &verification.mismatches {
                        println!(
                            "    {}: stored {} recomputed {}",
                            m.key,
                            m.expected.map_or("-".to_string(), |v| format!("{:.4}", v)),
                            m.actual.map_or("-".to_string(), |v| format!("{:.4}", v)),
                        );
                    }
                }
            }
            if inconsistent > 0 {
                anyhow::bail!("{} saved result(s) do not match a recomputation", inconsistent);
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn score(
    ctx: &AppContext,
    set: &[String],
    input: Option<PathBuf>,
    disable: &[String],
    only: &[String],
    brand: Option<String>,
    save: bool,
    json: bool,
) -> Result<()> {
    let catalog = &ctx.catalog;

    let mut raw = match input {
        Some(ref path) => brand_score::config::load_values_file(catalog, path)?,
        None => RawValues::blank(catalog),
    };
    for pair in set {
        raw.set_pair(catalog, pair)?;
    }

    let enabled = if only.is_empty() {
        let configured = ctx.config.disabled.iter().flatten();
        EnabledSet::with_disabled(catalog, configured.chain(disable.iter()))?
    } else {
        EnabledSet::only(catalog, only)?
    };
    log::debug!(
        "Disabled metrics: {:?}",
        enabled.disabled_keys().collect::<Vec<_>>()
    );

    let result = scoring::aggregate_detailed(catalog, &raw, &enabled);

    if json {
        let text =
            serde_json::to_string_pretty(&result.scores).context("Failed to serialize scores")?;
        println!("{}", text);
    } else {
        if let Some(ref name) = brand {
            println!("{}\n", name.trim());
        }
        println!("{}", output::format_score_report(&result.scores, ctx.use_colors));
        if ctx.verbose {
            println!();
            println!(
                "{}",
                output::format_breakdown(catalog, &result.breakdown, ctx.use_colors)
            );
        }
    }

    if save {
        let name = brand.unwrap_or_default();
        let mut store = history::load_history(&ctx.history_path)?;
        let id = store
            .record(&name, raw, result.scores, &enabled, chrono::Utc::now())?
            .id
            .clone();
        history::save_history(&ctx.history_path, &store)?;
        eprintln!("Saved result {} to {}", id, ctx.history_path.display());
    }

    Ok(())
}
