use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use grocery::{Config, JsonFileStorage};
use grocery_shopping::{
    Category, GroceryList, ReferenceAmount, UnitSystem, aggregate_ingredients,
    convert_ingredient_text, format_aggregated, simple_conversion,
};
use serde::Serialize;

/// grocery - Normalized, deduplicated grocery lists
#[derive(Parser)]
#[command(name = "grocery")]
#[command(about = "Turn free-form ingredient lines into a categorized shopping list", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add items to the list
    Add {
        /// Ingredient lines, e.g. "2 tbsp olive oil"
        #[arg(required = true)]
        items: Vec<String>,

        /// Keep the text as typed instead of its canonical name
        #[arg(long)]
        keep_quantities: bool,
    },
    /// Show the list grouped by store section
    List {
        /// Print the entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the item at a 1-based position
    Remove { position: usize },
    /// Replace the text of the item at a 1-based position
    Edit { position: usize, text: String },
    /// Show the list with the given items ticked off
    Check {
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Remove every item
    Clear,
    /// Convert measures in ingredient text
    Convert {
        text: String,

        /// metric, us or uk (overrides config file)
        #[arg(long)]
        system: Option<String>,
    },
    /// Combine recipe ingredient lines and suggest bulk purchases
    Aggregate {
        /// Ingredient lines
        lines: Vec<String>,

        /// Read ingredient lines from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ListRow<'a> {
    position: usize,
    text: &'a str,
    category: Category,
    conversion: Option<ReferenceAmount>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow!(e))?;

    grocery::observability::init_observability(
        "grocery",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Add {
            items,
            keep_quantities,
        } => add_command(&config, items, keep_quantities),
        Commands::List { json } => list_command(&config, json),
        Commands::Remove { position } => remove_command(&config, position),
        Commands::Edit { position, text } => edit_command(&config, position, &text),
        Commands::Check { items } => check_command(&config, items),
        Commands::Clear => clear_command(&config),
        Commands::Convert { text, system } => convert_command(&config, &text, system),
        Commands::Aggregate { lines, file } => aggregate_command(lines, file),
    }
}

fn open_list(config: &Config) -> GroceryList {
    let storage = JsonFileStorage::new(&config.storage.path);
    tracing::debug!(path = %storage.path().display(), "opening grocery list");
    GroceryList::open(storage)
}

fn index_for(list: &GroceryList, position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .filter(|index| *index < list.len())
        .with_context(|| format!("No item at position {position} (list has {})", list.len()))
}

#[tracing::instrument(skip(config, items))]
fn add_command(config: &Config, items: Vec<String>, keep_quantities: bool) -> Result<()> {
    let mut list = open_list(config);
    let preserve = keep_quantities || config.list.preserve_quantities;

    let added = list.add_many(&items, preserve);
    let skipped = items.len() - added;

    println!("Added {added} item(s)");
    if skipped > 0 {
        println!("Skipped {skipped} already on the list");
    }
    Ok(())
}

fn list_command(config: &Config, json: bool) -> Result<()> {
    let list = open_list(config);

    if json {
        let rows: Vec<ListRow> = list
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| ListRow {
                position: index + 1,
                text: entry.display_text(),
                category: entry.category(),
                conversion: entry.conversion(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print_grouped(&list);
    Ok(())
}

fn remove_command(config: &Config, position: usize) -> Result<()> {
    let mut list = open_list(config);
    let index = index_for(&list, position)?;
    let text = list.entries()[index].display_text().to_string();

    list.remove_at(index);
    println!("Removed {text}");
    Ok(())
}

fn edit_command(config: &Config, position: usize, text: &str) -> Result<()> {
    let mut list = open_list(config);
    let index = index_for(&list, position)?;

    if !list.replace_at(index, text) {
        return Err(anyhow!(
            "Cannot change item {position} to {text:?}: blank or already on the list"
        ));
    }
    println!("Updated item {position}");
    Ok(())
}

fn check_command(config: &Config, items: Vec<String>) -> Result<()> {
    let mut list = open_list(config);

    for item in &items {
        if !list.toggle_checked(item) {
            println!("Not on the list: {item}");
        }
    }

    print_grouped(&list);
    Ok(())
}

fn clear_command(config: &Config) -> Result<()> {
    let mut list = open_list(config);
    let count = list.len();

    list.clear();
    println!("Cleared {count} item(s)");
    Ok(())
}

fn convert_command(config: &Config, text: &str, system: Option<String>) -> Result<()> {
    let system: UnitSystem = match system {
        Some(name) => name
            .parse()
            .map_err(|_| anyhow!("Unknown unit system: {name}"))?,
        None => config.list.unit_system().map_err(|e| anyhow!(e))?,
    };

    println!(
        "{} {}: {}",
        system.flag(),
        system.label(),
        convert_ingredient_text(text, system)
    );
    if let Some(reference) = simple_conversion(text) {
        println!("≈ {reference}");
    }
    Ok(())
}

fn aggregate_command(mut lines: Vec<String>, file: Option<PathBuf>) -> Result<()> {
    if let Some(path) = file {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        lines.extend(contents.lines().map(str::to_string));
    }

    for item in aggregate_ingredients(&lines) {
        println!("{}", format_aggregated(&item));
    }
    Ok(())
}

fn print_grouped(list: &GroceryList) {
    if list.is_empty() {
        println!("Your grocery list is empty");
        return;
    }

    let conversions = list.conversions();

    for (category, items) in list.grouped() {
        println!("{} {}", category.icon(), category);
        for item in items {
            let mark = if list.is_checked(item) { "x" } else { " " };
            let conversion = conversions
                .iter()
                .find(|(text, _)| *text == item)
                .and_then(|(_, c)| *c);

            match conversion {
                Some(reference) => println!("  [{mark}] {item} ({reference})"),
                None => println!("  [{mark}] {item}"),
            }
        }
    }

    println!("{} item(s)", list.len());
}
