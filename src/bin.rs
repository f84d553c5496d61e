//! Command line front-end over a JSON forest file.
//!
//! Loads a nested JSON array of nodes, indexes it, runs one request and
//! prints the outcome. Mutating requests print the updated JSON, or write it
//! back to the input file with `--write`.
//!
//! ```bash
//! forest-index tree.json draw
//! forest-index tree.json path 1-1-1
//! forest-index tree.json add --parent 1 "new node"
//! forest-index tree.json --write remove 1-1
//! ```
//!
//! Set `RUST_LOG=debug` to see index activity.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use forest_index::record::{self, FieldNames, Record};
use forest_index::{IndexedForest, TreeNodeId};
use itertools::Itertools;
use log::info;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "forest-index", about = "Query and edit a JSON tree through a parent index")]
struct Cli {
    /// JSON file holding an array of root nodes
    file: PathBuf,

    /// Key holding each node's unique identifier
    #[arg(long, default_value = "id")]
    value_field: String,

    /// Key holding each node's display name
    #[arg(long, default_value = "name")]
    label_field: String,

    /// Key holding each node's array of children
    #[arg(long, default_value = "children")]
    children_field: String,

    /// Write mutations back to FILE instead of printing them
    #[arg(long)]
    write: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the forest as an indented tree
    Draw,
    /// Print the label and identifier paths from a node up to its root
    Path { value: String },
    /// Add a node, as a new root unless --parent is given
    Add {
        label: String,
        #[arg(long)]
        parent: Option<String>,
        /// Identifier for the new node, defaults to the current time in milliseconds
        #[arg(long)]
        value: Option<String>,
    },
    /// Change a node's display name
    Rename { value: String, label: String },
    /// Delete a node and everything below it
    Remove { value: String },
}

type Session = IndexedForest<Record, Value, String>;

fn lookup(tree: &Session, key: &str) -> Result<TreeNodeId> {
    tree.find(|n| n.value_matches(key))
        .ok_or_else(|| anyhow!("no node with identifier {key:?}"))
}

fn non_empty(label: &str) -> Result<&str> {
    let label = label.trim();
    if label.is_empty() {
        return Err(anyhow!("label must not be empty"));
    }
    Ok(label)
}

fn fresh_value() -> Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
    Ok(now.as_millis().to_string())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let names = FieldNames::new(&cli.value_field, &cli.label_field, &cli.children_field);

    let text = fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    let json: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", cli.file.display()))?;
    let forest = record::from_json(&json, &names)?;
    let mut tree = IndexedForest::new(forest, Record::prop());
    info!("loaded {} nodes", tree.index().len());

    match cli.command {
        Command::Draw => {
            println!("{}", tree.debug_draw(|n| n.label.clone()));
            return Ok(());
        }
        Command::Path { value } => {
            let node = lookup(&tree, &value)?;
            println!("labels: {}", tree.path_labels(node).iter().join(" / "));
            println!("values: {}", tree.path_values(node).iter().join(" / "));
            return Ok(());
        }
        Command::Add {
            label,
            parent,
            value,
        } => {
            let value = match value {
                Some(v) => v,
                None => fresh_value()?,
            };
            let record = Record::new(value, non_empty(&label)?);
            match parent {
                Some(p) => {
                    let parent = lookup(&tree, &p)?;
                    tree.add_child(parent, record)
                        .ok_or_else(|| anyhow!("cannot add under {p:?}"))?;
                }
                None => {
                    tree.add_root(record);
                }
            }
        }
        Command::Rename { value, label } => {
            let node = lookup(&tree, &value)?;
            if !tree.rename(node, non_empty(&label)?.to_string()) {
                return Err(anyhow!("cannot rename {value:?}"));
            }
        }
        Command::Remove { value } => {
            let node = lookup(&tree, &value)?;
            tree.remove(node)?;
        }
    }

    let out = serde_json::to_string_pretty(&record::to_json(tree.forest(), &names))?;
    if cli.write {
        fs::write(&cli.file, out + "\n")
            .with_context(|| format!("writing {}", cli.file.display()))?;
        info!("wrote {}", cli.file.display());
    } else {
        println!("{out}");
    }
    Ok(())
}
