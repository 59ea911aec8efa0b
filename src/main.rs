use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::{
    config::Config,
    models::item::Priority,
    services::{
        items::{
            AddItemError, AddItemParameters, CompleteItemError, CompleteItemParameters,
            DeleteItemError, DeleteItemParameters, EditItemParameters, SetPriorityParameters,
            add_item, append_text, complete_item, delete_item, prepend_text, set_priority,
        },
        report::{DEFAULT_REPORT_DAYS, ReportParameters, completed_report},
    },
    storage::{Storage, json::JsonFileStorage},
};

mod annotations;
mod config;
mod matching;
mod models;
mod services;
mod storage;
mod ui;

#[derive(Parser)]
#[command(
    name = "todo",
    about = "Keep a prioritized list of todos in your terminal"
)]
struct Cli {
    /// Path of the store file (defaults to the local data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a todo; "+project" and "@x" in the text set project and priority
    #[command(visible_alias = "a")]
    Add {
        /// Todo description
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,

        /// Assign to a project instead of the inline tag or first word
        #[arg(short, long)]
        project: Option<String>,

        /// Priority level (a-z), overrides an inline "@x" tag
        #[arg(long)]
        priority: Option<Priority>,
    },

    /// List todos, optionally fuzzy searching by project and description
    #[command(visible_alias = "l")]
    List {
        /// Optional search query
        query: Vec<String>,
    },

    /// Set the priority of a todo
    #[command(visible_alias = "p")]
    Pri {
        /// Todo item number
        index: usize,

        /// Priority level (a-z)
        priority: Priority,
    },

    /// Mark a todo as done
    #[command(visible_alias = "d")]
    Done {
        /// Todo item number
        index: usize,
    },

    /// Delete a todo without completing it
    #[command(visible_alias = "rm")]
    Delete {
        /// Todo item number
        index: usize,
    },

    /// Add text to the end of a todo
    #[command(visible_alias = "app")]
    Append {
        /// Todo item number
        index: usize,

        /// Text to add
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// Add text to the front of a todo
    #[command(visible_alias = "pre")]
    Prepend {
        /// Todo item number
        index: usize,

        /// Text to add
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// Report items completed recently
    #[command(visible_alias = "r")]
    Report {
        /// Number of days to look back
        #[arg(short, long, default_value_t = DEFAULT_REPORT_DAYS)]
        days: u32,
    },
}

fn configure_logging(verbose: bool, quiet: bool) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

    let level = if quiet {
        LevelFilter::ERROR
    } else if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    registry()
        .with(EnvFilter::default().add_directive(level.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    configure_logging(cli.verbose, cli.quiet);

    let config = Config::resolve(cli.store);
    config
        .ensure_store_dir()
        .unwrap_or_else(|e| fail(format!("Failed to create data directory: {}", e)));

    let storage = JsonFileStorage::new(config.store_path.clone());

    let mut store = match storage.load() {
        Ok(store) => store,
        Err(e) => fail(format!("Failed to load store: {}", e)),
    };
    store.sort_pending();

    match cli.command {
        Some(Commands::Add {
            words,
            project,
            priority,
        }) => {
            let params = AddItemParameters {
                text: words.join(" "),
                project,
                priority,
            };

            match add_item(&mut store, &storage, params) {
                Ok(item) => {
                    debug!(id = %item.id, "added");
                    ui::render_items(&store.pending);
                }
                Err(AddItemError::EmptyDescription) => {
                    fail("Todo description cannot be empty")
                }
                Err(AddItemError::Annotation(e)) => fail(e),
                Err(AddItemError::Storage(e)) => fail(format!("Failed to save todo: {}", e)),
            }
        }
        Some(Commands::List { query }) => {
            if query.is_empty() {
                ui::render_items(&store.pending);
            } else {
                let matches = matching::fuzzy_match(&query.join(" "), &store.pending);
                ui::render_matches(&matches);
            }
        }
        Some(Commands::Pri { index, priority }) => {
            match set_priority(&mut store, &storage, SetPriorityParameters { index, priority }) {
                Ok(_) => ui::render_items(&store.pending),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Done { index }) => {
            match complete_item(&mut store, &storage, CompleteItemParameters { index }) {
                Ok(item) => {
                    let completed_at = item
                        .completed_at
                        .map(ui::format_timestamp)
                        .unwrap_or_default();
                    println!("Todo item '{}' completed at {}", item.description, completed_at);
                }
                Err(CompleteItemError::InvalidIndex { .. }) => {
                    fail("Invalid index. Please provide a valid index.")
                }
                Err(CompleteItemError::Storage(e)) => {
                    fail(format!("Failed to save todo: {}", e))
                }
            }
        }
        Some(Commands::Delete { index }) => {
            match delete_item(&mut store, &storage, DeleteItemParameters { index }) {
                Ok(item) => println!("Todo item '{}' deleted successfully.", item.description),
                Err(DeleteItemError::InvalidIndex { .. }) => {
                    fail("Invalid index. Please provide a valid index.")
                }
                Err(DeleteItemError::Storage(e)) => fail(format!("Failed to save todo: {}", e)),
            }
        }
        Some(Commands::Append { index, words }) => {
            let params = EditItemParameters {
                index,
                text: words.join(" "),
            };
            match append_text(&mut store, &storage, params) {
                Ok(item) => ui::render_item_line(index, &item),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Prepend { index, words }) => {
            let params = EditItemParameters {
                index,
                text: words.join(" "),
            };
            match prepend_text(&mut store, &storage, params) {
                Ok(item) => ui::render_item_line(index, &item),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Report { days }) => {
            let items = completed_report(
                &store,
                ReportParameters {
                    days,
                    now: jiff::Timestamp::now(),
                },
            );
            ui::render_report(&items, days);
        }
        None => ui::render_items(&store.pending),
    }
}
