use colored::*;
use jiff::{Timestamp, Zoned, tz::TimeZone};

use crate::{
    matching::MatchedItem,
    models::item::{Priority, TodoItem},
};

/// Style a line according to the priority of its item
pub fn colorize(line: &str, priority: Priority) -> ColoredString {
    match priority.as_char() {
        'a' => line.bold().yellow(),
        'b' => line.bold().green(),
        'c' => line.bold().blue(),
        'z' => line.normal(),
        _ => line.bold(),
    }
}

/// Plain text of an item line, e.g. `3. (B) +errands Buy milk`
pub fn format_item_line(index: usize, item: &TodoItem) -> String {
    let priority = if item.priority.is_lowest() {
        String::new()
    } else {
        format!("({}) ", item.priority.as_char().to_ascii_uppercase())
    };
    format!("{}. {}+{} {}", index, priority, item.project, item.description)
}

/// Format a timestamp in the system time zone as `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(timestamp: Timestamp) -> String {
    Zoned::new(timestamp, TimeZone::system())
        .strftime("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn render_item_line(index: usize, item: &TodoItem) {
    println!("{}", colorize(&format_item_line(index, item), item.priority));
}

/// Render the whole pending list with 1-based indexes
pub fn render_items(items: &[TodoItem]) {
    if items.is_empty() {
        println!("No todo items");
        return;
    }
    for (position, item) in items.iter().enumerate() {
        render_item_line(position + 1, item);
    }
}

/// Render search results, keeping each item's index in the full list
pub fn render_matches(matches: &[MatchedItem<'_>]) {
    if matches.is_empty() {
        println!("No items found");
        return;
    }
    for matched in matches {
        render_item_line(matched.index, matched.item);
    }
}

pub fn render_report(items: &[&TodoItem], days: u32) {
    if items.is_empty() {
        println!("No completed items in the last {} days", days);
        return;
    }

    println!("{}", format!("Completed items in the last {} days:", days).bold());
    for item in items {
        if let Some(completed_at) = item.completed_at {
            println!("{}: {}", format_timestamp(completed_at).dimmed(), item.description);
        }
    }
}
