use colored::*;
use serde::Serialize;

pub const TOTAL_WIDTH: usize = 64;

/// Prints a centred section header such as `──⟦ NETWORK DISCOVERY ⟧──`.
pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg.to_uppercase());
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    println!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        formatted.bright_green(),
        "─".repeat(right).bright_black()
    );
}

pub fn fat_separator() {
    println!("{}", "═".repeat(TOTAL_WIDTH).bright_black());
}

pub fn tree_head(idx: usize, title: &str) {
    println!("{} {}", format!("[{}]", idx + 1).bright_black(), title.bold());
}

/// Prints `details` as one tree level under the last head.
pub fn as_tree_one_level(details: &[(String, ColoredString)]) {
    let key_width = details.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    for (i, (key, value)) in details.iter().enumerate() {
        let branch = if i + 1 == details.len() { "└─" } else { "├─" };
        let dots = ".".repeat(key_width - key.len() + 2);
        println!(
            " {} {}{}{} {}",
            branch.bright_black(),
            key.cyan(),
            dots.bright_black(),
            ":".bright_black(),
            value
        );
    }
}

pub fn no_results(what: &str) {
    println!("{}", format!("No {what} found.").yellow());
}

pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
