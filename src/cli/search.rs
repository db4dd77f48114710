use anyhow::Result;

use daybook::category::Category;
use daybook::config::DaybookConfig;
use daybook::diary::types::EntryFilter;

/// Search an owner's entries from the terminal.
pub fn search(
    config: &DaybookConfig,
    owner: &str,
    query: Option<&str>,
    category: Option<Category>,
    limit: usize,
) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = daybook::db::open_database(&db_path)?;

    let filter = EntryFilter {
        owner: owner.to_string(),
        date: None,
        category,
        query: query.map(str::to_string),
        limit: Some(limit),
    };

    let entries = daybook::diary::store::find_entries(&conn, &filter)?;

    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    println!("Found {} entr{}\n", entries.len(), if entries.len() == 1 { "y" } else { "ies" });

    for (i, entry) in entries.iter().enumerate() {
        let preview: String = if entry.content.chars().count() > 120 {
            format!("{}...", entry.content.chars().take(120).collect::<String>())
        } else {
            entry.content.clone()
        };

        let done = match entry.completed {
            Some(true) => " [done]",
            Some(false) => " [open]",
            None => "",
        };

        println!(
            "  {}. {} {} [{}]{} {}",
            i + 1,
            entry.date,
            entry.time,
            entry.category,
            done,
            entry.id,
        );
        println!("     {}", preview);
        println!();
    }

    Ok(())
}
