use anyhow::Result;

use daybook::category::Category;
use daybook::config::DaybookConfig;

/// Display per-category entry counts in the terminal.
pub fn stats(config: &DaybookConfig, owner: &str) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = daybook::db::open_database(&db_path)?;

    let response = daybook::diary::stats::category_stats(&conn, owner)?;

    println!("Diary Statistics for {owner}");
    println!("{}", "=".repeat(40));
    println!("  Total entries:       {}", response.total_entries);
    println!();

    println!("By Category:");
    for category in Category::ALL {
        let count = response
            .by_category
            .get(category.as_str())
            .copied()
            .unwrap_or(0);
        let note = if category == Category::Todo { " (open)" } else { "" };
        println!("  {:<12} {}{}", category.as_str(), count, note);
    }

    Ok(())
}
