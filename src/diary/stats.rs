use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::category::Category;
use crate::diary::types::DATE_FORMAT;

/// Per-category entry counts for one owner.
#[derive(Debug, Serialize)]
pub struct CategoryStats {
    pub total_entries: u64,
    /// Every category is present. `TODO` counts only entries not yet completed.
    pub by_category: BTreeMap<String, u64>,
}

/// One day of the calendar view.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: String,
    pub entries: u64,
}

/// Count an owner's entries by category.
pub fn category_stats(conn: &Connection, owner: &str) -> Result<CategoryStats> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM entries WHERE owner = ?1",
        params![owner],
        |row| row.get(0),
    )?;

    let mut by_category: BTreeMap<String, u64> = Category::ALL
        .iter()
        .map(|c| (c.as_str().to_string(), 0))
        .collect();

    let mut stmt = conn.prepare(
        "SELECT category, COUNT(*) FROM entries
         WHERE owner = ?1 AND (category != 'TODO' OR completed IS NULL OR completed = 0)
         GROUP BY category",
    )?;
    let rows: Vec<(String, i64)> = stmt
        .query_map(params![owner], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    for (category, count) in rows {
        by_category.insert(category, count as u64);
    }

    Ok(CategoryStats {
        total_entries: total as u64,
        by_category,
    })
}

/// Parse a `YYYY-MM` month into its first day.
pub fn parse_month(month: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), DATE_FORMAT)
        .with_context(|| format!("invalid month {month:?}, expected YYYY-MM"))
}

/// Days in the month starting at `first_day` that have at least one entry.
pub fn calendar_month(
    conn: &Connection,
    owner: &str,
    first_day: NaiveDate,
) -> Result<Vec<CalendarDay>> {
    let first_day = first_day.with_day(1).unwrap_or(first_day);
    let next_month = first_day
        .checked_add_months(chrono::Months::new(1))
        .context("month out of range")?;

    let mut stmt = conn.prepare(
        "SELECT entry_date, COUNT(*) FROM entries
         WHERE owner = ?1 AND entry_date >= ?2 AND entry_date < ?3
         GROUP BY entry_date ORDER BY entry_date",
    )?;
    let days = stmt
        .query_map(
            params![
                owner,
                first_day.format(DATE_FORMAT).to_string(),
                next_month.format(DATE_FORMAT).to_string()
            ],
            |row| {
                Ok(CalendarDay {
                    date: row.get(0)?,
                    entries: row.get::<_, i64>(1)? as u64,
                })
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(days)
}
