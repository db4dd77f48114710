//! Owner-scoped entry persistence: upsert, find, update, delete.
//!
//! Every read and write is keyed by `owner`; an entry id belonging to another
//! owner behaves as if it did not exist.

use anyhow::{bail, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::category::Category;
use crate::diary::types::{DiaryEntry, EntryFilter, EntryPatch, DATE_FORMAT};

const SELECT_COLUMNS: &str =
    "id, owner, content, entry_date, entry_time, category, completed, created_at, updated_at";

/// Insert `entry`, or overwrite the stored entry with the same id and owner.
///
/// Fails if the id is already taken by a different owner.
pub fn upsert_entry(conn: &Connection, entry: &DiaryEntry) -> Result<()> {
    let changed = conn.execute(
        "INSERT INTO entries (id, owner, content, entry_date, entry_time, category, completed, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(id) DO UPDATE SET
             content = excluded.content,
             entry_date = excluded.entry_date,
             entry_time = excluded.entry_time,
             category = excluded.category,
             completed = excluded.completed,
             updated_at = excluded.updated_at
         WHERE entries.owner = excluded.owner",
        params![
            entry.id,
            entry.owner,
            entry.content,
            entry.date,
            entry.time,
            entry.category.as_str(),
            entry.completed,
            entry.created_at,
            entry.updated_at,
        ],
    )?;

    if changed == 0 {
        bail!("entry {} belongs to another owner", entry.id);
    }
    Ok(())
}

/// Fetch one entry by id.
pub fn get_entry(conn: &Connection, owner: &str, id: &str) -> Result<Option<DiaryEntry>> {
    let entry = conn
        .query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM entries WHERE owner = ?1 AND id = ?2"),
            params![owner, id],
            row_to_entry,
        )
        .optional()?;
    Ok(entry)
}

/// Entries matching `filter`, newest first.
pub fn find_entries(conn: &Connection, filter: &EntryFilter) -> Result<Vec<DiaryEntry>> {
    let mut sql = format!("SELECT {SELECT_COLUMNS} FROM entries WHERE owner = ?1");
    let mut args: Vec<String> = vec![filter.owner.clone()];

    if let Some(date) = filter.date {
        args.push(date.format(DATE_FORMAT).to_string());
        sql.push_str(&format!(" AND entry_date = ?{}", args.len()));
    }
    if let Some(category) = filter.category {
        args.push(category.as_str().to_string());
        sql.push_str(&format!(" AND category = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY entry_date DESC, entry_time DESC, created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(args.iter()), row_to_entry)?
        .collect::<Result<Vec<_>, _>>()?;

    // Substring search runs here so case folding matches Rust's Unicode lowercase.
    let needle = filter
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let matches = rows
        .into_iter()
        .filter(|entry| match &needle {
            Some(q) => entry.content.to_lowercase().contains(q.as_str()),
            None => true,
        })
        .take(filter.limit.unwrap_or(usize::MAX))
        .collect();

    Ok(matches)
}

/// Apply `patch` to an existing entry. Returns `None` if the entry does not exist.
///
/// Editing content keeps the stored category.
pub fn update_entry(
    conn: &Connection,
    owner: &str,
    id: &str,
    patch: &EntryPatch,
) -> Result<Option<DiaryEntry>> {
    let Some(mut entry) = get_entry(conn, owner, id)? else {
        return Ok(None);
    };

    if let Some(content) = patch.content.as_deref().map(str::trim) {
        if !content.is_empty() {
            entry.content = content.to_string();
        }
    }
    if let Some(completed) = patch.completed {
        entry.completed = Some(completed);
    }
    if let Some(category) = patch.category {
        entry.category = category;
    }
    entry.updated_at = chrono::Utc::now().to_rfc3339();

    upsert_entry(conn, &entry)?;
    Ok(Some(entry))
}

/// Delete an entry. Returns `false` if nothing was deleted.
pub fn delete_entry(conn: &Connection, owner: &str, id: &str) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM entries WHERE owner = ?1 AND id = ?2",
        params![owner, id],
    )?;
    Ok(deleted > 0)
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<DiaryEntry> {
    let category: String = row.get(5)?;
    let category = category
        .parse::<Category>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into()))?;

    Ok(DiaryEntry {
        id: row.get(0)?,
        owner: row.get(1)?,
        content: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        category,
        completed: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
