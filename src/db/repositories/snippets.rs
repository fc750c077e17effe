use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::models::{Snippet, SnippetInput, SnippetPatch};
use crate::db::{parse_datetime, Database};

const SNIPPET_COLUMNS: &str = "id, title, content, category, tags, created_at, usage_count";

fn row_to_snippet(row: &Row) -> Result<Snippet> {
    let created_at: String = row.get("created_at")?;

    Ok(Snippet {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        category: row.get("category")?,
        tags: row.get("tags")?,
        created_at: parse_datetime(&created_at)?,
        usage_count: row.get("usage_count")?,
    })
}

impl Database {
    pub async fn insert_snippet(&self, input: SnippetInput) -> Result<Snippet> {
        self.execute(move |conn| {
            let now = Utc::now();

            conn.execute(
                "INSERT INTO snippets (title, content, category, tags, created_at, usage_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0)",
                params![
                    input.title,
                    input.content,
                    input.category,
                    input.tags,
                    now.to_rfc3339(),
                ],
            )?;

            let snippet_id = conn.last_insert_rowid();

            let mut stmt = conn.prepare(&format!(
                "SELECT {SNIPPET_COLUMNS} FROM snippets WHERE id = ?1"
            ))?;
            let mut rows = stmt.query(params![snippet_id])?;
            match rows.next()? {
                Some(row) => row_to_snippet(row),
                None => Err(anyhow!("snippet not found after insert")),
            }
        })
        .await
    }

    /// All snippets, most used first, then most recent first. This is the
    /// store's presentation order when no contextual ranking is applied.
    pub async fn get_all_snippets(&self) -> Result<Vec<Snippet>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SNIPPET_COLUMNS} FROM snippets
                 ORDER BY usage_count DESC, created_at DESC"
            ))?;

            let mut rows = stmt.query([])?;
            let mut snippets = Vec::new();
            while let Some(row) = rows.next()? {
                snippets.push(row_to_snippet(row)?);
            }

            Ok(snippets)
        })
        .await
    }

    pub async fn get_snippet_by_id(&self, snippet_id: i64) -> Result<Option<Snippet>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SNIPPET_COLUMNS} FROM snippets WHERE id = ?1"
            ))?;

            let mut rows = stmt.query(params![snippet_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_snippet(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Substring search over title, content, tags and category.
    pub async fn search_snippets(&self, query: String) -> Result<Vec<Snippet>> {
        self.execute(move |conn| {
            let pattern = format!("%{query}%");

            let mut stmt = conn.prepare(&format!(
                "SELECT {SNIPPET_COLUMNS} FROM snippets
                 WHERE title LIKE ?1 OR content LIKE ?1 OR tags LIKE ?1 OR category LIKE ?1
                 ORDER BY usage_count DESC, created_at DESC"
            ))?;

            let mut rows = stmt.query(params![pattern])?;
            let mut snippets = Vec::new();
            while let Some(row) = rows.next()? {
                snippets.push(row_to_snippet(row)?);
            }

            Ok(snippets)
        })
        .await
    }

    pub async fn update_snippet(&self, snippet_id: i64, patch: SnippetPatch) -> Result<Snippet> {
        self.execute(move |conn| {
            // Build the update dynamically from the provided fields.
            let mut updates = Vec::new();
            let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(title) = patch.title {
                updates.push("title = ?");
                params_vec.push(Box::new(title));
            }
            if let Some(content) = patch.content {
                updates.push("content = ?");
                params_vec.push(Box::new(content));
            }
            if let Some(category) = patch.category {
                updates.push("category = ?");
                params_vec.push(Box::new(category));
            }
            if let Some(tags) = patch.tags {
                updates.push("tags = ?");
                params_vec.push(Box::new(tags));
            }

            if updates.is_empty() {
                return Err(anyhow!("no fields to update"));
            }

            let query = format!(
                "UPDATE snippets SET {} WHERE id = ?",
                updates.join(", ")
            );
            params_vec.push(Box::new(snippet_id));

            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params_vec.iter().map(|b| b.as_ref()).collect();

            let rows_affected = conn.execute(&query, params_refs.as_slice())?;
            if rows_affected == 0 {
                return Err(anyhow!("snippet {snippet_id} not found"));
            }

            let mut stmt = conn.prepare(&format!(
                "SELECT {SNIPPET_COLUMNS} FROM snippets WHERE id = ?1"
            ))?;
            let mut rows = stmt.query(params![snippet_id])?;
            match rows.next()? {
                Some(row) => row_to_snippet(row),
                None => Err(anyhow!("snippet not found after update")),
            }
        })
        .await
    }

    pub async fn delete_snippet(&self, snippet_id: i64) -> Result<bool> {
        self.execute(move |conn| {
            let deleted = conn.execute("DELETE FROM snippets WHERE id = ?1", params![snippet_id])?;
            Ok(deleted > 0)
        })
        .await
    }

    pub async fn increment_usage(&self, snippet_id: i64) -> Result<()> {
        self.execute(move |conn| {
            conn.execute(
                "UPDATE snippets SET usage_count = usage_count + 1 WHERE id = ?1",
                params![snippet_id],
            )?;
            Ok(())
        })
        .await
    }

    /// Distinct non-empty categories in use, alphabetically.
    pub async fn get_categories(&self) -> Result<Vec<String>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT category FROM snippets
                 WHERE category IS NOT NULL AND category != ''
                 ORDER BY category",
            )?;

            let mut rows = stmt.query([])?;
            let mut categories = Vec::new();
            while let Some(row) = rows.next()? {
                categories.push(row.get::<_, String>(0)?);
            }

            Ok(categories)
        })
        .await
    }
}
