//! Row access for the `categories` table.

use crate::libs::error::Result;
use crate::libs::task::Category;
use rusqlite::{params, Connection, OptionalExtension, Row};

// Upserts update in place: `INSERT OR REPLACE` would delete the row first and
// cascade-delete every task of the category.
const UPSERT_CATEGORY: &str = "INSERT INTO categories (id, name, \"index\") VALUES (?1, ?2, ?3)
    ON CONFLICT(id) DO UPDATE SET name = excluded.name, \"index\" = excluded.\"index\"";
const DELETE_CATEGORY: &str = "DELETE FROM categories WHERE id = ?1";
const DELETE_ALL_CATEGORIES: &str = "DELETE FROM categories";
const SELECT_CATEGORIES: &str = "SELECT id, name, \"index\" FROM categories ORDER BY id";
const SELECT_CATEGORY_BY_ID: &str = "SELECT id, name, \"index\" FROM categories WHERE id = ?1";

/// Category table access over a borrowed connection.
pub struct Categories<'a> {
    conn: &'a Connection,
}

impl<'a> Categories<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts the category, or updates it when its id already exists.
    /// Returns the stored id.
    pub fn upsert(&self, category: &Category) -> Result<i64> {
        self.conn.execute(UPSERT_CATEGORY, params![category.id, category.name, category.index])?;
        Ok(category.id.unwrap_or_else(|| self.conn.last_insert_rowid()))
    }

    /// Deletes a category (and, through the foreign key, its tasks).
    /// Returns the number of category rows removed.
    pub fn delete(&self, id: i64) -> Result<usize> {
        Ok(self.conn.execute(DELETE_CATEGORY, params![id])?)
    }

    pub fn delete_all(&self) -> Result<usize> {
        Ok(self.conn.execute(DELETE_ALL_CATEGORIES, [])?)
    }

    /// All categories in storage order.
    pub fn list(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(SELECT_CATEGORIES)?;
        let category_iter = stmt.query_map([], Self::from_row)?;

        let mut categories = Vec::new();
        for category in category_iter {
            categories.push(category?);
        }
        Ok(categories)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.conn.query_row(SELECT_CATEGORY_BY_ID, params![id], Self::from_row).optional()?)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            index: row.get(2)?,
        })
    }
}
