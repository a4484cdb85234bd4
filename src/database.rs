use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{DiaryEntry, Status, Todo};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Row has no id")]
    MissingId,
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<Status>()
            .map_err(|e| FromSqlError::Other(e.into()))
    }
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        let db = Database { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Make every write fail while reads keep working, by flipping
    /// SQLite's query_only pragma. Failure injection for tests.
    #[cfg(test)]
    pub(crate) fn set_query_only(&self, on: bool) -> Result<(), DatabaseError> {
        self.conn.pragma_update(None, "query_only", on)?;
        Ok(())
    }

    /// Create the two tables. At most one diary entry per date is enforced
    /// here with a UNIQUE constraint rather than in application code.
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS diary_entries (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                date            TEXT NOT NULL UNIQUE,
                content         TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS todos (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                description     TEXT,
                status          TEXT NOT NULL DEFAULT 'todo',
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_todos_status ON todos(status)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at)",
            [],
        )?;

        Ok(())
    }

    fn row_to_todo(row: &rusqlite::Row) -> Result<Todo, rusqlite::Error> {
        Ok(Todo {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            description: row.get(2)?,
            status: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn row_to_entry(row: &rusqlite::Row) -> Result<DiaryEntry, rusqlite::Error> {
        Ok(DiaryEntry {
            id: Some(row.get(0)?),
            date: row.get(1)?,
            content: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    /// Insert a todo and return its ID
    pub fn insert_todo(&self, todo: &Todo) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO todos (title, description, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                todo.title,
                todo.description,
                todo.status,
                todo.created_at,
                todo.updated_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get every todo, newest first. The board partitions this into lanes;
    /// in-lane position is never stored.
    pub fn get_all_todos(&self) -> Result<Vec<Todo>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, status, created_at, updated_at
             FROM todos ORDER BY created_at DESC, id DESC",
        )?;
        let todos = stmt
            .query_map([], Self::row_to_todo)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(todos)
    }

    /// Get a single todo by ID; None when the row does not exist
    pub fn get_todo(&self, id: i64) -> Result<Option<Todo>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, status, created_at, updated_at
             FROM todos WHERE id = ?1",
        )?;

        match stmt.query_row(rusqlite::params![id], Self::row_to_todo) {
            Ok(todo) => Ok(Some(todo)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Update a todo's title and description
    pub fn update_todo(&self, todo: &Todo) -> Result<(), DatabaseError> {
        let id = todo.id.ok_or(DatabaseError::MissingId)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE todos SET title = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
            rusqlite::params![
                todo.title,
                todo.description,
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Reassign a todo's lane. This is the only field a drag writes.
    pub fn update_todo_status(&self, id: i64, status: Status) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE todos SET status = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![
                status,
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a todo by ID
    pub fn delete_todo(&self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM todos WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(())
    }

    /// Insert a diary entry and return its ID. Fails if an entry already
    /// exists for the date (UNIQUE constraint); callers check first.
    pub fn insert_entry(&self, entry: &DiaryEntry) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO diary_entries (date, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![entry.date, entry.content, entry.created_at, entry.updated_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get the entry for a calendar date. A missing row is a normal
    /// outcome (the date simply has no entry yet), not an error.
    pub fn get_entry_by_date(&self, date: &str) -> Result<Option<DiaryEntry>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, content, created_at, updated_at
             FROM diary_entries WHERE date = ?1",
        )?;

        match stmt.query_row(rusqlite::params![date], Self::row_to_entry) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Dates that have an entry, for the calendar's content markers
    pub fn get_entry_dates(&self) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT date FROM diary_entries")?;
        let dates = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dates)
    }

    /// Replace an existing entry's content
    pub fn update_entry_content(&self, id: i64, content: &str) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE diary_entries SET content = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![
                content,
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a diary entry by ID
    pub fn delete_entry(&self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM diary_entries WHERE id = ?1",
            rusqlite::params![id],
        )?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        let conn = Connection::open_in_memory().unwrap();
        Database::from_connection(conn).unwrap()
    }

    #[test]
    fn insert_and_get_todo() {
        let db = setup_db();
        let id = db.insert_todo(&Todo::new("Buy milk".to_string())).unwrap();

        let fetched = db.get_todo(id).unwrap().unwrap();
        assert_eq!(fetched.title, "Buy milk");
        assert_eq!(fetched.status, Status::Todo);
    }

    #[test]
    fn get_todo_not_found_is_none() {
        let db = setup_db();
        assert!(db.get_todo(42).unwrap().is_none());
    }

    #[test]
    fn todos_are_ordered_newest_first() {
        let db = setup_db();
        let mut first = Todo::new("first".to_string());
        first.created_at = "2024-01-01 09:00:00".to_string();
        let mut second = Todo::new("second".to_string());
        second.created_at = "2024-01-02 09:00:00".to_string();
        db.insert_todo(&first).unwrap();
        db.insert_todo(&second).unwrap();

        let all = db.get_all_todos().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "second");
        assert_eq!(all[1].title, "first");
    }

    #[test]
    fn update_todo_status_persists() {
        let db = setup_db();
        let id = db.insert_todo(&Todo::new("move me".to_string())).unwrap();

        db.update_todo_status(id, Status::Done).unwrap();

        let fetched = db.get_todo(id).unwrap().unwrap();
        assert_eq!(fetched.status, Status::Done);
    }

    #[test]
    fn update_todo_edits_title_and_description() {
        let db = setup_db();
        let id = db.insert_todo(&Todo::new("old".to_string())).unwrap();

        let mut todo = db.get_todo(id).unwrap().unwrap();
        todo.title = "new".to_string();
        todo.description = Some("details".to_string());
        db.update_todo(&todo).unwrap();

        let fetched = db.get_todo(id).unwrap().unwrap();
        assert_eq!(fetched.title, "new");
        assert_eq!(fetched.description.as_deref(), Some("details"));
    }

    #[test]
    fn update_todo_without_id_fails() {
        let db = setup_db();
        let todo = Todo::new("no id".to_string());
        assert!(matches!(
            db.update_todo(&todo),
            Err(DatabaseError::MissingId)
        ));
    }

    #[test]
    fn delete_todo_removes_row() {
        let db = setup_db();
        let id = db.insert_todo(&Todo::new("gone".to_string())).unwrap();
        db.delete_todo(id).unwrap();
        assert!(db.get_todo(id).unwrap().is_none());
    }

    #[test]
    fn entry_not_found_is_none() {
        let db = setup_db();
        assert!(db.get_entry_by_date("2024-03-15").unwrap().is_none());
    }

    #[test]
    fn insert_and_reload_entry_verbatim() {
        let db = setup_db();
        let entry = DiaryEntry::new("2024-03-15".to_string(), "Good day".to_string());
        db.insert_entry(&entry).unwrap();

        let fetched = db.get_entry_by_date("2024-03-15").unwrap().unwrap();
        assert_eq!(fetched.content, "Good day");
        assert_eq!(fetched.date, "2024-03-15");
    }

    #[test]
    fn one_entry_per_date_is_enforced() {
        let db = setup_db();
        db.insert_entry(&DiaryEntry::new(
            "2024-03-15".to_string(),
            "first".to_string(),
        ))
        .unwrap();

        let duplicate = DiaryEntry::new("2024-03-15".to_string(), "second".to_string());
        assert!(db.insert_entry(&duplicate).is_err());
    }

    #[test]
    fn update_entry_content_keeps_single_row() {
        let db = setup_db();
        let id = db
            .insert_entry(&DiaryEntry::new(
                "2024-03-15".to_string(),
                "draft".to_string(),
            ))
            .unwrap();

        db.update_entry_content(id, "final").unwrap();

        let dates = db.get_entry_dates().unwrap();
        assert_eq!(dates, vec!["2024-03-15".to_string()]);
        let fetched = db.get_entry_by_date("2024-03-15").unwrap().unwrap();
        assert_eq!(fetched.content, "final");
    }

    #[test]
    fn delete_entry_clears_date_marker() {
        let db = setup_db();
        let id = db
            .insert_entry(&DiaryEntry::new(
                "2024-03-15".to_string(),
                "bye".to_string(),
            ))
            .unwrap();

        db.delete_entry(id).unwrap();

        assert!(db.get_entry_by_date("2024-03-15").unwrap().is_none());
        assert!(db.get_entry_dates().unwrap().is_empty());
    }
}
