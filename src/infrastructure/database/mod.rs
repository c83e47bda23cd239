use rusqlite::{Connection, OptionalExtension};
use crate::application::errors::OrmError;

const SQLITE_SCHEME: &str = "sqlite://";
const MEMORY: &str = ":memory:";

/// One open database connection
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a connection from a `sqlite://` url.
    ///
    /// `sqlite://:memory:` opens a private in-memory database, anything else
    /// after the scheme is treated as a file path.
    pub fn open(url: &str) -> Result<Self, OrmError> {
        let path = url
            .strip_prefix(SQLITE_SCHEME)
            .ok_or_else(|| OrmError::UnsupportedScheme(url.to_string()))?;

        if path.is_empty() {
            return Err(OrmError::Config(format!("Missing database path in '{}'", url)));
        }

        let conn = if path == MEMORY {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };

        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn execute_batch(&self, sql: &str) -> Result<(), OrmError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    pub fn table_exists(&self, table: &str) -> Result<bool, OrmError> {
        let found = self.conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn count_rows(&self, table: &str) -> Result<i64, OrmError> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", table.replace('"', "\"\"")),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open("sqlite://:memory:").unwrap();
        db.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY)").unwrap();
        assert!(db.table_exists("t").unwrap());
        assert!(!db.table_exists("missing").unwrap());
        assert_eq!(db.count_rows("t").unwrap(), 0);
    }

    #[test]
    fn test_rejects_other_schemes() {
        let err = Database::open("postgres://localhost/db").err().unwrap();
        assert!(matches!(err, OrmError::UnsupportedScheme(_)));
    }

    #[test]
    fn test_rejects_empty_path() {
        assert!(matches!(Database::open("sqlite://"), Err(OrmError::Config(_))));
    }
}
