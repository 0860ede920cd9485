use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};
use tokio::sync::watch;

use crate::app::{PostdeckError, Result};
use crate::domain::{Item, NewItem};
use crate::store::{ItemStore, ItemWriter};

pub struct SqliteStore {
    conn: Mutex<Connection>,
    generation: watch::Sender<u64>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);
        migrations.to_latest(&mut conn)?;

        let (generation, _) = watch::channel(0);
        Ok(Self {
            conn: Mutex::new(conn),
            generation,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            PostdeckError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn bump_generation(&self) {
        self.generation.send_modify(|g| *g += 1);
    }

    fn map_item(row: &Row<'_>) -> rusqlite::Result<Item> {
        Ok(Item {
            id: row.get(0)?,
            title: row.get(1)?,
            image_url: row.get(2)?,
        })
    }
}

fn clear_items(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM items", [])?;
    Ok(())
}

fn insert_items(conn: &Connection, items: &[NewItem]) -> Result<usize> {
    let mut upsert = conn.prepare_cached(
        "INSERT INTO items (id, title, image_url) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET title = excluded.title, image_url = excluded.image_url",
    )?;
    let mut insert = conn.prepare_cached("INSERT INTO items (title, image_url) VALUES (?1, ?2)")?;

    let mut count = 0;
    for item in items {
        count += match item.id {
            Some(id) => upsert.execute(params![id, item.title, item.image_url])?,
            None => insert.execute(params![item.title, item.image_url])?,
        };
    }
    Ok(count)
}

struct SqliteWriter<'a> {
    conn: &'a Connection,
}

impl ItemWriter for SqliteWriter<'_> {
    fn clear_all(&self) -> Result<()> {
        clear_items(self.conn)
    }

    fn insert_all(&self, items: &[NewItem]) -> Result<usize> {
        insert_items(self.conn, items)
    }
}

impl ItemStore for SqliteStore {
    fn query_page(&self, offset: usize, limit: usize) -> Result<Vec<Item>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare_cached(
            "SELECT id, title, image_url FROM items ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;

        let items = stmt
            .query_map(params![limit as i64, offset as i64], Self::map_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Item>> {
        let conn = self.conn()?;

        let result = conn
            .query_row(
                "SELECT id, title, image_url FROM items WHERE id = ?1",
                params![id],
                Self::map_item,
            )
            .optional()?;

        Ok(result)
    }

    fn clear_all(&self) -> Result<()> {
        clear_items(&*self.conn()?)?;
        self.bump_generation();
        Ok(())
    }

    fn insert_all(&self, items: &[NewItem]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let count = insert_items(&tx, items)?;
        tx.commit()?;
        drop(conn);

        self.bump_generation();
        Ok(count)
    }

    fn with_transaction(&self, f: &mut dyn FnMut(&dyn ItemWriter) -> Result<()>) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        // Dropping `tx` without commit rolls back.
        f(&SqliteWriter { conn: &tx })?;
        tx.commit()?;
        drop(conn);

        self.bump_generation();
        Ok(())
    }

    fn invalidations(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}
