//! Location registry repository.
//!
//! # Invariants
//! - Location names are unique under case-insensitive comparison.
//! - Listing order is insertion order (`seq ASC`).
//! - Seeding never modifies an existing slot, whatever its casing.

use crate::error::{LibraryError, LibraryResult};
use crate::model::location::{seeded_slot_description, seeded_slot_name, Location};
use crate::model::name_key::fold_key;
use crate::model::validation::require_text;
use crate::repo::codec::{begin_write, ensure_connection_ready, is_unique_violation};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for shelving locations.
pub trait LocationRepository {
    /// Inserts one location; fails with `DuplicateLocation` on a collision.
    fn add_location(&self, name: &str, description: &str) -> LibraryResult<Location>;
    /// Ensures `Compartment 1..=count` exist. Returns how many were created.
    fn seed_range(&self, count: u32) -> LibraryResult<u32>;
    fn get_location(&self, name: &str) -> LibraryResult<Option<Location>>;
    fn list_locations(&self) -> LibraryResult<Vec<Location>>;
}

/// SQLite-backed location repository.
pub struct SqliteLocationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLocationRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> LibraryResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl LocationRepository for SqliteLocationRepository<'_> {
    fn add_location(&self, name: &str, description: &str) -> LibraryResult<Location> {
        let name = require_text("name", name)?;
        let description = description.trim().to_string();

        let inserted = self.conn.execute(
            "INSERT INTO locations (name, name_key, description) VALUES (?1, ?2, ?3);",
            params![name.as_str(), fold_key(&name), description.as_str()],
        );
        match inserted {
            Ok(_) => Ok(Location { name, description }),
            Err(err) if is_unique_violation(&err) => Err(LibraryError::DuplicateLocation(name)),
            Err(err) => Err(err.into()),
        }
    }

    fn seed_range(&self, count: u32) -> LibraryResult<u32> {
        let tx = begin_write(self.conn)?;
        let mut created = 0_u32;
        {
            let mut insert = tx.prepare(
                "INSERT INTO locations (name, name_key, description)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(name_key) DO NOTHING;",
            )?;
            for index in 1..=count {
                let name = seeded_slot_name(index);
                let changed = insert.execute(params![
                    name.as_str(),
                    fold_key(&name),
                    seeded_slot_description(index),
                ])?;
                if changed > 0 {
                    created += 1;
                }
            }
        }
        tx.commit()?;
        Ok(created)
    }

    fn get_location(&self, name: &str) -> LibraryResult<Option<Location>> {
        let location = self
            .conn
            .query_row(
                "SELECT name, description FROM locations WHERE name_key = ?1;",
                [fold_key(name)],
                |row| {
                    Ok(Location {
                        name: row.get("name")?,
                        description: row.get("description")?,
                    })
                },
            )
            .optional()?;
        Ok(location)
    }

    fn list_locations(&self) -> LibraryResult<Vec<Location>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, description FROM locations ORDER BY seq ASC;")?;
        let mut rows = stmt.query([])?;
        let mut locations = Vec::new();
        while let Some(row) = rows.next()? {
            locations.push(Location {
                name: row.get("name")?,
                description: row.get("description")?,
            });
        }
        Ok(locations)
    }
}
