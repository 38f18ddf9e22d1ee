use rusqlite::params;
use rusqlite::types::Value;
use tracing::{debug, warn};

use crate::error::{storage, PlaceError, Result};
use crate::models::{Coordinate, Place};

use super::connection::PlaceStore;

/// Raw column values for one row, decoded separately so type mismatches
/// surface as [`PlaceError::Decode`] instead of a SQLite conversion error.
struct RawRow {
    id: Value,
    title: Value,
    description: Value,
    latitude: Value,
    longitude: Value,
    is_favorite: Value,
}

impl PlaceStore {
    /// Read every row in id order.
    pub fn list_all(&self) -> Result<Vec<Place>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, description, latitude, longitude, isFavorite
                 FROM place
                 ORDER BY id",
            )
            .map_err(storage("prepare place query"))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RawRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    latitude: row.get(3)?,
                    longitude: row.get(4)?,
                    is_favorite: row.get(5)?,
                })
            })
            .map_err(storage("load places"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage("collect places"))?;

        rows.into_iter().map(decode_row).collect()
    }

    /// Insert a new row from `place` (its `id`, if any, is ignored) and
    /// return the assigned id.
    pub fn insert(&self, place: &Place) -> Result<i64> {
        let outcome = self.run(
            "insert place",
            "INSERT INTO place (title, description, latitude, longitude, isFavorite)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                place.title,
                stored_description(place),
                place.coordinate.latitude,
                place.coordinate.longitude,
                place.is_favorite,
            ],
        )?;
        debug!(id = outcome.last_insert_id, "inserted place");
        Ok(outcome.last_insert_id)
    }

    /// Overwrite title, description, and coordinate of a persisted place.
    /// The favorite flag is left alone; see [`PlaceStore::set_favorite`].
    pub fn update(&self, place: &Place) -> Result<()> {
        let id = place
            .id
            .ok_or_else(|| PlaceError::validation("Cannot update a place without an id."))?;

        self.run(
            "update place",
            "UPDATE place SET title = ?1, description = ?2, latitude = ?3, longitude = ?4
             WHERE id = ?5",
            params![
                place.title,
                stored_description(place),
                place.coordinate.latitude,
                place.coordinate.longitude,
                id,
            ],
        )?;
        Ok(())
    }

    /// Overwrite only the favorite flag. Silently does nothing for a place
    /// without an id.
    pub fn set_favorite(&self, place: &Place, value: bool) -> Result<()> {
        let Some(id) = place.id else {
            warn!(title = %place.title, "ignoring favorite change for unsaved place");
            return Ok(());
        };

        self.run(
            "update favorite flag",
            "UPDATE place SET isFavorite = ?1 WHERE id = ?2",
            params![value, id],
        )?;
        Ok(())
    }

    /// Remove the row with `id`. Returns whether a row was actually deleted.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let outcome = self.run("delete place", "DELETE FROM place WHERE id = ?1", params![id])?;
        Ok(outcome.changes > 0)
    }
}

fn stored_description(place: &Place) -> &str {
    place
        .description
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or("")
}

fn decode_row(row: RawRow) -> Result<Place> {
    Ok(Place {
        id: Some(decode_id(row.id)?),
        title: decode_text("title", row.title)?.unwrap_or_default(),
        description: decode_text("description", row.description)?.filter(|text| !text.is_empty()),
        coordinate: Coordinate {
            latitude: decode_float("latitude", row.latitude)?,
            longitude: decode_float("longitude", row.longitude)?,
        },
        is_favorite: decode_flag("isFavorite", row.is_favorite)?,
    })
}

fn decode_id(value: Value) -> Result<i64> {
    match value {
        Value::Integer(id) => Ok(id),
        other => Err(mismatch("id", &other)),
    }
}

fn decode_text(column: &'static str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Text(text) => Ok(Some(text)),
        Value::Null => Ok(None),
        other => Err(mismatch(column, &other)),
    }
}

fn decode_float(column: &'static str, value: Value) -> Result<f64> {
    match value {
        Value::Real(number) => Ok(number),
        Value::Integer(number) => Ok(number as f64),
        other => Err(mismatch(column, &other)),
    }
}

/// Stored 0/1 (or NULL for "never set") to boolean.
fn decode_flag(column: &'static str, value: Value) -> Result<bool> {
    match value {
        Value::Integer(0) | Value::Null => Ok(false),
        Value::Integer(1) => Ok(true),
        Value::Integer(_) => Err(PlaceError::Decode {
            column,
            found: "out-of-range integer",
        }),
        other => Err(mismatch(column, &other)),
    }
}

fn mismatch(column: &'static str, value: &Value) -> PlaceError {
    let found = match value {
        Value::Null => "null",
        Value::Integer(_) => "integer",
        Value::Real(_) => "real",
        Value::Text(_) => "text",
        Value::Blob(_) => "blob",
    };
    PlaceError::Decode { column, found }
}
