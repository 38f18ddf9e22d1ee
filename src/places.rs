//! The place list controller: one in-memory snapshot of every place for the
//! running session, refreshed from the store after each mutation.
//!
//! The snapshot is never patched locally. Every successful mutation is
//! followed by a full [`PlaceList::reload`], so what the views render always
//! matches the table. A failed reload keeps the previous snapshot.

use tracing::{info, warn};

use crate::db::PlaceStore;
use crate::error::{PlaceError, Result};
use crate::models::{FocusRegion, Place};

pub struct PlaceList {
    store: PlaceStore,
    places: Vec<Place>,
    focus: Option<FocusRegion>,
}

impl PlaceList {
    /// Take ownership of a ready store and perform the startup reload.
    pub fn load(store: PlaceStore) -> Result<Self> {
        let mut list = Self {
            store,
            places: Vec::new(),
            focus: None,
        };
        list.reload()?;
        Ok(list)
    }

    /// Replace the snapshot with the store's full contents.
    pub fn reload(&mut self) -> Result<()> {
        let places = self.store.list_all()?;
        self.places = places;
        Ok(())
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn find(&self, id: i64) -> Option<&Place> {
        self.places.iter().find(|place| place.id == Some(id))
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &PlaceStore {
        &self.store
    }

    /// Persist a draft, reload, and focus the map on it. Returns the new id.
    pub fn create(&mut self, draft: &Place) -> Result<i64> {
        validate_fields(draft)?;
        let id = self.store.insert(draft)?;
        info!(id, title = %draft.title, "created place");
        self.focus_on(draft);
        self.reload_after(id)?;
        Ok(id)
    }

    /// Save edits to a persisted place, reload, and focus the map on it.
    pub fn update(&mut self, place: &Place) -> Result<()> {
        let id = require_id(place, "update")?;
        validate_fields(place)?;
        self.store.update(place)?;
        info!(id, title = %place.title, "updated place");
        self.focus_on(place);
        self.reload_after(id)
    }

    /// Flip the favorite flag relative to `place` and reload. Returns the
    /// new flag value.
    pub fn toggle_favorite(&mut self, place: &Place) -> Result<bool> {
        let id = require_id(place, "favorite")?;
        let value = !place.is_favorite;
        self.store.set_favorite(place, value)?;
        info!(id, favorite = value, "toggled favorite");
        self.reload_after(id)?;
        Ok(value)
    }

    /// Delete a persisted place and reload.
    pub fn delete(&mut self, place: &Place) -> Result<()> {
        let id = require_id(place, "delete")?;
        let removed = self.store.delete(id)?;
        info!(id, removed, "deleted place");
        self.reload_after(id)
    }

    /// Reload following a committed write to place `id`. A failure here is
    /// reported as [`PlaceError::Unsynced`] so callers do not retry the write.
    fn reload_after(&mut self, id: i64) -> Result<()> {
        self.reload().map_err(|source| {
            warn!(id, error = %source, "write committed but reload failed");
            PlaceError::Unsynced {
                id,
                source: Box::new(source),
            }
        })
    }

    /// Places flagged as favorite, in snapshot order.
    pub fn favorites(&self) -> Vec<&Place> {
        self.places.iter().filter(|place| place.is_favorite).collect()
    }

    /// Case-insensitive substring match on title or description. A blank
    /// query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Place> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.places
            .iter()
            .filter(|place| place.matches_lowercase(&needle))
            .collect()
    }

    /// Propose a map region centred on `place`.
    pub fn focus_on(&mut self, place: &Place) {
        self.focus = Some(FocusRegion::around(place.coordinate));
    }

    /// The last proposed region, if any.
    pub fn proposed_focus(&self) -> Option<FocusRegion> {
        self.focus
    }

    /// The region the map should show: the proposed one or the default.
    pub fn focus_region(&self) -> FocusRegion {
        self.focus.unwrap_or_default()
    }
}

fn require_id(place: &Place, action: &str) -> Result<i64> {
    place.id.ok_or_else(|| {
        PlaceError::validation(format!("Cannot {action} a place without an id."))
    })
}

fn validate_fields(place: &Place) -> Result<()> {
    if place.title.trim().is_empty() {
        return Err(PlaceError::validation("Title is required."));
    }
    if !place.coordinate.is_finite() {
        return Err(PlaceError::validation(
            "Latitude and longitude must be valid numbers.",
        ));
    }
    Ok(())
}
