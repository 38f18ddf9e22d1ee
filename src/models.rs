//! Domain models shared by the store, the place list controller, and the
//! terminal views. They are plain data holders; persistence rules live in
//! `db` and synchronization rules in `places`.

use std::fmt;

/// Span (in degrees, on both axes) of the map region proposed after a place
/// is created, edited, or selected.
pub const FOCUS_SPAN: f64 = 0.01;

/// Centre used by the map before any place has been focused.
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: -31.331964682774906,
    longitude: -54.07185976262321,
};

/// A latitude/longitude pair. No range validation is performed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {:.4}, Lon: {:.4}", self.latitude, self.longitude)
    }
}

/// A named point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Row id assigned by the store. `None` marks a place that was never
    /// persisted; update and delete flows require it.
    pub id: Option<i64>,
    /// Human-facing label. Not unique.
    pub title: String,
    /// Optional free text. An empty description is stored as absent.
    pub description: Option<String>,
    pub coordinate: Coordinate,
    pub is_favorite: bool,
}

impl Place {
    /// Build an unsaved place. Blank descriptions collapse to `None`.
    pub fn new(title: impl Into<String>, description: Option<String>, coordinate: Coordinate) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: normalize_description(description),
            coordinate,
            is_favorite: false,
        }
    }

    /// Attach a store id, turning a draft into a persisted place.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Text handed to a speech synthesizer: the description when present,
    /// otherwise the title.
    pub fn spoken_text(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => description,
            _ => &self.title,
        }
    }

    /// Case-insensitive containment check used by search. `needle` must
    /// already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(needle))
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Collapse empty or whitespace-only descriptions to `None`.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|text| !text.trim().is_empty())
}

/// A map viewport: centre plus span in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusRegion {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl FocusRegion {
    /// Region of the fixed focus span around `center`.
    pub fn around(center: Coordinate) -> Self {
        Self {
            center,
            latitude_delta: FOCUS_SPAN,
            longitude_delta: FOCUS_SPAN,
        }
    }

    /// `(min, max)` longitude bounds, used as the map's x axis.
    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.longitude_delta / 2.0;
        [self.center.longitude - half, self.center.longitude + half]
    }

    /// `(min, max)` latitude bounds, used as the map's y axis.
    pub fn y_bounds(&self) -> [f64; 2] {
        let half = self.latitude_delta / 2.0;
        [self.center.latitude - half, self.center.latitude + half]
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        let [x_min, x_max] = self.x_bounds();
        let [y_min, y_max] = self.y_bounds();
        (x_min..=x_max).contains(&coordinate.longitude)
            && (y_min..=y_max).contains(&coordinate.latitude)
    }

    /// Grow or shrink the span by `factor`, keeping the centre.
    pub fn zoomed(&self, factor: f64) -> Self {
        Self {
            center: self.center,
            latitude_delta: self.latitude_delta * factor,
            longitude_delta: self.longitude_delta * factor,
        }
    }
}

impl Default for FocusRegion {
    fn default() -> Self {
        Self::around(DEFAULT_CENTER)
    }
}
