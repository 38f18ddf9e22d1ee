use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Coordinate, Place};

/// Fields available within the place form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum PlaceField {
    #[default]
    Title,
    Description,
    Latitude,
    Longitude,
}

impl PlaceField {
    const ORDER: [PlaceField; 4] = [
        PlaceField::Title,
        PlaceField::Description,
        PlaceField::Latitude,
        PlaceField::Longitude,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            PlaceField::Title => "Title",
            PlaceField::Description => "Description",
            PlaceField::Latitude => "Latitude",
            PlaceField::Longitude => "Longitude",
        }
    }

    pub(crate) fn row(self) -> u16 {
        PlaceField::ORDER
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default() as u16
    }

    fn is_required(self) -> bool {
        !matches!(self, PlaceField::Description)
    }
}

/// Form state for creating or editing a place. Editing keeps the id and the
/// favorite flag so the saved place carries them through.
#[derive(Default, Clone, Debug)]
pub(crate) struct PlaceForm {
    pub(crate) id: Option<i64>,
    pub(crate) is_favorite: bool,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) latitude: String,
    pub(crate) longitude: String,
    pub(crate) active: PlaceField,
    pub(crate) error: Option<String>,
}

impl PlaceForm {
    /// Populate the form from an existing place when editing.
    pub(crate) fn from_place(place: &Place) -> Self {
        Self {
            id: place.id,
            is_favorite: place.is_favorite,
            title: place.title.clone(),
            description: place.description.clone().unwrap_or_default(),
            latitude: place.coordinate.latitude.to_string(),
            longitude: place.coordinate.longitude.to_string(),
            active: PlaceField::Title,
            error: None,
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn next_field(&mut self) {
        self.step_field(1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.step_field(-1);
    }

    fn step_field(&mut self, delta: isize) {
        let len = PlaceField::ORDER.len() as isize;
        let next = (self.active.row() as isize + delta).rem_euclid(len);
        self.active = PlaceField::ORDER[next as usize];
    }

    fn value(&self, field: PlaceField) -> &String {
        match field {
            PlaceField::Title => &self.title,
            PlaceField::Description => &self.description,
            PlaceField::Latitude => &self.latitude,
            PlaceField::Longitude => &self.longitude,
        }
    }

    fn value_mut(&mut self, field: PlaceField) -> &mut String {
        match field {
            PlaceField::Title => &mut self.title,
            PlaceField::Description => &mut self.description,
            PlaceField::Latitude => &mut self.latitude,
            PlaceField::Longitude => &mut self.longitude,
        }
    }

    /// Append a character to the active field. Coordinate fields only take
    /// characters that can appear in a decimal number.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let accepted = match self.active {
            PlaceField::Title | PlaceField::Description => !ch.is_control(),
            PlaceField::Latitude | PlaceField::Longitude => {
                ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.')
            }
        };
        if accepted {
            self.value_mut(self.active).push(ch);
        }
        accepted
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Validate the inputs and build the place to hand to the controller.
    pub(crate) fn parse_inputs(&self) -> Result<Place> {
        let title = self.title.trim();
        let latitude = self.latitude.trim();
        let longitude = self.longitude.trim();
        if title.is_empty() || latitude.is_empty() || longitude.is_empty() {
            return Err(anyhow!("Title, latitude and longitude are required."));
        }

        let coordinate = match (latitude.parse::<f64>(), longitude.parse::<f64>()) {
            (Ok(lat), Ok(lon)) if lat.is_finite() && lon.is_finite() => Coordinate::new(lat, lon),
            _ => return Err(anyhow!("Latitude and longitude must be valid numbers.")),
        };

        let description = Some(self.description.trim().to_string());
        let mut place = Place::new(title, description, coordinate);
        place.id = self.id;
        place.is_favorite = self.is_favorite;
        Ok(place)
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: PlaceField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            if field.is_required() {
                "<required>".to_string()
            } else {
                "<optional>".to_string()
            }
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Column where the cursor sits for the active field.
    pub(crate) fn cursor_offset(&self) -> u16 {
        let prefix = self.active.label().len() + 2;
        (prefix + self.value(self.active).chars().count()) as u16
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ConfirmPlaceDelete {
    pub(crate) place: Place,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(title: &str, latitude: &str, longitude: &str) -> PlaceForm {
        PlaceForm {
            title: title.to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            ..PlaceForm::default()
        }
    }

    #[test]
    fn parses_a_complete_draft() {
        let mut form = filled("  IFSUL Bagé ", "-31.3320", "-54.0717");
        form.description = "   ".to_string();
        let place = form.parse_inputs().expect("valid");
        assert_eq!(place.title, "IFSUL Bagé");
        assert_eq!(place.description, None);
        assert_eq!(place.coordinate, Coordinate::new(-31.332, -54.0717));
        assert_eq!(place.id, None);
    }

    #[test]
    fn requires_title_and_coordinates() {
        let err = filled("", "1", "2").parse_inputs().expect_err("missing title");
        assert_eq!(err.to_string(), "Title, latitude and longitude are required.");
        assert!(filled("Park", "", "2").parse_inputs().is_err());
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let err = filled("Park", "1.2.3", "2").parse_inputs().expect_err("bad number");
        assert_eq!(err.to_string(), "Latitude and longitude must be valid numbers.");
    }

    #[test]
    fn editing_keeps_id_and_favorite() {
        let original = Place {
            id: Some(7),
            title: "Museum".to_string(),
            description: Some("Old".to_string()),
            coordinate: Coordinate::new(1.0, 2.0),
            is_favorite: true,
        };
        let mut form = PlaceForm::from_place(&original);
        assert!(form.is_editing());
        form.description = "New".to_string();
        let place = form.parse_inputs().expect("valid");
        assert_eq!(place.id, Some(7));
        assert!(place.is_favorite);
        assert_eq!(place.description.as_deref(), Some("New"));
    }

    #[test]
    fn coordinate_fields_reject_letters() {
        let mut form = PlaceForm::default();
        form.next_field();
        form.next_field();
        assert_eq!(form.active, PlaceField::Latitude);
        assert!(!form.push_char('x'));
        assert!(form.push_char('-'));
        assert!(form.push_char('3'));
        assert_eq!(form.latitude, "-3");
        form.previous_field();
        assert!(form.push_char('x'));
        assert_eq!(form.description, "x");
    }
}
