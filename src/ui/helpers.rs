use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListItem;

use crate::models::Place;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Bookmark glyph plus color for the favorite flag.
pub(crate) fn favorite_marker(is_favorite: bool) -> Span<'static> {
    if is_favorite {
        Span::styled("★ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("☆ ", Style::default().fg(Color::DarkGray))
    }
}

/// Multi-line list entry: title, optional description, coordinates.
pub(crate) fn place_item(place: &Place) -> ListItem<'static> {
    let mut lines = vec![Line::from(vec![
        favorite_marker(place.is_favorite),
        Span::styled(
            place.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ])];
    if let Some(description) = &place.description {
        lines.push(Line::from(format!("  {description}")));
    }
    lines.push(Line::from(Span::styled(
        format!("  {}", place.coordinate),
        Style::default().fg(Color::Gray),
    )));
    ListItem::new(lines)
}
