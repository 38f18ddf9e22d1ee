use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::Canvas;
use ratatui::widgets::{Block, Borders, Clear, List, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tracing::{error, info};

use crate::error::PlaceError;
use crate::models::Place;
use crate::places::PlaceList;

use super::forms::{ConfirmPlaceDelete, PlaceField, PlaceForm};
use super::helpers::{centered_rect, place_item, surface_error};
use super::screens::{ListCursor, SearchScreen, Tab};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the tab bar.
const HEADER_HEIGHT: u16 = 3;
/// Zoom step applied by the map's `+` / `-` keys.
const ZOOM_FACTOR: f64 = 2.0;
/// Bounds for the zoom multiplier, so the canvas span stays usable.
const MIN_ZOOM: f64 = 1.0 / 1024.0;
const MAX_ZOOM: f64 = 1024.0;
/// Links listed on the About tab, opened with the number key next to them.
const ABOUT_LINKS: &[(&str, &str)] = &[
    ("Contact", "mailto:email@example.com"),
    ("Source", "https://github.com/place-keeper/place-keeper"),
];

/// Popups and edit states layered over the active tab.
enum Mode {
    Normal,
    AddingPlace(PlaceForm),
    EditingPlace(PlaceForm),
    ConfirmDelete(ConfirmPlaceDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    places: PlaceList,
    tab: Tab,
    mode: Mode,
    places_cursor: ListCursor,
    favorites_cursor: ListCursor,
    search: SearchScreen,
    /// Multiplier applied to the focus region's span on the map tab.
    zoom: f64,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(places: PlaceList) -> Self {
        Self {
            places,
            tab: Tab::Places,
            mode: Mode::Normal,
            places_cursor: ListCursor::default(),
            favorites_cursor: ListCursor::default(),
            search: SearchScreen::default(),
            zoom: 1.0,
            status: None,
        }
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingPlace(form) => self.handle_form(code, form, Mode::AddingPlace),
            Mode::EditingPlace(form) => self.handle_form(code, form, Mode::EditingPlace),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Tab => {
                self.switch_tab(self.tab.cycle(1));
                return Mode::Normal;
            }
            KeyCode::BackTab => {
                self.switch_tab(self.tab.cycle(-1));
                return Mode::Normal;
            }
            _ => {}
        }

        if self.tab == Tab::Search {
            return self.handle_search_key(code);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Char(digit @ '1'..='5') => {
                let index = digit as usize - '1' as usize;
                self.switch_tab(Tab::ALL[index]);
            }
            _ => match self.tab {
                Tab::Map => self.handle_map_key(code),
                Tab::Places | Tab::Favorites => return self.handle_list_key(code),
                Tab::About => self.handle_about_key(code),
                Tab::Search => {}
            },
        }
        Mode::Normal
    }

    fn handle_map_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom_by(1.0 / ZOOM_FACTOR),
            KeyCode::Char('-') => self.zoom_by(ZOOM_FACTOR),
            KeyCode::Char('0') => self.zoom = 1.0,
            _ => {}
        }
    }

    fn zoom_by(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn handle_list_key(&mut self, code: KeyCode) -> Mode {
        let len = self.current_list_len();
        match code {
            KeyCode::Up => self.active_cursor().move_by(-1, len),
            KeyCode::Down => self.active_cursor().move_by(1, len),
            KeyCode::PageUp => self.active_cursor().move_by(-5, len),
            KeyCode::PageDown => self.active_cursor().move_by(5, len),
            KeyCode::Home => self.active_cursor().select_first(),
            KeyCode::End => self.active_cursor().select_last(len),
            KeyCode::Enter => self.show_on_map(),
            KeyCode::Char('f') | KeyCode::Char('F') => self.toggle_favorite(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.speak(),
            KeyCode::Char('+') if self.tab == Tab::Places => {
                self.clear_status();
                return Mode::AddingPlace(PlaceForm::default());
            }
            KeyCode::Char('e') | KeyCode::Char('E') if self.tab == Tab::Places => {
                if let Some(place) = self.current_place() {
                    self.clear_status();
                    return Mode::EditingPlace(PlaceForm::from_place(&place));
                }
                self.set_status("No place selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') | KeyCode::Delete if self.tab == Tab::Places => {
                if let Some(place) = self.current_place() {
                    self.clear_status();
                    return Mode::ConfirmDelete(ConfirmPlaceDelete { place });
                }
                self.set_status("No place selected to delete.", StatusKind::Error);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_search_key(&mut self, code: KeyCode) -> Mode {
        let len = self.current_list_len();
        match code {
            KeyCode::Esc => {
                if self.search.query.is_empty() {
                    self.switch_tab(Tab::Places);
                } else {
                    self.search.clear();
                }
            }
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Up => self.search.cursor.move_by(-1, len),
            KeyCode::Down => self.search.cursor.move_by(1, len),
            KeyCode::Enter => self.show_on_map(),
            KeyCode::Char(ch) => {
                self.search.push_char(ch);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_about_key(&mut self, code: KeyCode) {
        let KeyCode::Char(ch) = code else {
            return;
        };
        let Some((label, url)) = ch
            .to_digit(10)
            .and_then(|n| (n as usize).checked_sub(6))
            .and_then(|index| ABOUT_LINKS.get(index))
        else {
            return;
        };
        match open_link(url) {
            Ok(()) => self.set_status(format!("Opened {label}."), StatusKind::Info),
            Err(err) => {
                self.set_status(format!("Failed to open link: {err}"), StatusKind::Error)
            }
        }
    }

    fn handle_form(
        &mut self,
        code: KeyCode,
        mut form: PlaceForm,
        wrap: fn(PlaceForm) -> Mode,
    ) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.submit_form(&form) {
                Ok(status) => {
                    self.status = Some(status);
                    return Mode::Normal;
                }
                Err(err) => form.error = Some(surface_error(&err)),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        wrap(form)
    }

    /// Hand the form's place to the controller; form errors never reach
    /// storage. A write that committed closes the form even when the list
    /// refresh after it failed.
    fn submit_form(&mut self, form: &PlaceForm) -> Result<StatusMessage> {
        let place = form.parse_inputs()?;
        let saved = if form.is_editing() {
            self.places.update(&place).map(|()| None)
        } else {
            self.places.create(&place).map(Some)
        };

        match saved {
            Ok(new_id) => {
                self.zoom = 1.0;
                let text = match new_id {
                    Some(id) => {
                        self.select_place(id);
                        format!("Added \"{}\".", place.title)
                    }
                    None => format!("Saved changes to \"{}\".", place.title),
                };
                Ok(StatusMessage {
                    text,
                    kind: StatusKind::Info,
                })
            }
            Err(PlaceError::Unsynced { id, source }) => {
                error!(id, error = %source, "saved place but could not refresh list");
                Ok(StatusMessage {
                    text: format!(
                        "Saved \"{}\", but the list could not be refreshed: {source}",
                        place.title
                    ),
                    kind: StatusKind::Error,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmPlaceDelete) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.places.delete(&confirm.place) {
                    Ok(()) => {
                        self.clamp_cursors();
                        self.set_status(
                            format!("Deleted \"{}\".", confirm.place.title),
                            StatusKind::Info,
                        );
                    }
                    Err(err) => self.report_failure("delete", &err),
                }
                Mode::Normal
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn toggle_favorite(&mut self) {
        let Some(place) = self.current_place() else {
            self.set_status("No place selected.", StatusKind::Error);
            return;
        };
        match self.places.toggle_favorite(&place) {
            Ok(true) => self.set_status(
                format!("Added \"{}\" to favorites.", place.title),
                StatusKind::Info,
            ),
            Ok(false) => {
                self.clamp_cursors();
                self.set_status(
                    format!("Removed \"{}\" from favorites.", place.title),
                    StatusKind::Info,
                );
            }
            Err(err) => self.report_failure("update favorite", &err),
        }
    }

    /// The speech collaborator is outside this program; we surface the text
    /// it would receive.
    fn speak(&mut self) {
        match self.current_place() {
            Some(place) => {
                let text = place.spoken_text().to_string();
                info!(id = ?place.id, "speech requested");
                self.set_status(format!("Speaking: {text}"), StatusKind::Info);
            }
            None => self.set_status("No place selected.", StatusKind::Error),
        }
    }

    fn show_on_map(&mut self) {
        let Some(place) = self.current_place() else {
            return;
        };
        self.places.focus_on(&place);
        self.zoom = 1.0;
        self.tab = Tab::Map;
        self.set_status(format!("Showing \"{}\" on the map.", place.title), StatusKind::Info);
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.clear_status();
        self.clamp_cursors();
    }

    fn active_cursor(&mut self) -> &mut ListCursor {
        match self.tab {
            Tab::Favorites => &mut self.favorites_cursor,
            Tab::Search => &mut self.search.cursor,
            _ => &mut self.places_cursor,
        }
    }

    /// Places shown by the active tab, in display order.
    fn visible_places(&self) -> Vec<&Place> {
        match self.tab {
            Tab::Favorites => self.places.favorites(),
            Tab::Search => self.places.search(&self.search.query),
            _ => self.places.places().iter().collect(),
        }
    }

    fn current_list_len(&self) -> usize {
        self.visible_places().len()
    }

    fn current_place(&self) -> Option<Place> {
        let selected = match self.tab {
            Tab::Favorites => self.favorites_cursor.selected,
            Tab::Search => self.search.cursor.selected,
            _ => self.places_cursor.selected,
        };
        self.visible_places().get(selected).map(|place| (*place).clone())
    }

    fn select_place(&mut self, id: i64) {
        if let Some(index) = self
            .places
            .places()
            .iter()
            .position(|place| place.id == Some(id))
        {
            self.places_cursor.selected = index;
        }
    }

    fn clamp_cursors(&mut self) {
        self.places_cursor.clamp(self.places.places().len());
        self.favorites_cursor.clamp(self.places.favorites().len());
        let found = self.places.search(&self.search.query).len();
        self.search.cursor.clamp(found);
    }

    fn report_failure(&mut self, action: &str, err: &PlaceError) {
        error!(action, error = %err, "place operation failed");
        let text = match err {
            PlaceError::Unsynced { source, .. } => {
                format!("Change saved, but the list could not be refreshed: {source}")
            }
            _ => format!("Could not {action}: {err}"),
        };
        self.set_status(text, StatusKind::Error);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.tab {
            Tab::Map => self.draw_map(frame, chunks[1]),
            Tab::Places => self.draw_place_list(
                frame,
                chunks[1],
                "Saved Places",
                "No places saved yet. Press '+' to add one.",
                &self.places_cursor,
            ),
            Tab::Favorites => self.draw_place_list(
                frame,
                chunks[1],
                "Favorites",
                "No favorites yet. Press 'f' on a place to bookmark it.",
                &self.favorites_cursor,
            ),
            Tab::Search => self.draw_search(frame, chunks[1]),
            Tab::About => self.draw_about(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::AddingPlace(form) => self.draw_form(frame, area, "New Place", form),
            Mode::EditingPlace(form) => self.draw_form(frame, area, "Edit Place", form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Place Keeper"))
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_map(&self, frame: &mut Frame, area: Rect) {
        let region = self.places.focus_region().zoomed(self.zoom);
        let center = region.center;
        let markers: Vec<&Place> = self
            .places
            .places()
            .iter()
            .filter(|place| region.contains(place.coordinate))
            .collect();

        let title = format!(
            "Map ({:.4}, {:.4}) span {:.4}°",
            center.latitude, center.longitude, region.latitude_delta
        );
        let canvas = Canvas::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .x_bounds(region.x_bounds())
            .y_bounds(region.y_bounds())
            .paint(move |ctx| {
                for place in &markers {
                    let (glyph, color) = if place.is_favorite {
                        ("◉", Color::Red)
                    } else {
                        ("○", Color::Blue)
                    };
                    ctx.print(
                        place.coordinate.longitude,
                        place.coordinate.latitude,
                        Line::from(vec![
                            Span::styled(glyph, Style::default().fg(color)),
                            Span::raw(format!(" {}", place.title)),
                        ]),
                    );
                }
            });
        frame.render_widget(canvas, area);
    }

    fn draw_place_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        empty_message: &str,
        cursor: &ListCursor,
    ) {
        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        let places = self.visible_places();
        if places.is_empty() {
            let message = Paragraph::new(empty_message.to_string())
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<_> = places.iter().map(|place| place_item(place)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(cursor.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let input = Paragraph::new(Span::raw(self.search.query.clone()))
            .block(Block::default().borders(Borders::ALL).title("Search by name or description"));
        frame.render_widget(input, chunks[0]);
        frame.set_cursor_position((
            chunks[0].x + 1 + self.search.query.chars().count() as u16,
            chunks[0].y + 1,
        ));

        let empty = if self.search.query.trim().is_empty() {
            ""
        } else {
            "No places found."
        };
        self.draw_place_list(frame, chunks[1], "Results", empty, &self.search.cursor);
    }

    fn draw_about(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(
                "About Place Keeper",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(
                "Keep track of places of interest: add them, mark favorites, \
                 find them by name or description, and see them on the map.",
            ),
            Line::from(""),
            Line::from(format!("Version: {}", env!("CARGO_PKG_VERSION"))),
            Line::from(""),
        ];
        for (index, (label, url)) in ABOUT_LINKS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] {label}: ", index + 6),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    url.to_string(),
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let text = match self.tab {
            Tab::Map => "+/- zoom • 0 reset zoom • Tab next tab • q quit",
            Tab::Places => {
                "↑/↓ select • Enter map • + add • e edit • - delete • f favorite • s speak • q quit"
            }
            Tab::Favorites => "↑/↓ select • Enter map • f unfavorite • s speak • q quit",
            Tab::Search => "type to search • ↑/↓ select • Enter map • Esc clear • Ctrl-C quit",
            Tab::About => "6/7 open link • Tab next tab • q quit",
        };
        Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &PlaceForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(PlaceField::Title),
            form.build_line(PlaceField::Description),
            form.build_line(PlaceField::Latitude),
            form.build_line(PlaceField::Longitude),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch field • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
        frame.set_cursor_position((
            inner.x + form.cursor_offset(),
            inner.y + form.active.row(),
        ));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmPlaceDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete \"{}\"?", confirm.place.title)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::Coordinate;

    fn app_with(titles: &[&str]) -> App {
        let store = Database::open_in_memory()
            .and_then(|db| db.initialize(false))
            .expect("store");
        let mut places = PlaceList::load(store).expect("list");
        for (i, title) in titles.iter().enumerate() {
            places
                .create(&Place::new(*title, None, Coordinate::new(i as f64, 0.0)))
                .expect("seed");
        }
        App::new(places)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).expect("key");
        }
    }

    #[test]
    fn adding_a_place_through_the_form() {
        let mut app = app_with(&[]);
        app.handle_key(KeyCode::Char('+')).expect("open form");
        assert!(matches!(app.mode, Mode::AddingPlace(_)));

        type_text(&mut app, "Museum");
        app.handle_key(KeyCode::Tab).expect("description");
        app.handle_key(KeyCode::Tab).expect("latitude");
        type_text(&mut app, "-31.33");
        app.handle_key(KeyCode::Tab).expect("longitude");
        type_text(&mut app, "-54.07");
        app.handle_key(KeyCode::Enter).expect("save");

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.places.places().len(), 1);
        assert_eq!(app.places.places()[0].title, "Museum");
        assert_eq!(
            app.places.focus_region().center,
            Coordinate::new(-31.33, -54.07)
        );
    }

    #[test]
    fn invalid_form_stays_open_with_error() {
        let mut app = app_with(&[]);
        app.handle_key(KeyCode::Char('+')).expect("open form");
        app.handle_key(KeyCode::Enter).expect("save");
        match &app.mode {
            Mode::AddingPlace(form) => assert!(form.error.is_some()),
            _ => panic!("form should stay open"),
        }
        assert!(app.places.places().is_empty());
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app_with(&["Keep", "Drop"]);
        app.handle_key(KeyCode::Down).expect("select second");
        app.handle_key(KeyCode::Char('-')).expect("ask");
        app.handle_key(KeyCode::Char('n')).expect("cancel");
        assert_eq!(app.places.places().len(), 2);

        app.handle_key(KeyCode::Char('-')).expect("ask");
        app.handle_key(KeyCode::Char('y')).expect("confirm");
        let titles: Vec<_> = app.places.places().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Keep"]);
        assert_eq!(app.places_cursor.selected, 0);
    }

    #[test]
    fn favorites_tab_follows_toggles() {
        let mut app = app_with(&["Park", "Museum"]);
        app.handle_key(KeyCode::Char('f')).expect("favorite");
        app.handle_key(KeyCode::Char('3')).expect("favorites tab");
        assert_eq!(app.tab, Tab::Favorites);
        assert_eq!(app.visible_places().len(), 1);

        app.handle_key(KeyCode::Char('f')).expect("unfavorite");
        assert!(app.visible_places().is_empty());
    }

    #[test]
    fn search_tab_consumes_letters_and_focuses_results() {
        let mut app = app_with(&["Quarry", "Museum"]);
        app.switch_tab(Tab::Search);
        assert!(app.visible_places().is_empty());

        type_text(&mut app, "qua");
        assert_eq!(app.search.query, "qua");
        assert_eq!(app.visible_places().len(), 1);

        app.handle_key(KeyCode::Enter).expect("show on map");
        assert_eq!(app.tab, Tab::Map);
        assert_eq!(app.places.focus_region().center, Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn committed_save_closes_form_when_refresh_fails() {
        let mut app = app_with(&["Park"]);
        app.places
            .store()
            .conn
            .execute(
                "INSERT INTO place (title, description, latitude, longitude, isFavorite)
                 VALUES ('Broken', '', NULL, 0, 0)",
                [],
            )
            .expect("raw insert");

        app.handle_key(KeyCode::Char('+')).expect("open form");
        type_text(&mut app, "Museum");
        app.handle_key(KeyCode::Tab).expect("description");
        app.handle_key(KeyCode::Tab).expect("latitude");
        type_text(&mut app, "1");
        app.handle_key(KeyCode::Tab).expect("longitude");
        type_text(&mut app, "2");
        app.handle_key(KeyCode::Enter).expect("save");

        assert!(matches!(app.mode, Mode::Normal));
        assert!(matches!(
            app.status.as_ref().map(|status| &status.kind),
            Some(StatusKind::Error)
        ));
        assert_eq!(app.places.places().len(), 1);

        // Enter again lands on the list, not a resubmitted form.
        app.handle_key(KeyCode::Enter).expect("enter");
        let museums: i64 = app
            .places
            .store()
            .conn
            .query_row(
                "SELECT COUNT(*) FROM place WHERE title = 'Museum'",
                [],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(museums, 1);
    }

    #[test]
    fn map_zoom_is_bounded() {
        let mut app = app_with(&[]);
        app.switch_tab(Tab::Map);
        for _ in 0..40 {
            app.handle_key(KeyCode::Char('+')).expect("zoom in");
        }
        assert_eq!(app.zoom, MIN_ZOOM);
        for _ in 0..80 {
            app.handle_key(KeyCode::Char('-')).expect("zoom out");
        }
        assert_eq!(app.zoom, MAX_ZOOM);
        app.handle_key(KeyCode::Char('0')).expect("reset");
        assert_eq!(app.zoom, 1.0);
    }

    #[test]
    fn quit_from_list_tabs() {
        let mut app = app_with(&[]);
        assert!(app.handle_key(KeyCode::Char('q')).expect("quit"));
    }
}
