use std::cmp::min;

/// Top-level tabs, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tab {
    Map,
    Places,
    Favorites,
    Search,
    About,
}

impl Tab {
    pub(crate) const ALL: [Tab; 5] = [Tab::Map, Tab::Places, Tab::Favorites, Tab::Search, Tab::About];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Map => "Map",
            Tab::Places => "Places",
            Tab::Favorites => "Favorites",
            Tab::Search => "Search",
            Tab::About => "About",
        }
    }

    pub(crate) fn index(self) -> usize {
        Tab::ALL
            .iter()
            .position(|tab| *tab == self)
            .unwrap_or_default()
    }

    /// Step through the tabs, wrapping at both ends.
    pub(crate) fn cycle(self, delta: isize) -> Tab {
        let len = Tab::ALL.len() as isize;
        let next = (self.index() as isize + delta).rem_euclid(len);
        Tab::ALL[next as usize]
    }
}

/// Selection index for a list whose length can change under it after every
/// reload.
#[derive(Default, Clone, Debug)]
pub(crate) struct ListCursor {
    pub(crate) selected: usize,
}

impl ListCursor {
    pub(crate) fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = (len - 1) as isize;
        let next = (self.selected as isize + delta).clamp(0, max);
        self.selected = next as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the cursor inside `len` items after the list shrank.
    pub(crate) fn clamp(&mut self, len: usize) {
        self.selected = min(self.selected, len.saturating_sub(1));
    }
}

/// Query text plus result cursor for the search tab.
#[derive(Default, Clone, Debug)]
pub(crate) struct SearchScreen {
    pub(crate) query: String,
    pub(crate) cursor: ListCursor,
}

impl SearchScreen {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.query.push(ch);
        self.cursor.select_first();
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.query.pop();
        self.cursor.select_first();
    }

    pub(crate) fn clear(&mut self) {
        self.query.clear();
        self.cursor.select_first();
    }
}
