use std::ops::Range;

use thiserror::Error;

/// Rows of pattern names that fit on a 128x64 panel under the title.
pub const DEFAULT_VIEWPORT: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("A menu needs at least one item")]
    Empty,

    #[error("A menu viewport needs at least one row")]
    NoViewport,
}

/// A cursor over a fixed list of pattern keys, with a scrolling window of `viewport` rows.
///
/// The selected index is always in range and the window always shows it.
#[derive(Debug, Clone)]
pub struct SelectionMenu {
    items: Vec<String>,
    selected: usize,
    start: usize,
    viewport: usize,
}

impl SelectionMenu {
    pub fn new<I, S>(items: I, viewport: usize) -> Result<Self, MenuError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();

        if items.is_empty() {
            return Err(MenuError::Empty);
        }

        if viewport == 0 {
            return Err(MenuError::NoViewport);
        }

        Ok(Self {
            items,
            selected: 0,
            start: 0,
            viewport,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move to the next item, wrapping back to the first after the last.
    pub fn advance(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
        self.scroll();
    }

    /// Key of the selected item
    pub fn confirm(&self) -> &str {
        &self.items[self.selected]
    }

    /// Indices of the visible items
    pub fn window(&self) -> Range<usize> {
        self.start..(self.start + self.viewport).min(self.items.len())
    }

    /// Visible items as `(index, key, is_selected)`
    pub fn visible(&self) -> impl Iterator<Item = (usize, &str, bool)> {
        self.window()
            .map(|i| (i, self.items[i].as_str(), i == self.selected))
    }

    // Keep the cursor `viewport / 2` rows from the top where possible, without scrolling past
    // either end of the list.
    fn scroll(&mut self) {
        let max_start = self.items.len().saturating_sub(self.viewport);

        self.start = self
            .selected
            .saturating_sub(self.viewport / 2)
            .min(max_start);
    }
}

#[cfg(test)]
mod tests {
    use super::MenuError;
    use super::SelectionMenu;

    fn menu(n: usize, viewport: usize) -> SelectionMenu {
        SelectionMenu::new((0..n).map(|i| format!("p{i}")), viewport).unwrap()
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            SelectionMenu::new(Vec::<String>::new(), 5).unwrap_err(),
            MenuError::Empty
        );
        assert_eq!(
            SelectionMenu::new(["a"], 0).unwrap_err(),
            MenuError::NoViewport
        );
    }

    #[test]
    fn advance_wraps() {
        let mut m = menu(3, 5);

        m.advance();
        m.advance();
        assert_eq!(m.confirm(), "p2");

        m.advance();
        assert_eq!(m.selected(), 0);
        assert_eq!(m.confirm(), "p0");
    }

    #[test]
    fn window_follows_selection() {
        let mut m = menu(12, 5);

        let mut windows = Vec::new();
        for _ in 0..12 {
            windows.push(m.window().start);
            m.advance();
        }

        assert_eq!(windows, vec![0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 7, 7]);

        // wrapped back to the top
        assert_eq!(m.window(), 0..5);
    }

    #[test]
    fn short_list_never_scrolls() {
        let mut m = menu(3, 5);

        for _ in 0..7 {
            m.advance();
            assert_eq!(m.window(), 0..3);
        }
    }

    #[test]
    fn visible_marks_selection() {
        let mut m = menu(8, 3);
        m.advance();
        m.advance();

        let visible: Vec<_> = m.visible().collect();
        assert_eq!(
            visible,
            vec![(1, "p1", false), (2, "p2", true), (3, "p3", false)]
        );
    }
}
