use ratatui::widgets::{ListItem, ListState, ScrollbarState};
use std::collections::VecDeque;

/// Bounded list of rendered lines with a selection and a matching
/// scrollbar. Newest items go first so the list reads bottom to top.
pub struct ScrollableList {
    max_items: usize,
    pub list_items: VecDeque<ListItem<'static>>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
}

impl ScrollableList {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            list_items: VecDeque::new(),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::new(0),
        }
    }

    /// Add an item, evicting the oldest once full
    pub fn push(&mut self, item: ListItem<'static>) {
        if self.list_items.len() == self.max_items {
            self.list_items.pop_back();
        }
        self.list_items.push_front(item);
        self.scroll_state = self.scroll_state.content_length(self.list_items.len());
        self.jump_to_last();
    }

    pub fn clear(&mut self) {
        self.list_items.clear();
        self.list_state.select(None);
        self.scroll_state = ScrollbarState::new(0);
    }

    pub fn len(&self) -> usize {
        self.list_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list_items.is_empty()
    }

    /// Select the oldest item
    pub fn jump_to_first(&mut self) {
        if let Some(idx) = self.list_items.len().checked_sub(1) {
            self.select(idx);
        }
    }

    /// Select the newest item
    pub fn jump_to_last(&mut self) {
        if !self.list_items.is_empty() {
            self.select(0);
        }
    }

    /// Move towards older items
    pub fn move_up(&mut self) {
        let next = self
            .list_state
            .selected()
            .map_or(0, |idx| idx.saturating_add(1));
        if next < self.list_items.len() {
            self.select(next);
        }
    }

    /// Move towards newer items
    pub fn move_down(&mut self) {
        if let Some(idx) = self.list_state.selected() {
            self.select(idx.saturating_sub(1));
        }
    }

    fn select(&mut self, idx: usize) {
        self.list_state.select(Some(idx));
        // The scrollbar runs top to bottom; the list runs bottom to top.
        let position = self.list_items.len().saturating_sub(idx + 1);
        self.scroll_state = self.scroll_state.position(position);
    }
}

/// Single-line text input with a character cursor
#[derive(Default)]
pub struct UserInput {
    pub value: String,
    /// Cursor position in characters, not bytes
    pub char_idx: usize,
}

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_idx(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.char_idx)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn input(&mut self, c: char) {
        let idx = self.byte_idx();
        self.value.insert(idx, c);
        self.move_right();
    }

    pub fn backspace(&mut self) {
        if self.char_idx > 0 {
            self.move_left();
            self.delete();
        }
    }

    pub fn delete(&mut self) {
        let idx = self.byte_idx();
        if idx < self.value.len() {
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.char_idx = self.char_idx.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.char_idx = (self.char_idx + 1).min(self.char_count());
    }

    pub fn jump_to_first(&mut self) {
        self.char_idx = 0;
    }

    pub fn jump_to_last(&mut self) {
        self.char_idx = self.char_count();
    }

    /// Take the current value and reset the input
    pub fn submit(&mut self) -> String {
        self.char_idx = 0;
        std::mem::take(&mut self.value)
    }

    /// Same length as the value, with every character masked
    pub fn masked(&self) -> String {
        "*".repeat(self.char_count())
    }
}
