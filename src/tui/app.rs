use crate::domain::Item;
use crate::screens::{DetailState, ListState};

const PAGE_STEP: usize = 10;

/// Render model for one frame: the latest screen states plus selection.
pub struct TuiApp {
    pub list: ListState,
    pub detail: Option<DetailState>,
    pub item_index: usize,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            list: ListState::default(),
            detail: None,
            item_index: 0,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn showing_detail(&self) -> bool {
        self.detail.is_some()
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.list.items.get(self.item_index)
    }

    /// Take a new list state, keeping the selection inside the list.
    pub fn set_list(&mut self, list: ListState) {
        self.list = list;
        if self.item_index >= self.list.items.len() {
            self.item_index = self.list.items.len().saturating_sub(1);
        }
    }

    pub fn move_up(&mut self) {
        self.item_index = self.item_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.item_index + 1 < self.list.items.len() {
            self.item_index += 1;
        }
    }

    pub fn page_up(&mut self) {
        self.item_index = self.item_index.saturating_sub(PAGE_STEP);
    }

    pub fn page_down(&mut self) {
        let last = self.list.items.len().saturating_sub(1);
        self.item_index = (self.item_index + PAGE_STEP).min(last);
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn list_of(n: usize) -> ListState {
        ListState {
            items: Arc::new(
                (1..=n as i64)
                    .map(|id| Item {
                        id,
                        title: format!("item {}", id),
                        image_url: String::new(),
                    })
                    .collect(),
            ),
            is_loading: false,
            is_appending: false,
            end_reached: true,
            error_message: None,
        }
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut app = TuiApp::new();
        app.set_list(list_of(3));

        app.move_up();
        assert_eq!(app.item_index, 0);
        app.page_down();
        assert_eq!(app.item_index, 2);
        app.move_down();
        assert_eq!(app.item_index, 2);
        assert_eq!(app.selected_item().map(|i| i.id), Some(3));
    }

    #[test]
    fn test_shrinking_list_clamps_selection() {
        let mut app = TuiApp::new();
        app.set_list(list_of(30));
        app.page_down();
        app.page_down();
        assert_eq!(app.item_index, 20);

        app.set_list(list_of(5));
        assert_eq!(app.item_index, 4);

        app.set_list(list_of(0));
        assert_eq!(app.item_index, 0);
        assert!(app.selected_item().is_none());
    }
}
