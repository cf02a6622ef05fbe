/// Result list display state
pub struct ListState {
    /// Whether the result list is shown
    pub open: bool,
    /// Highlighted row
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            open: false,
            selected: None,
            scroll_offset: 0,
            visible_rows: 20,
        }
    }
}

impl ListState {
    /// Reset the cursor after the result set was replaced
    pub fn reset(&mut self, total: usize) {
        self.selected = if total == 0 { None } else { Some(0) };
        self.scroll_offset = 0;
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.saturating_sub(1);
        let i = match self.selected {
            Some(i) => (i + jump).min(total - 1),
            None => jump.min(total - 1),
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_up(&mut self) {
        let jump = self.visible_rows.saturating_sub(1);
        let i = match self.selected {
            Some(i) => i.saturating_sub(jump),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_first(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(0);
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(total - 1);
        self.ensure_visible(total - 1);
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}
