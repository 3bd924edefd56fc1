use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

/// Single-line text input with a character-based cursor.
pub struct InputBar {
    value: String,
    cursor_position: usize,
    title: String,
}

impl InputBar {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            cursor_position: 0,
            title: String::new(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_index = self
            .value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len());
        self.value.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let mut chars: Vec<char> = self.value.chars().collect();
        if self.cursor_position <= chars.len() {
            chars.remove(self.cursor_position - 1);
            self.value = chars.into_iter().collect();
            self.cursor_position -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
    }

    /// Replace the contents, leaving the cursor at the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor_position = self.value.chars().count();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow));

        let paragraph = Paragraph::new(self.value.as_str()).block(block);
        frame.render_widget(paragraph, area);

        let cursor_x = area.x + 1 + self.cursor_position as u16;
        let cursor_y = area.y + 1;
        if cursor_x < area.x + area.width.saturating_sub(1) {
            frame.set_cursor_position(ratatui::layout::Position {
                x: cursor_x,
                y: cursor_y,
            });
        }
    }
}

impl Default for InputBar {
    fn default() -> Self {
        Self::new()
    }
}
