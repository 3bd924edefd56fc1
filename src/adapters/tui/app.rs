use chrono::{Local, NaiveDate};
use color_eyre::Result;

use super::{
    event::{AppEvent, EventHandler},
    widgets::InputBar,
};
use crate::application::{column_drop_zone_id, BoardManager};
use crate::domain::{
    truncate_text, Column, ColumnId, ColumnUpdate, NewTask, Tag, Task, TaskId, TaskUpdate, Theme,
    TAG_COLORS,
};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    NewTask,
    NewColumn,
    EditTitle,
    RenameColumn,
    AddTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Board,
    Input(InputPurpose),
    Help,
}

pub struct App {
    manager: BoardManager,

    // UI State
    mode: AppMode,
    focused_column: usize,
    selected_row: usize,
    input: InputBar,
    status_message: Option<String>,

    // Task picked up with Space, until drop or cancel
    dragged: Option<TaskId>,
}

impl App {
    pub fn new(manager: BoardManager) -> Self {
        Self {
            manager,
            mode: AppMode::Board,
            focused_column: 0,
            selected_row: 0,
            input: InputBar::new(),
            status_message: None,
            dragged: None,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn manager(&self) -> &BoardManager {
        &self.manager
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    fn column_ids(&self) -> Vec<ColumnId> {
        self.manager
            .columns()
            .columns()
            .into_iter()
            .map(|c| c.id.clone())
            .collect()
    }

    fn focused_column_id(&self) -> Option<ColumnId> {
        self.column_ids().get(self.focused_column).cloned()
    }

    fn focused_tasks(&self) -> Vec<&Task> {
        match self.manager.columns().columns().get(self.focused_column) {
            Some(column) => self.manager.visible_tasks(&column.id),
            None => Vec::new(),
        }
    }

    fn selected_task_id(&self) -> Option<TaskId> {
        self.focused_tasks()
            .get(self.selected_row)
            .map(|t| t.id.clone())
    }

    /// The drop target under the cursor: a task, or the column's drop zone
    /// once the cursor is past the last task.
    fn hover_target(&self) -> Option<String> {
        let column_id = self.focused_column_id()?;
        let target = match self.focused_tasks().get(self.selected_row) {
            Some(task) => task.id.0.clone(),
            None => column_drop_zone_id(&column_id),
        };
        Some(target)
    }

    fn clamp_selection(&mut self) {
        let column_count = self.manager.columns().columns().len();
        if column_count == 0 {
            self.focused_column = 0;
            self.selected_row = 0;
            return;
        }
        self.focused_column = self.focused_column.min(column_count - 1);

        // While dragging the row past the last task is the drop zone
        let task_count = self.focused_tasks().len();
        let max_row = if self.dragged.is_some() {
            task_count
        } else {
            task_count.saturating_sub(1)
        };
        self.selected_row = self.selected_row.min(max_row);
    }

    fn move_cursor(&mut self, columns: isize, rows: isize) {
        if columns != 0 {
            let count = self.manager.columns().columns().len() as isize;
            if count > 0 {
                self.focused_column = (self.focused_column as isize + columns).clamp(0, count - 1) as usize;
            }
        }
        if rows != 0 {
            self.selected_row = (self.selected_row as isize + rows).max(0) as usize;
        }
        self.clamp_selection();

        if self.dragged.is_some() {
            let target = self.hover_target();
            self.manager.drag_over(target.as_deref());
        }
    }

    /// Put the cursor on a task wherever it now lives.
    fn focus_task(&mut self, task_id: &TaskId) {
        let Some(column_id) = self.manager.tasks().get_task(task_id).map(|t| t.column_id.clone())
        else {
            return;
        };
        if let Some(index) = self.column_ids().iter().position(|id| *id == column_id) {
            self.focused_column = index;
        }
        if let Some(row) = self
            .manager
            .visible_tasks(&column_id)
            .iter()
            .position(|t| &t.id == task_id)
        {
            self.selected_row = row;
        }
        self.clamp_selection();
    }

    /// Returns true when the application should exit.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        if event == AppEvent::Quit {
            return true;
        }

        match self.mode {
            AppMode::Help => {
                if event != AppEvent::Tick {
                    self.mode = AppMode::Board;
                }
                false
            }
            AppMode::Input(purpose) => {
                self.handle_input_event(purpose, event);
                false
            }
            AppMode::Board => self.handle_board_event(event),
        }
    }

    fn handle_input_event(&mut self, purpose: InputPurpose, event: AppEvent) {
        match event {
            AppEvent::Character(c) => self.input.insert_char(c),
            AppEvent::Backspace => self.input.delete_char(),
            AppEvent::Escape => {
                self.input.clear();
                self.mode = AppMode::Board;
            }
            AppEvent::Enter => {
                let value = self.input.value().trim().to_string();
                self.input.clear();
                self.mode = AppMode::Board;
                if value.is_empty() {
                    return;
                }
                match purpose {
                    InputPurpose::NewTask => self.add_task(value),
                    InputPurpose::NewColumn => {
                        self.manager.columns_mut().add_column(&value, None);
                        self.focused_column = self.manager.columns().columns().len() - 1;
                        self.selected_row = 0;
                        self.status_message = Some(format!("Added column '{value}'"));
                    }
                    InputPurpose::EditTitle => self.edit_title(value),
                    InputPurpose::RenameColumn => self.rename_column(value),
                    InputPurpose::AddTag => self.add_tag(&value),
                }
            }
            _ => {}
        }
    }

    fn handle_board_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Left => self.move_cursor(-1, 0),
            AppEvent::Right => self.move_cursor(1, 0),
            AppEvent::Up => self.move_cursor(0, -1),
            AppEvent::Down => self.move_cursor(0, 1),
            AppEvent::Enter => self.pick_up_or_drop(),
            AppEvent::Escape => self.cancel_drag(),
            AppEvent::Character(c) => return self.handle_board_key(c),
            AppEvent::Backspace | AppEvent::Tick | AppEvent::Quit => {}
        }
        false
    }

    fn handle_board_key(&mut self, c: char) -> bool {
        match c {
            'q' => return true,
            'h' => self.move_cursor(-1, 0),
            'l' => self.move_cursor(1, 0),
            'k' => self.move_cursor(0, -1),
            'j' => self.move_cursor(0, 1),
            ' ' => self.pick_up_or_drop(),
            '?' => self.mode = AppMode::Help,
            _ if self.dragged.is_some() => {
                self.status_message = Some("Drop or cancel (Esc) the task first".to_string());
            }
            'a' => self.start_input(InputPurpose::NewTask),
            'N' => self.start_input(InputPurpose::NewColumn),
            'e' => self.start_input(InputPurpose::EditTitle),
            'r' => self.start_input(InputPurpose::RenameColumn),
            'T' => self.start_input(InputPurpose::AddTag),
            'u' => self.remove_last_tag(),
            'c' => self.toggle_completion(),
            'x' => self.toggle_blocked(),
            'p' => self.cycle_priority(),
            'd' => self.delete_task(),
            'D' => self.delete_column(),
            '<' => self.shift_column(-1),
            '>' => self.shift_column(1),
            'H' => {
                self.manager.settings_mut().toggle_show_completed_tasks();
                self.clamp_selection();
            }
            't' => self.manager.settings_mut().toggle_theme(),
            _ => {}
        }
        false
    }

    fn start_input(&mut self, purpose: InputPurpose) {
        let column_title = self
            .manager
            .columns()
            .columns()
            .get(self.focused_column)
            .map(|c| c.title.clone());
        let task_title = self
            .selected_task_id()
            .and_then(|id| self.manager.tasks().get_task(&id).map(|t| t.title.clone()));

        let (title, value) = match purpose {
            InputPurpose::NewTask => {
                let column = column_title.unwrap_or_default();
                (format!("New task in {column} (Enter to add, Esc to cancel)"), None)
            }
            InputPurpose::NewColumn => {
                ("New column title (Enter to add, Esc to cancel)".to_string(), None)
            }
            InputPurpose::EditTitle => {
                let Some(current) = task_title else {
                    return;
                };
                ("Task title (Enter to save, Esc to cancel)".to_string(), Some(current))
            }
            InputPurpose::RenameColumn => {
                let Some(current) = column_title else {
                    return;
                };
                ("Column title (Enter to save, Esc to cancel)".to_string(), Some(current))
            }
            InputPurpose::AddTag => {
                if task_title.is_none() {
                    return;
                }
                ("Tag name, optionally name:#color (Enter to add)".to_string(), None)
            }
        };
        self.input.clear();
        if let Some(value) = value {
            self.input.set_value(value);
        }
        self.input.set_title(title);
        self.mode = AppMode::Input(purpose);
    }

    fn edit_title(&mut self, title: String) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let update = TaskUpdate {
            title: Some(title),
            ..Default::default()
        };
        match self.manager.tasks_mut().update_task(&id, update) {
            Ok(_) => self.status_message = Some("Task updated".to_string()),
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn rename_column(&mut self, title: String) {
        let Some(id) = self.focused_column_id() else {
            return;
        };
        let update = ColumnUpdate {
            title: Some(title),
            color: None,
        };
        if self.manager.columns_mut().update_column(&id, update) {
            self.status_message = Some("Column renamed".to_string());
        }
    }

    fn add_tag(&mut self, value: &str) {
        let Some(task) = self
            .selected_task_id()
            .and_then(|id| self.manager.tasks().get_task(&id).cloned())
        else {
            return;
        };
        let tag = match value.split_once(':') {
            Some((name, color)) => Tag::new(name, color),
            None => Tag::new(value, TAG_COLORS[task.tags.len() % TAG_COLORS.len()]),
        };
        match self.manager.tasks_mut().add_tag(&task.id, tag) {
            Ok(_) => self.status_message = Some("Tag added".to_string()),
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn remove_last_tag(&mut self) {
        let Some(task) = self
            .selected_task_id()
            .and_then(|id| self.manager.tasks().get_task(&id).cloned())
        else {
            return;
        };
        if let Some(tag) = task.tags.last() {
            self.manager.tasks_mut().remove_tag(&task.id, &tag.id);
            self.status_message = Some(format!("Removed tag '{}'", tag.name));
        }
    }

    fn add_task(&mut self, title: String) {
        let Some(column_id) = self.focused_column_id() else {
            self.status_message = Some("Add a column first (N)".to_string());
            return;
        };
        match self.manager.add_task(NewTask::new(title, column_id)) {
            Ok(id) => {
                self.focus_task(&id);
                self.status_message = Some("Task added".to_string());
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn pick_up_or_drop(&mut self) {
        match self.dragged.take() {
            None => {
                let Some(task_id) = self.selected_task_id() else {
                    return;
                };
                self.manager.drag_start(&task_id);
                let target = self.hover_target();
                self.manager.drag_over(target.as_deref());
                self.dragged = Some(task_id);
                self.status_message = Some("Moving task: navigate, Space to drop, Esc to cancel".to_string());
            }
            Some(task_id) => {
                let target = self.hover_target();
                let applied = self.manager.drag_end(&task_id, target.as_deref());
                self.status_message = Some(match &applied {
                    Some(intent) => format!(
                        "Moved to {} at position {}",
                        intent.destination_column_id,
                        intent.destination_position + 1
                    ),
                    None => "Nothing to move".to_string(),
                });
                self.focus_task(&task_id);
            }
        }
    }

    fn cancel_drag(&mut self) {
        if let Some(task_id) = self.dragged.take() {
            self.manager.drag_cancel();
            self.focus_task(&task_id);
            self.status_message = Some("Move cancelled".to_string());
        }
    }

    fn toggle_completion(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.manager.tasks_mut().toggle_completion(&id);
            self.clamp_selection();
        }
    }

    fn toggle_blocked(&mut self) {
        let Some(task) = self.selected_task_id().and_then(|id| self.manager.tasks().get_task(&id).cloned())
        else {
            return;
        };
        let update = TaskUpdate {
            blocked: Some(!task.blocked),
            ..Default::default()
        };
        if let Err(e) = self.manager.tasks_mut().update_task(&task.id, update) {
            self.status_message = Some(e.to_string());
        }
    }

    fn cycle_priority(&mut self) {
        let Some(task) = self.selected_task_id().and_then(|id| self.manager.tasks().get_task(&id).cloned())
        else {
            return;
        };
        let update = TaskUpdate {
            priority: Some(task.priority.cycle()),
            ..Default::default()
        };
        if let Err(e) = self.manager.tasks_mut().update_task(&task.id, update) {
            self.status_message = Some(e.to_string());
        }
    }

    fn delete_task(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.manager.tasks_mut().delete_task(&id);
            self.status_message = Some("Task deleted".to_string());
            self.clamp_selection();
        }
    }

    fn delete_column(&mut self) {
        let Some(id) = self.focused_column_id() else {
            return;
        };
        self.manager.columns_mut().delete_column(&id);
        let orphaned = self.manager.orphaned_tasks().len();
        self.status_message = Some(if orphaned > 0 {
            format!("Column deleted ({orphaned} task(s) no longer on the board)")
        } else {
            "Column deleted".to_string()
        });
        self.clamp_selection();
    }

    fn shift_column(&mut self, offset: isize) {
        let mut ids = self.column_ids();
        let target = self.focused_column as isize + offset;
        if ids.is_empty() || target < 0 || target as usize >= ids.len() {
            return;
        }
        ids.swap(self.focused_column, target as usize);
        self.manager.columns_mut().reorder_columns(&ids);
        self.focused_column = target as usize;
    }

    pub fn render(&self, frame: &mut Frame) {
        let input_height = if matches!(self.mode, AppMode::Input(_)) {
            3
        } else {
            0
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(input_height),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_board(frame, chunks[0]);
        if input_height > 0 {
            self.input.render(frame, chunks[1]);
        }
        self.render_status_bar(frame, chunks[2]);

        if self.mode == AppMode::Help {
            self.render_help(frame);
        }
    }

    fn render_board(&self, frame: &mut Frame, area: Rect) {
        let board = self.manager.columns().board();
        let outer = Block::default()
            .title(format!(" {} ", board.title))
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let columns = self.manager.columns().columns();
        if columns.is_empty() {
            let paragraph = Paragraph::new("No columns yet. Press N to add one.")
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(paragraph, inner);
            return;
        }

        let constraints: Vec<Constraint> = columns
            .iter()
            .map(|_| Constraint::Ratio(1, columns.len() as u32))
            .collect();
        let areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(inner);

        let today = Local::now().date_naive();
        for (index, column) in columns.iter().enumerate() {
            self.render_column(frame, areas[index], column, index == self.focused_column, today);
        }
    }

    fn render_column(&self, frame: &mut Frame, area: Rect, column: &Column, focused: bool, today: NaiveDate) {
        let tasks = self.manager.visible_tasks(&column.id);
        let total = self.manager.tasks().count_in_column(&column.id);
        let column_color = hex_to_rgb(column.color_or_default())
            .map(|(r, g, b)| Color::Rgb(r, g, b))
            .unwrap_or(Color::Gray);

        let hover = self.manager.drag().over_id();
        let zone_id = column_drop_zone_id(&column.id);
        let zone_hovered = hover == Some(zone_id.as_str());

        let border_style = if zone_hovered {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if focused {
            Style::default().fg(column_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let title = if tasks.len() == total {
            format!(" {} ({}) ", column.title, total)
        } else {
            format!(" {} ({}/{}) ", column.title, tasks.len(), total)
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let width = area.width.saturating_sub(4) as usize;
        let mut items: Vec<ListItem> = tasks
            .iter()
            .map(|task| {
                let hovered = hover == Some(task.id.0.as_str());
                self.task_item(task, width, hovered, today)
            })
            .collect();

        if self.dragged.is_some() && focused {
            let style = if zone_hovered {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            items.push(ListItem::new(Line::from(Span::styled("  ── drop at end ──", style))));
        }

        let highlight = match self.manager.settings().settings().theme {
            Theme::Dark => Style::default().bg(Color::DarkGray).fg(Color::White),
            Theme::Light => Style::default().bg(Color::Gray).fg(Color::Black),
        };
        let list = List::new(items).block(block).highlight_style(highlight);

        let mut state = ListState::default();
        if focused {
            state.select(Some(self.selected_row));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn task_item(&self, task: &Task, width: usize, hovered: bool, today: NaiveDate) -> ListItem<'static> {
        let priority_color = hex_to_rgb(task.priority.color())
            .map(|(r, g, b)| Color::Rgb(r, g, b))
            .unwrap_or(Color::Gray);
        let is_dragged = self.dragged.as_ref() == Some(&task.id);

        let mut title_style = Style::default();
        if task.completed {
            title_style = title_style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
        }
        if is_dragged {
            title_style = title_style.add_modifier(Modifier::ITALIC);
        }

        let mut first = vec![
            Span::styled(if is_dragged { "⇅ " } else { "● " }, Style::default().fg(priority_color)),
        ];
        if task.completed {
            first.push(Span::styled("✓ ", Style::default().fg(Color::Green)));
        }
        if task.blocked {
            first.push(Span::styled("⊘ ", Style::default().fg(Color::Red)));
        }
        first.push(Span::styled(truncate_text(&task.title, width.saturating_sub(4)), title_style));

        let mut second: Vec<Span> = vec![Span::raw("  ")];
        for tag in &task.tags {
            let (fg, bg) = match hex_to_rgb(&tag.color) {
                Some((r, g, b)) => {
                    let fg = if should_use_light_text(&tag.color) {
                        Color::White
                    } else {
                        Color::Black
                    };
                    (fg, Color::Rgb(r, g, b))
                }
                None => (Color::Black, Color::Gray),
            };
            second.push(Span::styled(format!(" {} ", tag.name), Style::default().fg(fg).bg(bg)));
            second.push(Span::raw(" "));
        }
        if task.due_date.is_some() {
            let due_style = if task.is_overdue(today) {
                Style::default().fg(Color::Red)
            } else if task.is_due_soon(today, 2) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            second.push(Span::styled(task.due_date_display(today), due_style));
        }

        let mut lines = vec![Line::from(first)];
        if second.len() > 1 {
            lines.push(Line::from(second));
        }

        let mut item = ListItem::new(lines);
        if hovered && !is_dragged {
            item = item.style(Style::default().fg(Color::Yellow));
        }
        item
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let help_text = match self.mode {
            AppMode::Input(_) => "Enter: save | Esc: cancel",
            AppMode::Help => "Press any key to close help",
            AppMode::Board if self.dragged.is_some() => {
                "h/l: column | j/k: slot | Space/Enter: drop | Esc: cancel"
            }
            AppMode::Board => {
                "h/l/j/k: navigate | Space: move | a: add | c: complete | d: delete | ?: help | q: quit"
            }
        };

        let line = match &self.status_message {
            Some(message) => Line::from(vec![
                Span::styled(message.as_str(), Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(help_text, Style::default().fg(Color::DarkGray)),
            ]),
            None => Line::from(Span::styled(help_text, Style::default().fg(Color::DarkGray))),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help(&self, frame: &mut Frame) {
        let popup_area = Self::centered_rect(60, 70, frame.area());

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            "TaskFlow Help",
            "",
            "Navigation:",
            "  h/l or ←/→     - Previous/next column",
            "  j/k or ↑/↓     - Next/previous task",
            "",
            "Moving tasks:",
            "  Space/Enter    - Pick up the selected task / drop it",
            "                   (past the last task drops at the end)",
            "  Esc            - Cancel the move",
            "",
            "Task Actions:",
            "  a              - Add a task to this column",
            "  c              - Toggle completion",
            "  x              - Toggle blocked",
            "  p              - Cycle priority",
            "  e              - Edit title",
            "  T / u          - Add a tag / remove the last tag",
            "  d              - Delete task",
            "",
            "Columns:",
            "  N              - Add a column",
            "  r              - Rename column",
            "  < / >          - Move column left/right",
            "  D              - Delete column (its tasks are kept)",
            "",
            "General:",
            "  H              - Show/hide completed tasks",
            "  t              - Toggle theme",
            "  ?              - Show this help",
            "  q / Ctrl+C     - Quit",
            "",
            "Press any key to close this help",
        ]
        .join("\n");

        let paragraph = Paragraph::new(help_text)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }

    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

/// Calculate luminance of a color for contrast calculation
fn calculate_luminance(r: u8, g: u8, b: u8) -> f64 {
    let channel = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Parse hex color string to RGB values
fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Determine if text should be light or dark based on background color
fn should_use_light_text(bg_color: &str) -> bool {
    hex_to_rgb(bg_color)
        .map(|(r, g, b)| calculate_luminance(r, g, b) < 0.5)
        .unwrap_or(false)
}

pub fn run_tui(mut app: App) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut event_handler = EventHandler::new(std::time::Duration::from_millis(250));

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| app.render(frame))?;

            let event = event_handler.next_event()?;
            if app.handle_event(event) {
                return Ok(());
            }
        }
    })();

    // Restore the terminal even when the loop failed
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}
