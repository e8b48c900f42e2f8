//! Kanban board interface.
//!
//! Renders the task list as columns along the active axis and lets the
//! user carry a card between columns with the keyboard. Picking a card up,
//! retargeting it and dropping it map onto the reclassification engine's
//! drag gesture, so the board and the CLI `move` command share one
//! mutation path.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::board::{self, Axis, AxisValue};
use crate::engine::{BoardEngine, DragEnd, DragState, DropOutcome, Over};
use crate::error::Result;
use crate::fields::{Priority, Status};
use crate::repo::TaskRepository;
use crate::store::Storage;
use crate::task::{Task, TaskId};
use crate::tui::colors::{DARK_GREEN, DARK_PURPLE, DARK_RED, GOLD};

/// Accent color for a column.
fn value_color(value: AxisValue) -> Color {
    match value {
        AxisValue::Priority(Priority::High) => DARK_RED,
        AxisValue::Priority(Priority::Medium) => GOLD,
        AxisValue::Priority(Priority::Low) => DARK_GREEN,
        AxisValue::Status(Status::Todo) => DARK_PURPLE,
        AxisValue::Status(Status::InProgress) => GOLD,
        AxisValue::Status(Status::Done) => DARK_GREEN,
    }
}

/// Main board application state.
pub struct BoardApp<'a, S: Storage> {
    repo: &'a mut TaskRepository<S>,
    engine: BoardEngine,
    user: String,
    selected_column: usize,
    selected_card: usize,
    column_scroll_offsets: [usize; 3],
    /// Where the carried card was picked up, for Esc to return to.
    carry_origin: Option<(usize, usize)>,
    status_message: String,
    show_task_detail: bool,

    // Task ids per column, rebuilt after every mutation.
    columns: [Vec<TaskId>; 3],
}

impl<'a, S: Storage> BoardApp<'a, S> {
    pub fn new(repo: &'a mut TaskRepository<S>, axis: Axis, user: &str) -> Result<Self> {
        let mut engine = BoardEngine::new(axis, user);
        engine.refresh(repo)?;

        let mut app = BoardApp {
            repo,
            engine,
            user: user.to_string(),
            selected_column: 0,
            selected_card: 0,
            column_scroll_offsets: [0; 3],
            carry_origin: None,
            status_message: String::new(),
            show_task_detail: false,
            columns: Default::default(),
        };
        app.update_columns();
        Ok(app)
    }

    fn axis_values(&self) -> Vec<AxisValue> {
        self.engine.axis().values()
    }

    /// Rebuild the per-column id lists from the board projection.
    fn update_columns(&mut self) {
        let projected = board::columns(self.engine.axis(), self.engine.tasks());
        for (i, column) in projected.iter().enumerate() {
            self.columns[i] = column.tasks.iter().map(|t| t.id).collect();
        }
        self.clamp_selection();
    }

    /// Ensure selected column and card indices are valid.
    fn clamp_selection(&mut self) {
        if self.selected_column >= self.columns.len() {
            self.selected_column = 0;
        }
        let column_len = self.columns[self.selected_column].len();
        if column_len == 0 {
            self.selected_card = 0;
            self.column_scroll_offsets[self.selected_column] = 0;
        } else if self.selected_card >= column_len {
            self.selected_card = column_len - 1;
        }
    }

    fn task(&self, id: TaskId) -> Option<&Task> {
        self.engine.tasks().iter().find(|t| t.id == id)
    }

    fn selected_task_id(&self) -> Option<TaskId> {
        self.columns[self.selected_column]
            .get(self.selected_card)
            .copied()
    }

    /// Move selection to wherever the task now lives.
    fn select_task(&mut self, id: TaskId) {
        for (col, ids) in self.columns.iter().enumerate() {
            if let Some(pos) = ids.iter().position(|&t| t == id) {
                self.selected_column = col;
                self.selected_card = pos;
                return;
            }
        }
        self.clamp_selection();
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn carrying(&self) -> Option<TaskId> {
        match self.engine.drag_state() {
            DragState::Dragging(id) => Some(id),
            DragState::Idle => None,
        }
    }

    /// Pick up the selected card.
    fn pick_up(&mut self) {
        let Some(id) = self.selected_task_id() else {
            self.set_status_message("No task selected".to_string());
            return;
        };
        if self.engine.drag_start(id) {
            self.carry_origin = Some((self.selected_column, self.selected_card));
            self.set_status_message(format!(
                "Carrying #{id} | Left/Right: choose column | Space: drop | Esc: cancel"
            ));
        }
    }

    /// Drop the carried card on the currently selected column.
    fn drop_carried(&mut self) {
        let Some(id) = self.carrying() else { return };
        let key = self.axis_values()[self.selected_column].key().to_string();
        let outcome = self.engine.drag_end(DragEnd {
            active: id,
            over: Some(Over::Column(key)),
        });
        self.carry_origin = None;
        match outcome {
            DropOutcome::Moved(value) => match self.engine.flush(self.repo) {
                Ok(_) => self.set_status_message(format!("Moved #{id} to {}", value.label())),
                Err(e) => self.set_status_message(format!("Save failed, change reverted: {e}")),
            },
            DropOutcome::Ignored => {
                self.set_status_message(format!("#{id} left where it was"));
            }
        }
        self.update_columns();
        self.select_task(id);
    }

    /// Put the carried card back without changing anything.
    fn cancel_carry(&mut self) {
        self.engine.drag_cancel();
        if let Some((col, card)) = self.carry_origin.take() {
            self.selected_column = col;
            self.selected_card = card;
            self.clamp_selection();
        }
        self.set_status_message("Cancelled".to_string());
    }

    /// Flip between the priority and status boards.
    fn toggle_axis(&mut self) {
        self.engine.set_axis(self.engine.axis().toggled());
        self.carry_origin = None;
        self.selected_column = 0;
        self.selected_card = 0;
        self.column_scroll_offsets = [0; 3];
        self.update_columns();
        self.set_status_message(format!("Board axis: {}", self.engine.axis().label()));
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        match self.repo.delete(id, &self.user) {
            Ok(()) => {
                self.set_status_message(format!("Deleted task #{id}"));
                if let Err(e) = self.engine.refresh(self.repo) {
                    self.set_status_message(format!("Reload failed: {e}"));
                }
                self.update_columns();
            }
            Err(e) => self.set_status_message(format!("Delete failed: {e}")),
        }
    }

    /// Handle keyboard input. Returns true when the app should exit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.clear_status_message();

                match key.code {
                    KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    KeyCode::Char('q') => return Ok(true),

                    KeyCode::Esc => {
                        if self.show_task_detail {
                            self.show_task_detail = false;
                        } else if self.carrying().is_some() {
                            self.cancel_carry();
                        } else {
                            return Ok(true);
                        }
                    }

                    // Carry gesture
                    KeyCode::Char(' ') => {
                        if self.carrying().is_some() {
                            self.drop_carried();
                        } else {
                            self.pick_up();
                        }
                    }

                    // Task detail popup (or drop, when carrying)
                    KeyCode::Enter => {
                        if self.carrying().is_some() {
                            self.drop_carried();
                        } else if self.selected_task_id().is_some() {
                            self.show_task_detail = !self.show_task_detail;
                        }
                    }

                    KeyCode::Tab => self.toggle_axis(),

                    // Column navigation; while carrying this retargets the drop
                    KeyCode::Left => {
                        if self.selected_column > 0 {
                            self.selected_column -= 1;
                            if self.carrying().is_none() {
                                self.clamp_selection();
                            }
                        }
                    }
                    KeyCode::Right => {
                        if self.selected_column < self.columns.len() - 1 {
                            self.selected_column += 1;
                            if self.carrying().is_none() {
                                self.clamp_selection();
                            }
                        }
                    }

                    // Card navigation within column
                    KeyCode::Up => {
                        if self.carrying().is_none() && self.selected_card > 0 {
                            self.selected_card -= 1;
                        }
                    }
                    KeyCode::Down => {
                        let column_len = self.columns[self.selected_column].len();
                        if self.carrying().is_none()
                            && column_len > 0
                            && self.selected_card < column_len - 1
                        {
                            self.selected_card += 1;
                        }
                    }

                    KeyCode::Char('x') => {
                        if self.carrying().is_none() {
                            self.delete_selected();
                        }
                    }

                    KeyCode::Char('h') => {
                        self.set_status_message(
                            "Help: Space: carry/drop | Enter: details | Tab: switch axis | x: delete | q: quit"
                                .to_string(),
                        );
                    }

                    _ => {}
                }
            }
        }
        Ok(false)
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        if self.show_task_detail {
            self.render_task_detail_popup(f);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let context = format!("Axis: {}  User: {}", self.engine.axis().label(), self.user);
        let header_text = vec![Line::from(vec![
            Span::styled("HABITSYNC BOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                context,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let column_count = self.columns.len();
        let constraints: Vec<Constraint> = (0..column_count)
            .map(|_| Constraint::Percentage(100 / column_count as u16))
            .collect();

        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let values = self.axis_values();
        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, i, values[i]);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, column_index: usize, value: AxisValue) {
        let is_selected = column_index == self.selected_column;
        let accent = value_color(value);

        let border_style = if is_selected {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let title = format!("{} ({})", value.label(), self.columns[column_index].len());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style);

        let inner = block.inner(area);
        f.render_widget(block, area);

        let cards = self.columns[column_index].clone();
        if cards.is_empty() {
            return;
        }

        let card_height = 5;
        let available_height = inner.height as usize;
        let visible_cards = available_height / card_height;

        // Keep the selected card scrolled into view.
        let scroll_offset = if is_selected {
            let start_visible = self.column_scroll_offsets[column_index];
            let end_visible = start_visible + visible_cards;

            if self.selected_card < start_visible {
                self.column_scroll_offsets[column_index] = self.selected_card;
                self.selected_card
            } else if self.selected_card >= end_visible && end_visible > 0 {
                let new_offset = self.selected_card - visible_cards + 1;
                self.column_scroll_offsets[column_index] = new_offset;
                new_offset
            } else {
                start_visible
            }
        } else {
            self.column_scroll_offsets[column_index]
        };

        let carried = self.carrying();
        let mut current_y = 0;
        let mut rendered_cards = 0;

        for (card_index, &task_id) in cards.iter().enumerate().skip(scroll_offset) {
            if let Some(task) = self.task(task_id) {
                if current_y + card_height > available_height {
                    break;
                }

                let is_this_card_selected = is_selected && card_index == self.selected_card;
                let is_carried = carried == Some(task_id);

                let card_area = Rect {
                    x: inner.x,
                    y: inner.y + current_y as u16,
                    width: inner.width,
                    height: card_height as u16,
                };

                self.render_card(f, card_area, task, accent, is_this_card_selected, is_carried);

                current_y += card_height;
                rendered_cards += 1;
            }
        }

        if scroll_offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{} above", scroll_offset))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y,
                    width: inner.width,
                    height: 1,
                },
            );
        }

        let remaining = cards.len() - scroll_offset - rendered_cards;
        if remaining > 0 {
            let indicator = Paragraph::new(format!("▼ +{} below", remaining))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y + inner.height - 1,
                    width: inner.width,
                    height: 1,
                },
            );
        }
    }

    fn render_card(
        &self,
        f: &mut Frame,
        area: Rect,
        task: &Task,
        accent: Color,
        is_selected: bool,
        is_carried: bool,
    ) {
        let style = if is_carried {
            Style::default()
                .bg(accent)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC)
        } else if is_selected {
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };

        let mut card_text = vec![Line::from(format!("#{}", task.id))];

        // Wrap the title to the card width, two lines at most.
        let available_width = area.width.saturating_sub(2) as usize;
        let mut current_line = String::new();
        let mut lines = Vec::new();
        for word in task.title.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.len() + 1 + word.len() <= available_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(current_line.clone());
                current_line = word.to_string();
                if lines.len() >= 2 {
                    break;
                }
            }
        }
        if !current_line.is_empty() && lines.len() < 2 {
            lines.push(current_line);
        }
        for line in lines {
            card_text.push(Line::from(line));
        }

        // Footer shows the value on the other axis, plus the due date.
        let other = match self.engine.axis() {
            Axis::Priority => task.status.label(),
            Axis::Status => task.priority.label(),
        };
        let footer = match task.due_date {
            Some(due) => format!("{other} | due {due}"),
            None => other.to_string(),
        };
        card_text.push(Line::from(footer));

        let card_block = Paragraph::new(card_text)
            .block(Block::default().borders(Borders::ALL))
            .style(style)
            .wrap(Wrap { trim: true });

        f.render_widget(card_block, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if let Some(id) = self.carrying() {
            format!("Carrying #{id} | Left/Right: choose column | Space: drop | Esc: cancel")
        } else {
            let total_tasks: usize = self.columns.iter().map(|col| col.len()).sum();
            format!(
                "Tasks: {total_tasks} | Space: carry | Enter: details | Tab: axis | x: delete | h: Help"
            )
        };

        let accent = value_color(self.axis_values()[self.selected_column]);
        let text_color = match accent {
            GOLD => Color::Rgb(20, 20, 20),
            _ => Color::White,
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(accent).fg(text_color))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render_task_detail_popup(&self, f: &mut Frame) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(task) = self.task(id) else {
            return;
        };

        let popup_area = {
            let area = f.area();
            let popup_width = (area.width * 80) / 100;
            let popup_height = (area.height * 80) / 100;
            let x = (area.width - popup_width) / 2;
            let y = (area.height - popup_height) / 2;
            Rect::new(x, y, popup_width, popup_height)
        };

        f.render_widget(Clear, popup_area);

        let fmt_date =
            |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());

        let detail_lines = vec![
            Line::from(vec![Span::styled(
                format!("Task #{}: {}", task.id, task.title),
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(format!("Priority:  {}", task.priority.label())),
            Line::from(format!("Status:    {}", task.status.label())),
            Line::from(format!("Start:     {}", fmt_date(task.start_date))),
            Line::from(format!("Due:       {}", fmt_date(task.due_date))),
            Line::from(format!("End:       {}", fmt_date(task.end_date))),
            Line::from(format!(
                "Created:   {}",
                task.created_at.format("%Y-%m-%d %H:%M")
            )),
            Line::from(""),
            Line::from("Description:"),
            Line::from(task.description.as_deref().unwrap_or("-")),
        ];

        let accent = value_color(self.axis_values()[self.selected_column]);
        let popup_block = Block::default()
            .borders(Borders::ALL)
            .title("Task Details (Press Enter to close)")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));

        let popup_paragraph = Paragraph::new(detail_lines)
            .block(popup_block)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));

        f.render_widget(popup_paragraph, popup_area);
    }

    /// Main event loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Initialise the terminal, run the board and restore the terminal state.
pub fn run_board<S: Storage>(repo: &mut TaskRepository<S>, axis: Axis, user: &str) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = BoardApp::new(repo, axis, user)?;
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}
