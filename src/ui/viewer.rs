//! Interactive board viewer
//!
//! A small two-pane terminal UI: boards on the left, the selected board's
//! lists and tasks on the right, dashboard counts in the footer. Deadline
//! classification runs on every draw, so colors and labels always reflect
//! the current date.

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};

use crate::auth::User;
use crate::board::{Board, BoardStore, TaskStatus};
use crate::dashboard;
use crate::deadline::{classify, DeadlineBucket};
use crate::error::Result;

const EVENT_POLL_MS: u64 = 200;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Focus {
    Boards,
    Tasks,
}

/// One selectable row in the task pane: (list index, task index)
type TaskRow = (usize, usize);

struct AppState {
    store: BoardStore,
    user: User,
    boards: Vec<Board>,
    board_idx: usize,
    task_idx: usize,
    focus: Focus,
    status_line: Option<String>,
    should_quit: bool,
}

impl AppState {
    fn new(store: BoardStore, user: User) -> Result<Self> {
        let mut app = Self {
            store,
            user,
            boards: Vec::new(),
            board_idx: 0,
            task_idx: 0,
            focus: Focus::Boards,
            status_line: None,
            should_quit: false,
        };
        app.reload()?;
        Ok(app)
    }

    fn reload(&mut self) -> Result<()> {
        self.boards = self.store.boards_for_user(&self.user.id)?;
        if self.boards.is_empty() {
            self.board_idx = 0;
        } else if self.board_idx >= self.boards.len() {
            self.board_idx = self.boards.len() - 1;
        }
        self.clamp_task_idx();
        Ok(())
    }

    fn selected_board(&self) -> Option<&Board> {
        self.boards.get(self.board_idx)
    }

    fn task_rows(&self) -> Vec<TaskRow> {
        let board = match self.selected_board() {
            Some(board) => board,
            None => return Vec::new(),
        };
        let mut rows = Vec::new();
        for (list_idx, list) in board.lists.iter().enumerate() {
            for task_idx in 0..list.tasks.len() {
                rows.push((list_idx, task_idx));
            }
        }
        rows
    }

    fn clamp_task_idx(&mut self) {
        let rows = self.task_rows().len();
        if rows == 0 {
            self.task_idx = 0;
        } else if self.task_idx >= rows {
            self.task_idx = rows - 1;
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Boards => Focus::Tasks,
                    Focus::Tasks => Focus::Boards,
                };
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if self.focus == Focus::Tasks {
                    self.toggle_selected_task();
                }
            }
            KeyCode::Char('r') => {
                if let Err(err) = self.reload() {
                    self.status_line = Some(format!("reload failed: {err}"));
                }
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: i64) {
        match self.focus {
            Focus::Boards => {
                let len = self.boards.len();
                if len == 0 {
                    return;
                }
                let next = self.board_idx as i64 + delta;
                self.board_idx = next.clamp(0, len as i64 - 1) as usize;
                self.task_idx = 0;
            }
            Focus::Tasks => {
                let len = self.task_rows().len();
                if len == 0 {
                    return;
                }
                let next = self.task_idx as i64 + delta;
                self.task_idx = next.clamp(0, len as i64 - 1) as usize;
            }
        }
    }

    fn toggle_selected_task(&mut self) {
        let rows = self.task_rows();
        let (list_idx, task_idx) = match rows.get(self.task_idx) {
            Some(row) => *row,
            None => return,
        };
        let task = match self
            .selected_board()
            .and_then(|board| board.lists.get(list_idx))
            .and_then(|list| list.tasks.get(task_idx))
        {
            Some(task) => task.clone(),
            None => return,
        };

        let result = self
            .store
            .set_task_status(&self.user.id, &task.id, task.status.toggled())
            .and_then(|_| self.reload());
        match result {
            Ok(()) => self.status_line = None,
            Err(err) => self.status_line = Some(format!("update failed: {err}")),
        }
    }
}

/// Run the viewer until the user quits
pub fn run(store: BoardStore, user: User) -> Result<()> {
    let mut app = AppState::new(store, user)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            if let Event::Key(key) = event::read()? {
                app.on_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(frame.size());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(chunks[0]);

    render_boards(frame, app, panes[0]);
    render_tasks(frame, app, panes[1]);
    render_footer(frame, app, chunks[1]);
}

fn render_boards(frame: &mut Frame, app: &AppState, area: Rect) {
    let focused = app.focus == Focus::Boards;
    let items: Vec<ListItem> = app
        .boards
        .iter()
        .map(|board| {
            let tasks: usize = board.lists.iter().map(|list| list.tasks.len()).sum();
            ListItem::new(format!("{} ({tasks})", board.title))
        })
        .collect();

    let mut state = ListState::default();
    if !app.boards.is_empty() {
        state.select(Some(app.board_idx));
    }

    let list = List::new(items)
        .block(titled_block("Boards", focused))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_tasks(frame: &mut Frame, app: &AppState, area: Rect) {
    let focused = app.focus == Focus::Tasks;
    let board = match app.selected_board() {
        Some(board) => board,
        None => {
            let empty = Paragraph::new("No boards yet. Create one with: tb board new <title>")
                .block(titled_block("Tasks", focused));
            frame.render_widget(empty, area);
            return;
        }
    };

    let today = Local::now().date_naive();
    let rows = app.task_rows();
    let mut lines: Vec<Line> = Vec::new();
    let mut selectable_seen = 0usize;

    for (list_idx, list) in board.lists.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("{} ({})", list.title, list.tasks.len()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));

        for (task_idx, task) in list.tasks.iter().enumerate() {
            let status = classify(task.deadline.as_deref(), today);
            let selected =
                focused && rows.get(app.task_idx) == Some(&(list_idx, task_idx));
            let marker = match task.status {
                TaskStatus::Completed => "[x]",
                TaskStatus::Pending => "[ ]",
            };

            let mut style = Style::default().fg(bucket_color(status.bucket));
            if task.status == TaskStatus::Completed {
                style = style.add_modifier(Modifier::CROSSED_OUT);
            }
            if selected {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }

            lines.push(Line::from(Span::styled(
                format!("  {marker} {} · {}", task.title, status.label),
                style,
            )));
            selectable_seen += 1;
        }
        lines.push(Line::from(""));
    }

    if selectable_seen == 0 {
        lines.push(Line::from(Span::styled(
            "  no tasks",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(titled_block(&board.title, focused));
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let today = Local::now().date_naive();
    let report = dashboard::compute(&app.boards, today);
    let summary = report.summary;

    let text = match &app.status_line {
        Some(status) => status.clone(),
        None => format!(
            "{} tasks · {} pending · {} completed │ overdue {} · today {} · soon {} │ tab: pane  space: toggle  r: reload  q: quit",
            summary.total,
            summary.pending,
            summary.completed,
            summary.overdue,
            summary.today,
            summary.soon,
        ),
    };

    let footer = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Dashboard"));
    frame.render_widget(footer, area);
}

fn titled_block(title: &str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(border)
}

fn bucket_color(bucket: DeadlineBucket) -> Color {
    match bucket {
        DeadlineBucket::Overdue => Color::Red,
        DeadlineBucket::Today | DeadlineBucket::Tomorrow | DeadlineBucket::Soon => Color::Yellow,
        DeadlineBucket::OnTime => Color::Green,
        DeadlineBucket::NoDeadline => Color::Gray,
    }
}
