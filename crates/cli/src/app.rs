//! Main application state and event loop

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use sift_client::SearchBackend;
use sift_core::{ColumnCount, Effect, Event, SearchRequest, SearchState, SearchType, WarningTimer};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::input::TextInput;
use crate::ui;

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    SearchBar,
    Sidebar,
}

/// One selectable row of the layout options panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarItem {
    Columns(ColumnCount),
    SearchType(SearchType),
    ShowImages,
}

impl SidebarItem {
    /// Panel rows, top to bottom.
    pub fn all() -> Vec<SidebarItem> {
        ColumnCount::all()
            .map(SidebarItem::Columns)
            .chain(SearchType::ALL.into_iter().map(SidebarItem::SearchType))
            .chain(std::iter::once(SidebarItem::ShowImages))
            .collect()
    }

    fn event(self) -> Event {
        match self {
            SidebarItem::Columns(count) => Event::ColumnsChanged(count.get() as i64),
            SidebarItem::SearchType(search_type) => Event::SearchTypeChanged(search_type),
            SidebarItem::ShowImages => Event::ToggleImages,
        }
    }
}

/// Application state
pub struct App {
    /// Controller state (query, layout, results, warning)
    pub state: SearchState,
    /// Search bar contents
    pub input: TextInput,
    pub focus: Focus,
    /// Highlighted row in the layout options panel
    pub sidebar_index: usize,
    /// Grid rows scrolled past
    pub scroll: usize,
    pub should_quit: bool,
    timer: WarningTimer,
    backend: Arc<dyn SearchBackend>,
    completions_tx: UnboundedSender<Event>,
    completions_rx: UnboundedReceiver<Event>,
}

impl App {
    pub fn new(state: SearchState, backend: Arc<dyn SearchBackend>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let input = TextInput::with_text(state.query.clone());
        Self {
            state,
            input,
            focus: Focus::SearchBar,
            sidebar_index: 0,
            scroll: 0,
            should_quit: false,
            timer: WarningTimer::new(),
            backend,
            completions_tx,
            completions_rx,
        }
    }

    pub fn warning_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Apply an event to the controller and carry out its effects.
    pub fn dispatch(&mut self, event: Event) {
        let resets_grid = matches!(event, Event::SearchTypeChanged(_) | Event::Completed { .. });
        let effects = self.state.apply(event);
        if resets_grid {
            self.scroll = 0;
        }

        for effect in effects {
            match effect {
                Effect::Fetch(request) => self.spawn_fetch(request),
                Effect::ScheduleWarningClear { generation, after } => {
                    self.timer.schedule(generation, after, Instant::now())
                }
            }
        }
    }

    fn spawn_fetch(&self, request: SearchRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.completions_tx.clone();

        tokio::spawn(async move {
            let outcome = backend
                .search(&request.query, request.search_type)
                .await
                .map_err(sift_core::Error::from);
            let _ = tx.send(Event::Completed { request, outcome });
        });
    }

    /// Apply finished searches in the order they arrived.
    pub fn poll_completions(&mut self) {
        while let Ok(event) = self.completions_rx.try_recv() {
            self.dispatch(event);
        }
    }

    /// Expire the warning once its window has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(expired) = self.timer.poll(now) {
            self.dispatch(expired);
        }
    }

    /// Stop pending timers before the app goes away.
    pub fn shutdown(&mut self) {
        self.timer.cancel();
    }

    fn activate_sidebar_item(&mut self) {
        if let Some(item) = SidebarItem::all().get(self.sidebar_index).copied() {
            self.dispatch(item.event());
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        // Collapsed panel only offers its toggle
        if self.state.layout.menu_collapsed {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                self.dispatch(Event::ToggleMenu);
            }
            return;
        }

        let items = SidebarItem::all();
        match key.code {
            KeyCode::Up => self.sidebar_index = self.sidebar_index.saturating_sub(1),
            KeyCode::Down => self.sidebar_index = (self.sidebar_index + 1).min(items.len() - 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_sidebar_item(),
            KeyCode::Char(c @ '1'..='5') => self.dispatch(Event::ColumnsChanged(i64::from(c as u8 - b'0'))),
            KeyCode::Char('w') => self.dispatch(Event::SearchTypeChanged(SearchType::Web)),
            KeyCode::Char('n') => self.dispatch(Event::SearchTypeChanged(SearchType::News)),
            KeyCode::Char('i') => self.dispatch(Event::SearchTypeChanged(SearchType::Image)),
            KeyCode::Char('s') => self.dispatch(Event::ToggleImages),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.should_quit = true,
            (KeyCode::Char('b'), KeyModifiers::CONTROL) => self.dispatch(Event::ToggleMenu),
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                self.focus = match self.focus {
                    Focus::SearchBar => Focus::Sidebar,
                    Focus::Sidebar => Focus::SearchBar,
                }
            }
            (KeyCode::PageDown, _) => self.scroll = self.scroll.saturating_add(1),
            (KeyCode::PageUp, _) => self.scroll = self.scroll.saturating_sub(1),
            _ => match self.focus {
                Focus::Sidebar => self.handle_sidebar_key(key),
                Focus::SearchBar => {
                    if key.code == KeyCode::Enter {
                        self.dispatch(Event::Submit);
                    } else if self.input.handle_key(key.code, key.modifiers) && self.input.text != self.state.query {
                        self.dispatch(Event::QueryChanged(self.input.text.clone()));
                    }
                }
            },
        }
    }

    #[cfg(test)]
    pub async fn next_completion(&mut self) {
        if let Some(event) = self.completions_rx.recv().await {
            self.dispatch(event);
        }
    }
}

/// Run the TUI application
pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    const FRAME_TIME: Duration = Duration::from_millis(50);

    loop {
        app.poll_completions();
        app.tick(Instant::now());

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(FRAME_TIME)? {
            match event::read()? {
                TermEvent::Key(key) => app.handle_key(key),
                TermEvent::Paste(text) if app.focus == Focus::SearchBar => {
                    for c in text.chars().filter(|c| !c.is_control()) {
                        app.input.insert_char(c);
                    }
                    app.dispatch(Event::QueryChanged(app.input.text.clone()));
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
