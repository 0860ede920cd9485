pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use crate::app::{AppContext, Result};
use crate::repository::ItemRepository;
use crate::screens::{
    DetailArgs, DetailEffect, DetailIntent, DetailScreen, ListEffect, ListIntent, ListScreen,
};

use self::app::TuiApp;
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// The screens currently alive; at most one detail screen at a time.
struct Screens {
    repo: Arc<dyn ItemRepository>,
    list: ListScreen,
    detail: Option<DetailScreen>,
}

impl Screens {
    fn new(repo: Arc<dyn ItemRepository>) -> Self {
        let list = ListScreen::new(Arc::clone(&repo));
        Self {
            repo,
            list,
            detail: None,
        }
    }

    fn open_detail(&mut self, id: i64) {
        self.close_detail();
        self.detail = Some(DetailScreen::new(Arc::clone(&self.repo), DetailArgs { id }));
    }

    fn close_detail(&mut self) {
        if let Some(detail) = self.detail.take() {
            detail.close();
        }
    }

    /// Pull the latest states and handle pending effects.
    fn sync_into(&mut self, tui_app: &mut TuiApp) {
        while let Some(effect) = self.list.try_next_effect() {
            match effect {
                ListEffect::NavigateToDetails(id) => {
                    tui_app.clear_status();
                    self.open_detail(id);
                }
                ListEffect::ShowErrorMessage(message) => tui_app.set_status(message),
            }
        }

        let mut back = false;
        if let Some(detail) = &self.detail {
            while let Some(effect) = detail.try_next_effect() {
                match effect {
                    DetailEffect::NavigateBack => back = true,
                    DetailEffect::ShowErrorMessage(message) => tui_app.set_status(message),
                }
            }
        }
        if back {
            tui_app.clear_status();
            self.close_detail();
        }

        tui_app.set_list(self.list.current());
        tui_app.detail = self.detail.as_ref().map(|d| d.current());
    }

    fn close(&mut self) {
        self.close_detail();
        self.list.close();
    }
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>) -> Result<()> {
    let mut tui_app = TuiApp::new();
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let mut screens = Screens::new(ctx.repository.clone());

    loop {
        screens.sync_into(&mut tui_app);
        terminal.draw(|frame| layout::render(frame, &tui_app))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = Action::from(key);
                if let Some(detail) = &screens.detail {
                    handle_detail_action(&mut tui_app, detail, action);
                } else {
                    handle_list_action(&mut tui_app, &screens.list, action);
                }
            }
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            break;
        }
    }

    screens.close();
    debug!("TUI closed");
    Ok(())
}

fn handle_list_action(tui_app: &mut TuiApp, list: &ListScreen, action: Action) {
    let before = tui_app.item_index;
    match action {
        Action::Quit => tui_app.should_quit = true,
        Action::MoveUp => tui_app.move_up(),
        Action::MoveDown => tui_app.move_down(),
        Action::PrevPage => tui_app.page_up(),
        Action::NextPage => tui_app.page_down(),
        Action::Select => {
            if let Some(item) = tui_app.selected_item() {
                list.post_intent(ListIntent::ClickItem(item.id));
            }
        }
        Action::Retry => {
            tui_app.clear_status();
            list.post_intent(ListIntent::Retry);
        }
        Action::Refresh => {
            tui_app.clear_status();
            list.post_intent(ListIntent::Refresh);
        }
        Action::Back | Action::OpenInBrowser | Action::None => {}
    }

    if tui_app.item_index != before {
        list.post_intent(ListIntent::ItemVisible(tui_app.item_index));
    }
}

fn handle_detail_action(tui_app: &mut TuiApp, detail: &DetailScreen, action: Action) {
    match action {
        Action::Quit => tui_app.should_quit = true,
        Action::Back => detail.post_intent(DetailIntent::ClickBack),
        Action::Retry => {
            tui_app.clear_status();
            detail.post_intent(DetailIntent::Retry);
        }
        Action::OpenInBrowser => {
            if let Some(item) = detail.current().item {
                if let Err(e) = open::that(&item.image_url) {
                    tui_app.set_status(format!("Failed to open browser: {}", e));
                }
            }
        }
        Action::MoveUp
        | Action::MoveDown
        | Action::NextPage
        | Action::PrevPage
        | Action::Select
        | Action::Refresh
        | Action::None => {}
    }
}
