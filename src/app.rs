use crate::backend::auth::{AuthContext, TokenStore};
use crate::backend::{ApiClient, Watcher};
use crate::components::screen::ScreenComponent;
use crate::components::Component;
use crate::config::Config;
use crate::tui::{io, Tui};
use crate::types::{Action, Event};
use crate::utils::get_data_dir;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct App {
    config: Config,
    terminate: Arc<AtomicBool>,
}

impl App {
    pub fn new(config: Config) -> Self {
        log::debug!("App::new({config:?})");
        Self {
            config,
            terminate: Arc::new(AtomicBool::new(false)),
        }
    }
    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let store = TokenStore::new(get_data_dir()?.join("storage.json"));
        let client = Arc::new(ApiClient::new(&self.config.api, AuthContext::new(Some(store)))?);
        let watcher = Arc::new(Watcher::new(client.clone(), self.config.api.clone()));
        #[cfg(not(windows))]
        signal_hook::flag::register(signal_hook::consts::SIGTERM, self.terminate.clone())?;

        let terminal = Terminal::new(CrosstermBackend::new(io()))?;
        log::debug!("terminal size: {}", terminal.size()?);
        let mut tui = Tui::new(terminal);
        tui.start()?;

        let mut screen =
            ScreenComponent::new(self.config.clone(), action_tx.clone(), client, watcher);
        screen.register_action_handler(action_tx.clone())?;
        screen.init(tui.size()?)?;
        action_tx.send(Action::Render)?;

        let mut should_quit = false;
        loop {
            if let Some(e) = tui.next_event().await {
                if let Some(action) = self.handle_events(e.clone()) {
                    action_tx.send(action)?;
                } else if let Some(action) = screen.handle_events(Some(e))? {
                    action_tx.send(action)?;
                }
            }
            while let Ok(action) = action_rx.try_recv() {
                if !matches!(action, Action::Tick(_) | Action::Render) {
                    log::info!("Action {action:?}");
                }
                match action {
                    Action::Quit => should_quit = true,
                    Action::Error(e) => log::error!("{e}"),
                    Action::Render => {
                        tui.draw(|f| {
                            if let Err(e) = screen.draw(f, f.area()) {
                                if let Err(e) =
                                    action_tx.send(Action::Error(format!("failed to draw: {e:?}")))
                                {
                                    log::error!("failed to send error: {e}");
                                }
                            }
                        })?;
                    }
                    _ => {
                        if let Some(action) = screen.update(action)? {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            if should_quit || self.terminate.load(Ordering::Relaxed) {
                break;
            }
        }
        tui.end()?;
        Ok(())
    }
    fn handle_events(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Tick(i) => Some(Action::Tick(i)),
            Event::Render => Some(Action::Render),
            Event::Error(e) => Some(Action::Error(e)),
            Event::Key(key_event) => self.handle_key_events(key_event),
            Event::Mouse(_) => None,
        }
    }
    fn handle_key_events(&mut self, key_event: KeyEvent) -> Option<Action> {
        self.config
            .keybindings
            .global
            .get(&key_event.into())
            .map(Action::from)
    }
}
