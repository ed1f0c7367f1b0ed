use super::views::types::{Action as ViewAction, Status, Transition, View};
use super::views::{
    DashboardViewComponent, GalleryViewComponent, LoginComponent, MenuViewComponent,
    ViewComponent,
};
use super::Component;
use crate::backend::{ApiClient, Watcher};
use crate::config::Config;
use crate::types::Action;
use color_eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::{Constraint, Layout, Rect, Size};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::Frame;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};

/// Ticks a status message stays on screen.
const STATUS_TICKS: usize = 5;

struct StatusLine {
    status: Status,
    until: usize,
}

/// Stack of views sharing one API client, plus the menu and status line.
pub struct ScreenComponent {
    views: Vec<Box<dyn ViewComponent>>,
    menu: MenuViewComponent,
    is_menu_active: bool,
    config: Config,
    client: Arc<ApiClient>,
    watcher: Arc<Watcher>,
    view_tx: UnboundedSender<ViewAction>,
    status: Option<StatusLine>,
    tick: usize,
}

impl ScreenComponent {
    pub fn new(
        config: Config,
        action_tx: UnboundedSender<Action>,
        client: Arc<ApiClient>,
        watcher: Arc<Watcher>,
    ) -> Self {
        let (view_tx, mut view_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(action) = view_rx.recv().await {
                if let Err(e) = action_tx.send(Action::View(action)) {
                    log::error!("failed to send view action: {e}");
                }
            }
        });
        Self {
            views: Vec::new(),
            menu: MenuViewComponent::new(view_tx.clone(), &config.keybindings),
            is_menu_active: false,
            config,
            client,
            watcher,
            view_tx,
            status: None,
            tick: 0,
        }
    }
    pub(crate) fn transition(&mut self, transition: &Transition) -> Result<Option<Action>> {
        match transition {
            Transition::Push(view) => {
                if let Some(current) = self.views.last_mut() {
                    current.deactivate()?;
                }
                let mut next = self.view(*view);
                next.activate()?;
                self.views.push(next);
            }
            Transition::Pop if self.views.len() > 1 => {
                if let Some(mut view) = self.views.pop() {
                    view.deactivate()?;
                }
                if let Some(current) = self.views.last_mut() {
                    current.activate()?;
                }
            }
            Transition::Pop => return Ok(None),
            Transition::Replace(view) => {
                if let Some(mut current) = self.views.pop() {
                    current.deactivate()?;
                }
                let mut next = self.view(*view);
                next.activate()?;
                self.views.push(next);
            }
        }
        Ok(Some(Action::Render))
    }
    fn view(&self, view: View) -> Box<dyn ViewComponent> {
        let (tx, client, watcher) = (
            self.view_tx.clone(),
            self.client.clone(),
            self.watcher.clone(),
        );
        match view {
            View::Gallery => Box::new(GalleryViewComponent::new(
                tx,
                client,
                watcher,
                &self.config.gallery,
            )),
            View::Login => Box::new(LoginComponent::new(tx, client)),
            View::Dashboard => Box::new(DashboardViewComponent::new(
                tx,
                client,
                watcher,
                self.config
                    .gallery
                    .download_dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(".")),
            )),
        }
    }
    fn set_status(&mut self, status: Status) -> Option<Action> {
        match &status {
            Status::Info(message) => log::info!("{message}"),
            Status::Error(message) => log::warn!("{message}"),
        }
        self.status = Some(StatusLine {
            status,
            until: self.tick + STATUS_TICKS,
        });
        Some(Action::Render)
    }
    fn health(&self) {
        let (client, tx) = (self.client.clone(), self.view_tx.clone());
        tokio::spawn(async move {
            let status = match client.health().await {
                Ok(health) if health.is_ok() => Status::Info(format!(
                    "{} is up",
                    client.base_url()
                )),
                Ok(health) => Status::Error(format!("Server status: {}", health.status)),
                Err(e) => {
                    log::error!("health check failed: {e}");
                    Status::Error(e.user_message())
                }
            };
            tx.send(ViewAction::Status(status)).ok();
        });
    }
}

impl Component for ScreenComponent {
    fn init(&mut self, _size: Size) -> Result<()> {
        let mut gallery = self.view(View::Gallery);
        gallery.activate()?;
        self.views = vec![gallery];
        Ok(())
    }
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if !self.is_menu_active {
            if let Some(view) = self.views.last_mut() {
                if let Some(action) = view.handle_key_events(key)? {
                    return Ok(Some(Action::View(action)));
                }
            }
        }
        Ok(self
            .config
            .keybindings
            .screen
            .get(&key.into())
            .map(|action| Action::View(action.into())))
    }
    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.is_menu_active {
            return Ok(None);
        }
        match self.views.last_mut() {
            Some(view) => Ok(view.handle_mouse_events(mouse)?.map(Action::View)),
            None => Ok(None),
        }
    }
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let view_action = match action {
            Action::Tick(i) => {
                self.tick = i;
                if self.status.as_ref().is_some_and(|s| s.until <= i) {
                    self.status = None;
                    return Ok(Some(Action::Render));
                }
                return Ok(None);
            }
            Action::View(view_action) => view_action,
            _ => return Ok(None),
        };
        match view_action {
            ViewAction::Render => return Ok(Some(Action::Render)),
            ViewAction::Menu => {
                self.is_menu_active = !self.is_menu_active;
                return Ok(Some(Action::Render));
            }
            ViewAction::Quit => return Ok(Some(Action::Quit)),
            ViewAction::Status(status) => return Ok(self.set_status(status)),
            ViewAction::Transition(transition) => return self.transition(&transition),
            ViewAction::Admin => {
                if self.views.last().is_some_and(|v| v.view() != View::Gallery) {
                    return Ok(None);
                }
                return self.transition(&Transition::Push(if self.client.auth().is_logged_in() {
                    View::Dashboard
                } else {
                    View::Login
                }));
            }
            ViewAction::Health => {
                self.health();
                return Ok(self.set_status(Status::Info(String::from("Checking server..."))));
            }
            _ => {}
        }
        if self.is_menu_active {
            if let Ok(Some(action)) = self.menu.update(view_action.clone()) {
                return Ok(Some(Action::View(action)));
            }
        }
        match self.views.last_mut() {
            Some(view) => Ok(view.update(view_action)?.map(Action::View)),
            None => Ok(None),
        }
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [body, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        if let Some(view) = self.views.last_mut() {
            view.draw(f, body)?;
        }
        if self.is_menu_active {
            self.menu.draw(f, body)?;
        }
        let line = match self.status.as_ref().map(|s| &s.status) {
            Some(Status::Info(message)) => Line::from(message.as_str()).green(),
            Some(Status::Error(message)) => Line::from(message.as_str()).red(),
            None => {
                let mut spans = vec![Span::from(self.client.base_url().to_string()).dim()];
                if self.client.auth().is_logged_in() {
                    spans.push(Span::from("  admin").yellow());
                }
                Line::from(spans)
            }
        };
        f.render_widget(line, status);
        Ok(())
    }
}
