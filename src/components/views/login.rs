use super::types::{Action, Data, Status, Transition, View};
use super::utils;
use super::ViewComponent;
use crate::backend::ApiClient;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};
use ratatui::Frame;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tui_textarea::TextArea;

pub struct LoginComponent {
    action_tx: UnboundedSender<Action>,
    client: Arc<ApiClient>,
    password: TextArea<'static>,
    pending: bool,
    error: Option<String>,
}

fn password_input() -> TextArea<'static> {
    let mut password = utils::single_line_input("Password");
    password.set_mask_char('•');
    utils::set_focused(&mut password, true);
    password
}

impl LoginComponent {
    pub fn new(action_tx: UnboundedSender<Action>, client: Arc<ApiClient>) -> Self {
        Self {
            action_tx,
            client,
            password: password_input(),
            pending: false,
            error: None,
        }
    }
    fn login(&mut self) {
        let password = utils::text(&self.password);
        if password.is_empty() {
            self.error = Some(String::from("Password is required"));
            return;
        }
        self.pending = true;
        self.error = None;
        let (client, tx) = (self.client.clone(), self.action_tx.clone());
        tokio::spawn(async move {
            let result = match client.login(&password).await {
                Ok(()) => {
                    log::info!("logged in as admin");
                    Ok(())
                }
                Err(e) => {
                    log::warn!("login failed: {e}");
                    Err(e.user_message())
                }
            };
            if let Err(e) = tx.send(Action::Update(Box::new(Data::LoggedIn(result)))) {
                log::error!("failed to send login result: {e}");
            }
        });
    }
}

impl ViewComponent for LoginComponent {
    fn view(&self) -> View {
        View::Login
    }
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.pending {
            return Ok(None);
        }
        Ok(utils::input(&mut self.password, key))
    }
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Enter if !self.pending => {
                self.login();
                return Ok(Some(Action::Render));
            }
            Action::Back => {
                return Ok(Some(Action::Transition(Transition::Pop)));
            }
            Action::Update(data) => {
                let Data::LoggedIn(result) = *data else {
                    return Ok(None);
                };
                self.pending = false;
                return Ok(Some(match result {
                    Ok(()) => {
                        self.action_tx
                            .send(Action::Status(Status::Info(String::from("Logged in"))))
                            .ok();
                        Action::Transition(Transition::Replace(View::Dashboard))
                    }
                    Err(message) => {
                        self.password = password_input();
                        self.error = Some(message);
                        Action::Render
                    }
                }));
            }
            _ => {}
        }
        Ok(None)
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let block = Block::default().padding(Padding::proportional(2));
        let [title, input, message] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(block.inner(area));
        f.render_widget(
            Paragraph::new("Admin login").bold().block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().dim()),
            ),
            title,
        );
        f.render_widget(&self.password, input);
        let line = match (&self.error, self.pending) {
            (_, true) => Line::from("Signing in...").dim(),
            (Some(error), false) => Line::from(error.as_str()).red(),
            (None, false) => Line::from("Enter to sign in, Esc to go back").dim(),
        };
        f.render_widget(Paragraph::new(line).wrap(Wrap::default()), message);
        Ok(())
    }
}
