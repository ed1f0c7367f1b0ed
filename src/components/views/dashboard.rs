use super::super::modals::types::{Action as ModalAction, Data as ModalData};
use super::super::modals::{CaptionModalComponent, ConfirmModalComponent, ModalComponent};
use super::types::{Action, Data, Status, Transition, View};
use super::upload_form::UploadForm;
use super::utils;
use super::ViewComponent;
use crate::backend::types::{MediaKind, MediaPage, MediaQuery};
use crate::backend::{ApiClient, MediaUpdate, Watch, Watcher};
use crate::gallery::archive::archive_file_name;
use crate::gallery::{download, Collection};
use chrono::Local;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListState, Padding, Paragraph};
use ratatui::Frame;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Media,
    Upload,
}

enum Pending {
    Caption(String),
    Delete(String),
}

pub struct DashboardViewComponent {
    action_tx: UnboundedSender<Action>,
    client: Arc<ApiClient>,
    watcher: Arc<Watcher>,
    media: Box<dyn Watch<Output = MediaUpdate>>,
    quit: Option<oneshot::Sender<()>>,
    query: MediaQuery,
    page: Option<MediaPage>,
    error: Option<String>,
    collection: Collection,
    state: ListState,
    focus: Focus,
    modal: Option<(Box<dyn ModalComponent>, Pending)>,
    upload: UploadForm,
    exporting: bool,
    download_dir: PathBuf,
}

impl DashboardViewComponent {
    pub fn new(
        action_tx: UnboundedSender<Action>,
        client: Arc<ApiClient>,
        watcher: Arc<Watcher>,
        download_dir: PathBuf,
    ) -> Self {
        let query = MediaQuery {
            limit: PAGE_SIZE,
            ..Default::default()
        };
        Self {
            upload: UploadForm::new(action_tx.clone(), client.clone()),
            action_tx,
            client,
            media: Box::new(watcher.media(query.clone())),
            watcher,
            quit: None,
            query,
            page: None,
            error: None,
            collection: Collection::new(),
            state: ListState::default(),
            focus: Focus::Media,
            modal: None,
            exporting: false,
            download_dir,
        }
    }
    fn set_focus(&mut self, focus: Focus) -> Option<Action> {
        self.focus = focus;
        self.upload.focus(focus == Focus::Upload);
        Some(Action::Render)
    }
    fn turn_page(&mut self, page: u32) -> Result<Option<Action>> {
        self.deactivate()?;
        self.query.page = page;
        self.media = Box::new(self.watcher.media(self.query.clone()));
        self.activate()?;
        Ok(Some(Action::Render))
    }
    fn selected(&self) -> Option<(String, Option<String>)> {
        self.state
            .selected()
            .and_then(|i| self.collection.get_index(i))
            .map(|item| (item.id().to_string(), item.caption().map(String::from)))
    }
    fn send(tx: &UnboundedSender<Action>, data: Data) {
        if let Err(e) = tx.send(Action::Update(Box::new(data))) {
            log::error!("failed to send update action: {e}");
        }
    }
    fn edit_caption(&mut self, id: String, caption: String) {
        let (client, tx) = (self.client.clone(), self.action_tx.clone());
        tokio::spawn(async move {
            let result = client.update_caption(&id, &caption).await.map_err(|e| {
                log::error!("failed to update caption of {id}: {e}");
                e.user_message()
            });
            Self::send(&tx, Data::CaptionUpdated(result));
        });
    }
    fn delete(&mut self, id: String) {
        let (client, tx) = (self.client.clone(), self.action_tx.clone());
        tokio::spawn(async move {
            let result = match client.delete_media(&id).await {
                Ok(_) => Ok(id),
                Err(e) => {
                    log::error!("failed to delete {id}: {e}");
                    Err(e.user_message())
                }
            };
            Self::send(&tx, Data::Deleted(result));
        });
    }
    fn export(&mut self) -> Option<Action> {
        if self.exporting {
            return None;
        }
        self.exporting = true;
        let (client, dir, tx) = (
            self.client.clone(),
            self.download_dir.clone(),
            self.action_tx.clone(),
        );
        tokio::spawn(async move {
            let result = match client.download_zip(None).await {
                Ok(bytes) => {
                    let name = archive_file_name(Local::now().date_naive());
                    download::save(&dir, &name, &bytes).await.map_err(|e| {
                        log::error!("failed to save {name}: {e}");
                        e.to_string()
                    })
                }
                Err(e) => {
                    log::error!("failed to export media: {e}");
                    Err(e.user_message())
                }
            };
            Self::send(&tx, Data::Saved(result));
        });
        Some(Action::Status(Status::Info(String::from("Exporting..."))))
    }
    fn logout(&mut self) -> Option<Action> {
        let (client, tx) = (self.client.clone(), self.action_tx.clone());
        tokio::spawn(async move {
            if let Err(e) = client.logout().await {
                log::warn!("logout request failed: {e}");
            }
            Self::send(&tx, Data::LoggedOut);
        });
        None
    }
    fn resolve(&mut self, action: Option<ModalAction>) -> Option<Action> {
        let action = action?;
        if action == ModalAction::Render {
            return Some(Action::Render);
        }
        let (_, pending) = self.modal.take()?;
        match (action, pending) {
            (ModalAction::Ok(ModalData::Caption(caption)), Pending::Caption(id)) => {
                self.edit_caption(id, caption);
            }
            (ModalAction::Ok(ModalData::Confirmed), Pending::Delete(id)) => {
                self.delete(id);
            }
            _ => {}
        }
        Some(Action::Render)
    }
    fn on_data(&mut self, data: Data) -> Option<Action> {
        match data {
            Data::Media(MediaUpdate::Loading) => None,
            Data::Media(MediaUpdate::Loaded(mut page)) => {
                self.collection.replace_all(page.media.drain(..));
                self.page = Some(page);
                self.error = None;
                self.clamp_selection();
                Some(Action::Render)
            }
            Data::Media(MediaUpdate::Failed(message)) => {
                self.error = Some(message);
                Some(Action::Render)
            }
            Data::CaptionUpdated(result) => Some(Action::Status(match result {
                Ok(item) => {
                    self.collection.upsert(item);
                    Status::Info(String::from("Caption updated"))
                }
                Err(message) => Status::Error(message),
            })),
            Data::Deleted(result) => Some(Action::Status(match result {
                Ok(id) => {
                    self.collection.remove(&id);
                    self.clamp_selection();
                    Status::Info(String::from("Media deleted"))
                }
                Err(message) => Status::Error(message),
            })),
            Data::Saved(result) => {
                self.exporting = false;
                Some(Action::Status(match result {
                    Ok(path) => Status::Info(format!("Saved {}", path.display())),
                    Err(message) => Status::Error(message),
                }))
            }
            Data::LoggedOut => {
                self.action_tx
                    .send(Action::Status(Status::Info(String::from("Logged out"))))
                    .ok();
                Some(Action::Transition(Transition::Pop))
            }
            data @ (Data::Prepared(_) | Data::Uploaded(_)) => self
                .upload
                .update(Action::Update(Box::new(data)), &mut self.collection)
                .unwrap_or_else(|e| Some(Action::Status(Status::Error(e.to_string())))),
            _ => None,
        }
    }
    fn clamp_selection(&mut self) {
        if self.collection.is_empty() {
            self.state.select(None);
        } else {
            let last = self.collection.len() - 1;
            self.state
                .select(Some(self.state.selected().unwrap_or_default().min(last)));
        }
    }
    fn draw_media(&mut self, f: &mut Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Media;
        let [list, detail] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(5)]).areas(area);
        let block = Block::bordered()
            .title("Media")
            .border_style(if focused {
                Style::default()
            } else {
                Style::default().dim()
            });
        if let Some(error) = self.error.as_ref().filter(|_| self.collection.is_empty()) {
            f.render_widget(
                Paragraph::new(error.as_str()).red().centered().block(block),
                list,
            );
        } else {
            let items = self
                .collection
                .iter()
                .map(|item| utils::item_line(item, None))
                .collect::<Vec<_>>();
            f.render_stateful_widget(
                List::new(items)
                    .block(block)
                    .highlight_style(if focused {
                        Style::default().reversed()
                    } else {
                        Style::default().bold()
                    }),
                list,
                &mut self.state,
            );
        }

        let Some(item) = self.state.selected().and_then(|i| self.collection.get_index(i)) else {
            return;
        };
        let width = detail.width.saturating_sub(2).max(1) as usize;
        let mut lines = textwrap::wrap(item.caption().unwrap_or("(no caption)"), width)
            .into_iter()
            .take(2)
            .map(|line| Line::from(line.into_owned()))
            .collect::<Vec<_>>();
        lines.push(Line::from(item.url().to_string()).dim());
        f.render_widget(
            Paragraph::new(Text::from(lines)).block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().dim())
                    .padding(Padding::horizontal(1)),
            ),
            detail,
        );
    }
}

impl ViewComponent for DashboardViewComponent {
    fn view(&self) -> View {
        View::Dashboard
    }
    fn activate(&mut self) -> Result<()> {
        self.quit = Some(utils::forward_media(
            self.action_tx.clone(),
            self.media.as_ref(),
        ));
        Ok(())
    }
    fn deactivate(&mut self) -> Result<()> {
        utils::stop(&mut self.quit, self.media.as_ref());
        Ok(())
    }
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some((modal, _)) = self.modal.as_mut() {
            let action = modal.handle_key_events(key)?;
            return Ok(self.resolve(action));
        }
        match self.focus {
            Focus::Upload => self.upload.handle_key_events(key),
            Focus::Media => Ok(None),
        }
    }
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Update(data) = action {
            return Ok(self.on_data(*data));
        }
        if let Some((modal, _)) = self.modal.as_mut() {
            let action = modal.update(action)?;
            return Ok(self.resolve(action));
        }
        if self.focus == Focus::Upload {
            return match action {
                Action::Back if !self.upload.is_modal() => Ok(self.set_focus(Focus::Media)),
                action => self.upload.update(action, &mut self.collection),
            };
        }
        Ok(match action {
            Action::NextItem if !self.collection.is_empty() => {
                let last = self.collection.len() - 1;
                self.state
                    .select(Some(self.state.selected().map_or(0, |s| (s + 1).min(last))));
                Some(Action::Render)
            }
            Action::PrevItem if !self.collection.is_empty() => {
                self.state
                    .select(Some(self.state.selected().map_or(0, |s| s.max(1) - 1)));
                Some(Action::Render)
            }
            Action::NextInput | Action::PrevInput | Action::Upload => {
                self.set_focus(Focus::Upload)
            }
            Action::Edit => {
                let (id, caption) = match self.selected() {
                    Some(selected) => selected,
                    None => return Ok(None),
                };
                let modal = CaptionModalComponent::new(caption.as_deref());
                self.modal = Some((Box::new(modal), Pending::Caption(id)));
                Some(Action::Render)
            }
            Action::Delete => {
                let (id, caption) = match self.selected() {
                    Some(selected) => selected,
                    None => return Ok(None),
                };
                let modal = ConfirmModalComponent::new(
                    "Delete",
                    format!(
                        "Delete \"{}\"? This cannot be undone.",
                        caption.as_deref().unwrap_or(&id)
                    ),
                );
                self.modal = Some((Box::new(modal), Pending::Delete(id)));
                Some(Action::Render)
            }
            Action::Export => self.export(),
            Action::Logout => self.logout(),
            Action::Refresh => {
                self.media.refresh();
                None
            }
            Action::NextPage if self.page.as_ref().is_some_and(MediaPage::has_next) => {
                return self.turn_page(self.query.page + 1);
            }
            Action::PrevPage if self.page.as_ref().is_some_and(MediaPage::has_prev) => {
                return self.turn_page(self.query.page - 1);
            }
            Action::Back => Some(Action::Transition(Transition::Pop)),
            _ => None,
        })
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let (images, videos) = (
            self.collection.count(MediaKind::Image),
            self.collection.count(MediaKind::Video),
        );
        let mut title = vec![
            Span::from("Dashboard").bold(),
            Span::from(format!(
                "  {images} {}  {videos} {}",
                MediaKind::Image.plural(images),
                MediaKind::Video.plural(videos)
            ))
            .dim(),
        ];
        if let Some(page) = self.page.as_ref().filter(|page| page.total_pages() > 1) {
            title.push(Span::from(format!("  page {}/{}", page.page, page.total_pages())).dim());
        }
        if self.exporting {
            title.push(Span::from("  exporting...").yellow());
        }
        f.render_widget(
            Paragraph::new(Line::from(title)).block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().dim())
                    .padding(Padding::horizontal(1)),
            ),
            header,
        );

        let [media, upload] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(body);
        self.draw_media(f, media);
        self.upload
            .draw(f, upload, self.focus == Focus::Upload)?;

        let hints = match self.focus {
            Focus::Media => "e caption  x delete  z export  u upload  L logout  Esc back",
            Focus::Upload => "Tab next field  Enter add/submit  Esc back to media",
        };
        f.render_widget(Line::from(hints).dim().centered(), footer);

        if let Some((modal, _)) = self.modal.as_mut() {
            modal.draw(f, area)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::AuthContext;
    use crate::backend::config::Config;
    use crate::gallery::testing::{images, item};
    use crossterm::event::{KeyCode, KeyModifiers};
    use tokio::sync::mpsc;

    fn component() -> (DashboardViewComponent, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = Config {
            base_url: String::from("http://127.0.0.1:9"),
            ..Default::default()
        };
        let client = Arc::new(
            ApiClient::new(&config, AuthContext::default()).expect("failed to build client"),
        );
        let watcher = Arc::new(Watcher::new(client.clone(), config));
        let dashboard = DashboardViewComponent::new(tx, client, watcher, PathBuf::from("."));
        (dashboard, rx)
    }

    fn loaded(dashboard: &mut DashboardViewComponent) {
        let mut media = images(&["a", "b"]);
        media.push(item("v", MediaKind::Video, Some("First dance")));
        let page = MediaPage {
            media,
            total: 3,
            page: 1,
            limit: PAGE_SIZE,
        };
        dashboard
            .update(Action::Update(Box::new(Data::Media(MediaUpdate::Loaded(page)))))
            .expect("update failed");
    }

    #[test]
    fn counts_and_results() {
        let (mut dashboard, _rx) = component();
        loaded(&mut dashboard);
        assert_eq!(dashboard.collection.count(MediaKind::Image), 2);
        assert_eq!(dashboard.collection.count(MediaKind::Video), 1);

        let renamed = item("a", MediaKind::Image, Some("Rings"));
        dashboard
            .update(Action::Update(Box::new(Data::CaptionUpdated(Ok(renamed)))))
            .expect("update failed");
        assert_eq!(
            dashboard.collection.get("a").and_then(|item| item.caption()),
            Some("Rings")
        );

        dashboard.state.select(Some(2));
        dashboard
            .update(Action::Update(Box::new(Data::Deleted(Ok(String::from("v"))))))
            .expect("update failed");
        assert_eq!(dashboard.collection.len(), 2);
        assert_eq!(dashboard.state.selected(), Some(1));
    }

    #[test]
    fn delete_cancelled() {
        let (mut dashboard, _rx) = component();
        loaded(&mut dashboard);
        dashboard.update(Action::Delete).expect("update failed");
        assert!(dashboard.modal.is_some());
        // cancel is focused by default
        dashboard.update(Action::Enter).expect("update failed");
        assert!(dashboard.modal.is_none());
        assert_eq!(dashboard.collection.len(), 3);
    }

    #[tokio::test]
    async fn caption_modal_sends_request() {
        let (mut dashboard, mut rx) = component();
        loaded(&mut dashboard);
        dashboard.update(Action::Edit).expect("update failed");
        for c in "Vows".chars() {
            dashboard
                .handle_key_events(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .expect("key failed");
        }
        dashboard.update(Action::Enter).expect("update failed");
        assert!(dashboard.modal.is_none());

        // the request fails without a reachable server, the caption stays
        let action = rx.recv().await.expect("no result");
        assert!(matches!(
            dashboard.update(action),
            Ok(Some(Action::Status(Status::Error(_))))
        ));
        assert_eq!(dashboard.collection.get("a").and_then(|item| item.caption()), None);
    }

    #[test]
    fn upload_focus() {
        let (mut dashboard, _rx) = component();
        dashboard.update(Action::Upload).expect("update failed");
        assert_eq!(dashboard.focus, Focus::Upload);
        dashboard.update(Action::Back).expect("update failed");
        assert_eq!(dashboard.focus, Focus::Media);
        assert!(matches!(
            dashboard.update(Action::Back),
            Ok(Some(Action::Transition(Transition::Pop)))
        ));
    }

    #[test]
    fn logged_out() {
        let (mut dashboard, mut rx) = component();
        assert!(matches!(
            dashboard.update(Action::Update(Box::new(Data::LoggedOut))),
            Ok(Some(Action::Transition(Transition::Pop)))
        ));
        assert!(matches!(rx.try_recv(), Ok(Action::Status(Status::Info(_)))));
    }
}
