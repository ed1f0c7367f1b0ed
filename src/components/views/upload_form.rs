use super::super::modals::types::{Action as ModalAction, Data as ModalData};
use super::super::modals::{ConfirmModalComponent, ModalComponent};
use super::types::{Action, Data, Status};
use super::utils;
use crate::backend::types::MediaItem;
use crate::backend::ApiClient;
use crate::gallery::preview::Preview;
use crate::gallery::upload::{self, PreparedFile, UploadError};
use crate::gallery::{Collection, UploadBatch};
use crate::widgets::ThumbnailWidget;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tui_textarea::TextArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Path,
    Files,
    Caption,
    Submit,
}

impl Field {
    fn next(&self) -> Self {
        match self {
            Self::Path => Self::Files,
            Self::Files => Self::Caption,
            Self::Caption => Self::Submit,
            Self::Submit => Self::Path,
        }
    }
    fn prev(&self) -> Self {
        match self {
            Self::Path => Self::Submit,
            Self::Files => Self::Path,
            Self::Caption => Self::Files,
            Self::Submit => Self::Caption,
        }
    }
}

/// Upload panel of the dashboard: path entry, staged files and caption.
pub struct UploadForm {
    action_tx: UnboundedSender<Action>,
    client: Arc<ApiClient>,
    batch: UploadBatch,
    path: TextArea<'static>,
    caption: TextArea<'static>,
    field: Field,
    files: ListState,
    preparing: usize,
    confirm: Option<ConfirmModalComponent>,
}

impl UploadForm {
    pub fn new(action_tx: UnboundedSender<Action>, client: Arc<ApiClient>) -> Self {
        Self {
            action_tx,
            client,
            batch: UploadBatch::new(),
            path: utils::single_line_input("File path"),
            caption: utils::single_line_input("Caption (optional)"),
            field: Field::Path,
            files: ListState::default(),
            preparing: 0,
            confirm: None,
        }
    }
    pub fn is_modal(&self) -> bool {
        self.confirm.is_some()
    }
    pub fn focus(&mut self, focused: bool) {
        let field = self.field;
        utils::set_focused(&mut self.path, focused && field == Field::Path);
        utils::set_focused(&mut self.caption, focused && field == Field::Caption);
    }
    fn select_field(&mut self, field: Field) -> Option<Action> {
        self.field = field;
        self.focus(true);
        if field == Field::Files && self.files.selected().is_none() && !self.batch.staged().is_empty()
        {
            self.files.select(Some(0));
        }
        Some(Action::Render)
    }
    fn prepare(&mut self) -> Option<Action> {
        let text = utils::text(&self.path);
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let path = PathBuf::from(text);
        self.preparing += 1;
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = upload::prepare_file(&path).await.map_err(|e| {
                log::warn!("failed to prepare {}: {e}", path.display());
                e.user_message()
            });
            tx.send(Action::Update(Box::new(Data::Prepared(result)))).ok();
        });
        Some(Action::Render)
    }
    fn unstage(&mut self) -> Option<Action> {
        let local_id = self
            .files
            .selected()
            .and_then(|i| self.batch.staged().get(i))
            .map(|staged| staged.local_id)?;
        if !self.batch.unstage(local_id) {
            return None;
        }
        let len = self.batch.staged().len();
        self.files
            .select(self.files.selected().filter(|_| len > 0).map(|i| i.min(len - 1)));
        Some(Action::Render)
    }
    fn submit(&mut self) -> Option<Action> {
        let request = match self.batch.begin_submit() {
            Ok(request) => request,
            Err(e) => return Some(Action::Status(Status::Error(e.user_message()))),
        };
        log::info!("upload {} files", request.files.len());
        let (client, tx) = (self.client.clone(), self.action_tx.clone());
        tokio::spawn(async move {
            let result = client.upload(request).await.map_err(|e| {
                log::warn!("upload request failed: {e}");
                UploadError::from(e).user_message()
            });
            tx.send(Action::Update(Box::new(Data::Uploaded(result)))).ok();
        });
        Some(Action::Render)
    }
    fn add(&mut self, result: std::result::Result<PreparedFile, String>) -> Option<Action> {
        self.preparing = self.preparing.saturating_sub(1);
        let status = match result {
            Ok(file) => {
                let name = file.name.clone();
                match self.batch.add(file) {
                    Ok(_) => {
                        self.path = utils::single_line_input("File path");
                        self.focus(true);
                        Status::Info(format!("Added {name}"))
                    }
                    Err(e) => Status::Error(e.user_message()),
                }
            }
            Err(message) => Status::Error(message),
        };
        Some(Action::Status(status))
    }
    fn finish(
        &mut self,
        result: std::result::Result<Vec<MediaItem>, String>,
        collection: &mut Collection,
    ) -> Option<Action> {
        let result = result.map_err(UploadError::Failed);
        Some(Action::Status(
            match self.batch.finish_submit(result, collection) {
                Ok(summary) => {
                    self.caption = utils::single_line_input("Caption (optional)");
                    self.files.select(None);
                    self.select_field(Field::Path);
                    Status::Info(summary)
                }
                Err(e) => Status::Error(e.user_message()),
            },
        ))
    }
    fn resolve(&mut self, action: Option<ModalAction>) -> Option<Action> {
        match action? {
            ModalAction::Ok(ModalData::Confirmed) => {
                self.confirm = None;
                self.submit()
            }
            ModalAction::Ok(_) | ModalAction::Cancel => {
                self.confirm = None;
                Some(Action::Render)
            }
            ModalAction::Render => Some(Action::Render),
        }
    }
    pub fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(confirm) = self.confirm.as_mut() {
            let action = confirm.handle_key_events(key)?;
            return Ok(self.resolve(action));
        }
        if self.batch.is_uploading() {
            return Ok(None);
        }
        Ok(match self.field {
            Field::Path => utils::input(&mut self.path, key),
            Field::Caption => {
                let action = utils::input(&mut self.caption, key);
                if action.is_some() {
                    self.batch.set_caption(utils::text(&self.caption));
                }
                action
            }
            Field::Files if matches!(key.code, KeyCode::Delete | KeyCode::Backspace) => {
                self.unstage()
            }
            _ => None,
        })
    }
    pub fn update(&mut self, action: Action, collection: &mut Collection) -> Result<Option<Action>> {
        if let Some(confirm) = self.confirm.as_mut() {
            if !matches!(action, Action::Update(_)) {
                let action = confirm.update(action)?;
                return Ok(self.resolve(action));
            }
        }
        Ok(match action {
            Action::NextInput => self.select_field(self.field.next()),
            Action::PrevInput => self.select_field(self.field.prev()),
            Action::NextItem if self.field == Field::Files && !self.batch.staged().is_empty() => {
                let last = self.batch.staged().len() - 1;
                self.files
                    .select(Some(self.files.selected().map_or(0, |i| (i + 1).min(last))));
                Some(Action::Render)
            }
            Action::PrevItem if self.field == Field::Files && !self.batch.staged().is_empty() => {
                self.files
                    .select(Some(self.files.selected().map_or(0, |i| i.max(1) - 1)));
                Some(Action::Render)
            }
            Action::Enter if self.batch.is_uploading() => None,
            Action::Enter => match self.field {
                Field::Path => self.prepare(),
                Field::Files | Field::Caption => self.select_field(self.field.next()),
                Field::Submit => {
                    let count = self.batch.staged().len();
                    if count == 0 {
                        Some(Action::Status(Status::Error(
                            upload::UploadError::NothingStaged.user_message(),
                        )))
                    } else {
                        self.confirm = Some(ConfirmModalComponent::new(
                            "Upload",
                            format!("Upload {count} file(s) to the gallery?"),
                        ));
                        Some(Action::Render)
                    }
                }
            },
            Action::Update(data) => match *data {
                Data::Prepared(result) => self.add(result),
                Data::Uploaded(result) => self.finish(result, collection),
                _ => None,
            },
            _ => None,
        })
    }
    pub fn draw(&mut self, f: &mut Frame<'_>, area: Rect, focused: bool) -> Result<()> {
        let [path, files, caption, submit, note] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        f.render_widget(&self.path, path);

        let block = Block::bordered()
            .title(format!("Files ({})", self.batch.staged().len()))
            .border_style(if focused && self.field == Field::Files {
                Style::default()
            } else {
                Style::default().dim()
            });
        let inner = block.inner(files);
        f.render_widget(block, files);
        let [list, thumbnail] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(16)]).areas(inner);
        let items = self
            .batch
            .staged()
            .iter()
            .map(|staged| {
                ListItem::from(Line::from(vec![
                    utils::kind_label(staged.file.kind),
                    Span::from(format!(" {} ", staged.file.name)),
                    Span::from(utils::human_size(staged.file.size)).dim(),
                ]))
            })
            .collect::<Vec<_>>();
        f.render_stateful_widget(
            List::new(items).highlight_style(Style::default().reversed()),
            list,
            &mut self.files,
        );
        if let Some(staged) = self
            .files
            .selected()
            .or(Some(0))
            .and_then(|i| self.batch.staged().get(i))
        {
            match &staged.file.preview {
                Preview::Image(thumb) => {
                    f.render_widget(ThumbnailWidget::new(&thumb.image), thumbnail);
                }
                Preview::Video(_) => {
                    f.render_widget(Paragraph::new("video").dim().centered(), thumbnail);
                }
            }
        }

        f.render_widget(&self.caption, caption);
        let mut button = Line::from(if self.batch.is_uploading() {
            "Uploading..."
        } else {
            "Upload"
        })
        .centered()
        .blue();
        if focused && self.field == Field::Submit {
            button = button.reversed();
        }
        f.render_widget(button, submit);
        if self.preparing > 0 {
            f.render_widget(Line::from("Reading file...").dim(), note);
        } else if focused && self.field == Field::Files {
            f.render_widget(Line::from("Delete to remove the highlighted file").dim(), note);
        }

        if let Some(confirm) = self.confirm.as_mut() {
            confirm.draw(f, area)?;
        }
        Ok(())
    }
}
