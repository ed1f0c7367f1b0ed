use super::types::{Action, ArchiveReport, Data, Status, View};
use super::utils;
use super::ViewComponent;
use crate::backend::types::{MediaKind, MediaPage, MediaQuery};
use crate::backend::{ApiClient, MediaUpdate, Watch, Watcher};
use crate::config::GalleryConfig;
use crate::gallery::preview::{self, Thumbnail};
use crate::gallery::{download, ArchiveBuilder, Collection, LightboxCommand, Navigator};
use crate::gallery::{SelectionSet, SwipeTracker};
use crate::widgets::LightboxWidget;
use color_eyre::Result;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use indexmap::IndexMap;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListState, Padding, Paragraph};
use ratatui::Frame;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tui_textarea::TextArea;

const PREVIEW_CACHE_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Filter {
    #[default]
    All,
    Images,
    Videos,
}

impl Filter {
    fn next(&self) -> Self {
        match self {
            Self::All => Self::Images,
            Self::Images => Self::Videos,
            Self::Videos => Self::All,
        }
    }
    fn kind(&self) -> Option<MediaKind> {
        match self {
            Self::All => None,
            Self::Images => Some(MediaKind::Image),
            Self::Videos => Some(MediaKind::Video),
        }
    }
    fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Images => "Photos",
            Self::Videos => "Videos",
        }
    }
}

pub struct GalleryViewComponent {
    action_tx: UnboundedSender<Action>,
    client: Arc<ApiClient>,
    watcher: Arc<Watcher>,
    media: Box<dyn Watch<Output = MediaUpdate>>,
    quit: Option<oneshot::Sender<()>>,
    query: MediaQuery,
    filter: Filter,
    page: Option<MediaPage>,
    error: Option<String>,
    collection: Collection,
    selection: SelectionSet,
    state: ListState,
    navigator: Navigator,
    swipe: SwipeTracker,
    previews: IndexMap<String, Result<Thumbnail, String>>,
    search: Option<TextArea<'static>>,
    /// Identifiers in the archive currently being built.
    archiving: Option<SelectionSet>,
    download_dir: PathBuf,
}

impl GalleryViewComponent {
    pub fn new(
        action_tx: UnboundedSender<Action>,
        client: Arc<ApiClient>,
        watcher: Arc<Watcher>,
        config: &GalleryConfig,
    ) -> Self {
        let query = MediaQuery {
            limit: config.page_size.max(1),
            ..Default::default()
        };
        Self {
            action_tx,
            client,
            media: Box::new(watcher.media(query.clone())),
            watcher,
            quit: None,
            query,
            filter: Filter::default(),
            page: None,
            error: None,
            collection: Collection::new(),
            selection: SelectionSet::new(),
            state: ListState::default(),
            navigator: Navigator::default(),
            swipe: SwipeTracker::new(config.swipe_threshold),
            previews: IndexMap::new(),
            search: None,
            archiving: None,
            download_dir: config
                .download_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
    fn requery(&mut self, f: impl FnOnce(&mut MediaQuery)) -> Result<Option<Action>> {
        self.deactivate()?;
        f(&mut self.query);
        log::debug!("requery: {:?}", self.query);
        self.media = Box::new(self.watcher.media(self.query.clone()));
        self.page = None;
        self.activate()?;
        Ok(Some(Action::Render))
    }
    fn selected_id(&self) -> Option<String> {
        self.state
            .selected()
            .and_then(|i| self.collection.get_index(i))
            .map(|item| item.id().to_string())
    }
    fn apply(&mut self, command: LightboxCommand) -> Option<Action> {
        if !self.navigator.apply(command, &self.collection) {
            return None;
        }
        if let Some(index) = self
            .navigator
            .current()
            .and_then(|id| self.collection.index_of(id))
        {
            self.state.select(Some(index));
        }
        self.load_preview();
        Some(Action::Render)
    }
    fn load_preview(&mut self) {
        let Some(item) = self.navigator.current_item(&self.collection) else {
            return;
        };
        if item.kind() != MediaKind::Image || self.previews.contains_key(item.id()) {
            return;
        }
        let (id, url) = (item.id().to_string(), item.url().to_string());
        let (client, tx) = (self.client.clone(), self.action_tx.clone());
        tokio::spawn(async move {
            let result = match client.fetch_bytes(&url).await {
                Ok(bytes) => preview::thumbnail_from_bytes(bytes)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.user_message()),
            };
            if let Err(e) = &result {
                log::warn!("failed to load preview of {id}: {e}");
            }
            tx.send(Action::Update(Box::new(Data::Preview(id, result))))
                .ok();
        });
    }
    fn download_selection(&mut self) -> Option<Action> {
        if self.archiving.is_some() {
            return None;
        }
        if self.selection.is_empty() {
            return Some(Action::Status(Status::Error(String::from(
                "Select at least one item to download",
            ))));
        }
        let selection = self.selection.clone();
        self.archiving = Some(selection.clone());
        let builder = ArchiveBuilder::new(self.client.as_ref().clone());
        let collection = self.collection.clone();
        let (dir, tx) = (self.download_dir.clone(), self.action_tx.clone());
        tokio::spawn(async move {
            let result = match builder.build(&selection, &collection).await {
                Ok(Some(archive)) if !archive.is_empty() => {
                    archive.save(&dir).await.map(|path| ArchiveReport {
                        path: Some(path),
                        entries: archive.entries.len(),
                        skipped: archive.skipped.len(),
                    })
                }
                Ok(archive) => Ok(ArchiveReport {
                    path: None,
                    entries: 0,
                    skipped: archive.map(|a| a.skipped.len()).unwrap_or_default(),
                }),
                Err(e) => Err(e),
            };
            let result = result.map_err(|e| {
                log::error!("failed to build archive: {e}");
                String::from("Failed to download media")
            });
            tx.send(Action::Update(Box::new(Data::Archived(result))))
                .ok();
        });
        Some(Action::Render)
    }
    fn download_current(&mut self) -> Option<Action> {
        let item = self.navigator.current_item(&self.collection)?.clone();
        let (client, dir, tx) = (
            self.client.clone(),
            self.download_dir.clone(),
            self.action_tx.clone(),
        );
        tokio::spawn(async move {
            let result = match client.fetch_bytes(item.url()).await {
                Ok(bytes) => download::save(&dir, &download::file_name(&item), &bytes)
                    .await
                    .map_err(|e| {
                        log::error!("failed to save {}: {e}", item.id());
                        e.to_string()
                    }),
                Err(e) => {
                    log::error!("failed to download {}: {e}", item.id());
                    Err(e.user_message())
                }
            };
            tx.send(Action::Update(Box::new(Data::Saved(result)))).ok();
        });
        Some(Action::Status(Status::Info(String::from("Downloading..."))))
    }
    fn open_external(&self) -> Option<Action> {
        let item = self
            .navigator
            .current_item(&self.collection)
            .or_else(|| self.state.selected().and_then(|i| self.collection.get_index(i)))?;
        let url = self.client.url(item.url());
        Some(match open::that_detached(&url) {
            Ok(()) => Action::Status(Status::Info(format!("Opened {url}"))),
            Err(e) => {
                log::error!("failed to open {url}: {e}");
                Action::Status(Status::Error(format!("Failed to open {url}")))
            }
        })
    }
    fn on_media(&mut self, update: MediaUpdate) -> Option<Action> {
        match update {
            MediaUpdate::Loading => return None,
            MediaUpdate::Loaded(mut page) => {
                self.collection.replace_all(page.media.drain(..));
                self.selection.retain_present(&self.collection);
                if self
                    .navigator
                    .current()
                    .is_some_and(|id| !self.collection.contains(id))
                {
                    log::debug!("lightbox item {:?} is gone", self.navigator.current());
                    self.navigator.close();
                }
                self.page = Some(page);
                self.error = None;
                if self.collection.is_empty() {
                    self.state.select(None);
                } else {
                    let last = self.collection.len() - 1;
                    self.state
                        .select(Some(self.state.selected().unwrap_or_default().min(last)));
                }
            }
            MediaUpdate::Failed(message) => {
                self.error = Some(message);
            }
        }
        Some(Action::Render)
    }
}

impl ViewComponent for GalleryViewComponent {
    fn view(&self) -> View {
        View::Gallery
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
        if let Some(search) = self.search.as_mut() {
            return Ok(utils::input(search, key));
        }
        if self.navigator.is_open() {
            if let Some(command) = LightboxCommand::from_key(&key) {
                return Ok(self.apply(command).or(Some(Action::Render)));
            }
        }
        Ok(None)
    }
    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let x = i32::from(mouse.column);
        Ok(match (mouse.kind, self.navigator.is_open()) {
            (MouseEventKind::Down(MouseButton::Left), true) => {
                self.swipe.start(x);
                None
            }
            (MouseEventKind::Up(MouseButton::Left), true) => {
                self.swipe.end(x).and_then(|command| self.apply(command))
            }
            (MouseEventKind::ScrollDown, false) => Some(Action::NextItem),
            (MouseEventKind::ScrollUp, false) => Some(Action::PrevItem),
            _ => None,
        })
    }
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Some(search) = self.search.as_ref() {
            match action {
                Action::Enter => {
                    let text = utils::text(search).trim().to_string();
                    self.search = None;
                    return self.requery(|query| {
                        query.page = 1;
                        query.search = (!text.is_empty()).then_some(text);
                    });
                }
                Action::Back => {
                    self.search = None;
                    return Ok(Some(Action::Render));
                }
                Action::Update(_) => {}
                _ => return Ok(None),
            }
        }
        match action {
            Action::NextItem if !self.navigator.is_open() && !self.collection.is_empty() => {
                self.state.select(Some(
                    self.state
                        .selected()
                        .map(|s| (s + 1).min(self.collection.len() - 1))
                        .unwrap_or_default(),
                ));
                return Ok(Some(Action::Render));
            }
            Action::PrevItem if !self.navigator.is_open() && !self.collection.is_empty() => {
                self.state.select(Some(
                    self.state
                        .selected()
                        .map(|s| s.max(1) - 1)
                        .unwrap_or_default(),
                ));
                return Ok(Some(Action::Render));
            }
            Action::Toggle if !self.navigator.is_open() => {
                if let Some(id) = self.selected_id() {
                    self.selection.toggle(&id);
                    return Ok(Some(Action::Render));
                }
            }
            Action::ClearSelection if !self.selection.is_empty() => {
                self.selection.clear();
                return Ok(Some(Action::Render));
            }
            Action::Enter if !self.navigator.is_open() => {
                if let Some(id) = self.selected_id() {
                    if self.navigator.open(&id, &self.collection) {
                        self.load_preview();
                        return Ok(Some(Action::Render));
                    }
                }
            }
            Action::Back if self.navigator.is_open() => {
                return Ok(self.apply(LightboxCommand::Close));
            }
            Action::Download if self.navigator.is_open() => {
                return Ok(self.download_current());
            }
            Action::Download => {
                return Ok(self.download_selection());
            }
            Action::Open => {
                return Ok(self.open_external());
            }
            Action::Refresh => {
                self.media.refresh();
            }
            Action::Filter if !self.navigator.is_open() => {
                self.filter = self.filter.next();
                let kind = self.filter.kind();
                return self.requery(|query| {
                    query.page = 1;
                    query.kind = kind;
                });
            }
            Action::Search if !self.navigator.is_open() => {
                let mut search = utils::single_line_input("Search");
                if let Some(text) = &self.query.search {
                    search.insert_str(text);
                }
                utils::set_focused(&mut search, true);
                self.search = Some(search);
                return Ok(Some(Action::Render));
            }
            Action::NextPage if !self.navigator.is_open() => {
                if self.page.as_ref().is_some_and(MediaPage::has_next) {
                    return self.requery(|query| query.page += 1);
                }
            }
            Action::PrevPage if !self.navigator.is_open() => {
                if self.page.as_ref().is_some_and(MediaPage::has_prev) {
                    return self.requery(|query| query.page -= 1);
                }
            }
            Action::Update(data) => {
                return Ok(match *data {
                    Data::Media(update) => self.on_media(update),
                    Data::Preview(id, result) => {
                        self.previews.insert(id, result);
                        if self.previews.len() > PREVIEW_CACHE_SIZE {
                            self.previews.shift_remove_index(0);
                        }
                        Some(Action::Render)
                    }
                    Data::Archived(result) => {
                        let archived = self.archiving.take();
                        Some(Action::Status(match result {
                            Ok(report) => {
                                if let Some(archived) = archived {
                                    self.selection.subtract(&archived);
                                }
                                Status::Info(report.message())
                            }
                            Err(message) => Status::Error(message),
                        }))
                    }
                    Data::Saved(result) => Some(Action::Status(match result {
                        Ok(path) => Status::Info(format!("Saved {}", path.display())),
                        Err(message) => Status::Error(message),
                    })),
                    _ => None,
                });
            }
            _ => {}
        }
        Ok(None)
    }
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [header, search, list, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(if self.search.is_some() { 3 } else { 0 }),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let mut title = vec![
            Span::from("Gallery").bold(),
            Span::from(format!("  [{}]", self.filter.label())).cyan(),
        ];
        if let Some(search) = &self.query.search {
            title.push(Span::from(format!("  \"{search}\"")).italic());
        }
        if let Some(page) = &self.page {
            title.push(
                Span::from(format!(
                    "  page {}/{} ({} items)",
                    page.page,
                    page.total_pages(),
                    page.total
                ))
                .dim(),
            );
        }
        if !self.selection.is_empty() {
            title.push(Span::from(format!("  {} selected", self.selection.len())).yellow());
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
        if let Some(textarea) = &self.search {
            f.render_widget(textarea, search);
        }

        match (&self.error, self.page.is_some(), self.collection.is_empty()) {
            (Some(error), _, true) => {
                f.render_widget(Paragraph::new(error.as_str()).red().centered(), list);
            }
            (_, false, _) => {
                f.render_widget(Paragraph::new("Loading...").dim().centered(), list);
            }
            (_, true, true) => {
                f.render_widget(Paragraph::new("No media found").dim().centered(), list);
            }
            _ => {
                let items = self
                    .collection
                    .iter()
                    .map(|item| utils::item_line(item, Some(self.selection.is_selected(item.id()))))
                    .collect::<Vec<_>>();
                f.render_stateful_widget(
                    List::new(items)
                        .block(Block::default().padding(Padding::horizontal(1)))
                        .highlight_style(Style::default().reversed()),
                    list,
                    &mut self.state,
                );
            }
        }

        let hints = if self.archiving.is_some() {
            Line::from("Preparing download...").yellow()
        } else if let Some(error) = self.error.as_ref().filter(|_| !self.collection.is_empty()) {
            Line::from(error.as_str()).red()
        } else {
            Line::from("Space select  d download  Enter view  f filter  / search  [ ] page  m menu")
                .dim()
        };
        f.render_widget(hints.centered(), footer);

        if let (Some(item), Some(position)) = (
            self.navigator.current_item(&self.collection),
            self.navigator.position(&self.collection),
        ) {
            let preview = self.previews.get(item.id());
            f.render_widget(
                LightboxWidget::new(item, position)
                    .thumbnail(preview.and_then(|p| p.as_ref().ok()))
                    .note(preview.and_then(|p| p.as_ref().err()).map(String::as_str)),
                area,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::AuthContext;
    use crate::backend::config::Config as ApiConfig;
    use crate::gallery::testing::images;
    use crossterm::event::{KeyCode, KeyModifiers};
    use tokio::sync::mpsc;

    fn component() -> (GalleryViewComponent, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = ApiConfig {
            base_url: String::from("http://127.0.0.1:9"),
            ..Default::default()
        };
        let client = Arc::new(
            ApiClient::new(&config, AuthContext::default()).expect("failed to build client"),
        );
        let watcher = Arc::new(Watcher::new(client.clone(), config));
        let gallery = GalleryViewComponent::new(tx, client, watcher, &GalleryConfig::default());
        (gallery, rx)
    }

    fn loaded(ids: &[&str]) -> Action {
        Action::Update(Box::new(Data::Media(MediaUpdate::Loaded(MediaPage {
            media: images(ids),
            total: ids.len(),
            page: 1,
            limit: 20,
        }))))
    }

    #[test]
    fn select_and_prune() {
        let (mut gallery, _rx) = component();
        gallery.update(loaded(&["a", "b", "c"])).expect("update failed");
        assert_eq!(gallery.state.selected(), Some(0));
        gallery.update(Action::Toggle).expect("update failed");
        gallery.update(Action::NextItem).expect("update failed");
        gallery.update(Action::NextItem).expect("update failed");
        gallery.update(Action::Toggle).expect("update failed");
        assert!(gallery.selection.is_selected("a"));
        assert!(gallery.selection.is_selected("c"));

        // "c" was removed on the server
        gallery.update(loaded(&["a", "b"])).expect("update failed");
        assert_eq!(gallery.selection.len(), 1);
        assert_eq!(gallery.state.selected(), Some(1));

        gallery.update(Action::ClearSelection).expect("update failed");
        assert!(gallery.selection.is_empty());
    }

    #[test]
    fn download_needs_selection() {
        let (mut gallery, _rx) = component();
        gallery.update(loaded(&["a"])).expect("update failed");
        assert!(matches!(
            gallery.update(Action::Download),
            Ok(Some(Action::Status(Status::Error(_))))
        ));
        assert!(gallery.archiving.is_none());
    }

    fn archived(entries: usize, skipped: usize) -> Action {
        let report = ArchiveReport {
            path: (entries > 0).then(|| PathBuf::from("/tmp/media-2024-06-01.zip")),
            entries,
            skipped,
        };
        Action::Update(Box::new(Data::Archived(Ok(report))))
    }

    #[test]
    fn archive_result_clears_selection_only_on_success() {
        let (mut gallery, _rx) = component();
        gallery.update(loaded(&["a", "b"])).expect("update failed");
        gallery.update(Action::Toggle).expect("update failed");
        gallery.archiving = Some(gallery.selection.clone());

        let failed = Action::Update(Box::new(Data::Archived(Err(String::from("disk full")))));
        assert!(matches!(
            gallery.update(failed),
            Ok(Some(Action::Status(Status::Error(_))))
        ));
        assert_eq!(gallery.selection.len(), 1);
        assert!(gallery.archiving.is_none());

        gallery.archiving = Some(gallery.selection.clone());
        assert!(matches!(
            gallery.update(archived(0, 1)),
            Ok(Some(Action::Status(Status::Info(message)))) if message == "Nothing downloaded"
        ));
        assert!(gallery.selection.is_empty());
    }

    #[tokio::test]
    async fn download_clears_archived_items() {
        let (mut gallery, _rx) = component();
        gallery.update(loaded(&["a", "b", "c", "d", "e"])).expect("update failed");
        for step in [Action::Toggle, Action::NextItem, Action::NextItem] {
            gallery.update(step).expect("update failed");
        }
        gallery.update(Action::Toggle).expect("update failed");
        gallery.update(Action::NextItem).expect("update failed");
        gallery.update(Action::NextItem).expect("update failed");
        gallery.update(Action::Toggle).expect("update failed");
        assert_eq!(gallery.selection.len(), 3);

        assert!(matches!(
            gallery.update(Action::Download),
            Ok(Some(Action::Render))
        ));
        assert_eq!(gallery.archiving.as_ref().map(SelectionSet::len), Some(3));
        // a second download waits for the first
        assert!(gallery.update(Action::Download).expect("update failed").is_none());

        assert!(matches!(
            gallery.update(archived(3, 0)),
            Ok(Some(Action::Status(Status::Info(_))))
        ));
        assert!(gallery.selection.is_empty());
        assert!(gallery.archiving.is_none());
    }

    #[tokio::test]
    async fn selection_made_during_download_survives() {
        let (mut gallery, _rx) = component();
        gallery.update(loaded(&["a", "b", "c"])).expect("update failed");
        gallery.update(Action::Toggle).expect("update failed");
        gallery.update(Action::Download).expect("update failed");

        gallery.update(Action::NextItem).expect("update failed");
        gallery.update(Action::Toggle).expect("update failed");
        assert!(gallery.selection.is_selected("a"));
        assert!(gallery.selection.is_selected("b"));

        gallery.update(archived(1, 0)).expect("update failed");
        assert!(!gallery.selection.is_selected("a"));
        assert!(gallery.selection.is_selected("b"));
        assert_eq!(gallery.selection.len(), 1);
    }

    #[tokio::test]
    async fn lightbox_closes_when_item_is_removed() {
        let (mut gallery, _rx) = component();
        gallery.update(loaded(&["a", "b", "c"])).expect("update failed");
        gallery.update(Action::NextItem).expect("update failed");
        gallery.update(Action::Enter).expect("update failed");
        assert_eq!(gallery.navigator.current(), Some("b"));

        // still present: stays open
        gallery.update(loaded(&["b", "c"])).expect("update failed");
        assert_eq!(gallery.navigator.current(), Some("b"));

        gallery.update(loaded(&["a", "c"])).expect("update failed");
        assert!(!gallery.navigator.is_open());
        // list keys work again
        assert!(matches!(gallery.update(Action::PrevItem), Ok(Some(Action::Render))));
        assert_eq!(gallery.state.selected(), Some(0));
    }

    #[tokio::test]
    async fn lightbox_keys() {
        let (mut gallery, _rx) = component();
        gallery.update(loaded(&["a", "b", "c"])).expect("update failed");
        gallery.update(Action::NextItem).expect("update failed");
        gallery.update(Action::Enter).expect("update failed");
        assert_eq!(gallery.navigator.current(), Some("b"));

        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        gallery.handle_key_events(key(KeyCode::Right)).expect("key failed");
        assert_eq!(gallery.navigator.current(), Some("c"));
        // no wraparound
        gallery.handle_key_events(key(KeyCode::Right)).expect("key failed");
        assert_eq!(gallery.navigator.current(), Some("c"));
        assert_eq!(gallery.state.selected(), Some(2));

        // list keys do not move the list while the lightbox is open
        gallery.update(Action::PrevItem).expect("update failed");
        assert_eq!(gallery.state.selected(), Some(2));

        gallery.handle_key_events(key(KeyCode::Esc)).expect("key failed");
        assert!(!gallery.navigator.is_open());
        // closed: arrow keys are not consumed by the lightbox
        assert!(gallery
            .handle_key_events(key(KeyCode::Left))
            .expect("key failed")
            .is_none());
    }

    #[tokio::test]
    async fn swipe_navigation() {
        let (mut gallery, _rx) = component();
        gallery.update(loaded(&["a", "b"])).expect("update failed");
        gallery.update(Action::Enter).expect("update failed");

        let mouse = |kind, column| MouseEvent {
            kind,
            column,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        gallery
            .handle_mouse_events(mouse(MouseEventKind::Down(MouseButton::Left), 100))
            .expect("mouse failed");
        gallery
            .handle_mouse_events(mouse(MouseEventKind::Up(MouseButton::Left), 26))
            .expect("mouse failed");
        assert_eq!(gallery.navigator.current(), Some("a"));

        gallery
            .handle_mouse_events(mouse(MouseEventKind::Down(MouseButton::Left), 100))
            .expect("mouse failed");
        gallery
            .handle_mouse_events(mouse(MouseEventKind::Up(MouseButton::Left), 24))
            .expect("mouse failed");
        assert_eq!(gallery.navigator.current(), Some("b"));
    }

    #[tokio::test]
    async fn search_resets_page() {
        let (mut gallery, _rx) = component();
        gallery.query.page = 3;
        gallery.update(Action::Search).expect("update failed");
        for c in "cake".chars() {
            gallery
                .handle_key_events(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .expect("key failed");
        }
        gallery.update(Action::Enter).expect("update failed");
        assert!(gallery.search.is_none());
        assert_eq!(gallery.query.page, 1);
        assert_eq!(gallery.query.search.as_deref(), Some("cake"));

        gallery.update(Action::Filter).expect("update failed");
        assert_eq!(gallery.query.kind, Some(MediaKind::Image));
        gallery.deactivate().expect("deactivate failed");
    }
}
