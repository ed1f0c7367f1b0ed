use super::super::types::{MediaPage, MediaQuery};
use super::super::{ApiClient, Watch, Watcher};
use std::{sync::Arc, time::Duration};
use tokio::sync::{broadcast, watch};
use tokio::time;

/// Latest state of a media listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MediaUpdate {
    #[default]
    Loading,
    Loaded(MediaPage),
    Failed(String),
}

impl Watcher {
    pub fn media(&self, query: MediaQuery) -> impl Watch<Output = MediaUpdate> {
        let (tx, _) = broadcast::channel(1);
        MediaWatcher {
            client: self.client.clone(),
            query,
            period: Duration::from_secs(self.config.intervals.media.max(1)),
            tx,
        }
    }
}

#[derive(Debug, Clone)]
enum Command {
    Quit,
    Refresh,
}

struct MediaWatcher {
    client: Arc<ApiClient>,
    query: MediaQuery,
    period: Duration,
    tx: broadcast::Sender<Command>,
}

impl Watch for MediaWatcher {
    type Output = MediaUpdate;

    fn subscribe(&self) -> watch::Receiver<Self::Output> {
        let (client, query) = (self.client.clone(), Arc::new(self.query.clone()));
        let mut command = self.tx.subscribe();
        let mut interval = time::interval(self.period);
        let (tx, rx) = watch::channel(MediaUpdate::default());
        tokio::spawn(async move {
            loop {
                let tick = interval.tick();
                tokio::select! {
                    Ok(command) = command.recv() => {
                        match command {
                            Command::Refresh => {
                                let (client, query, tx) = (client.clone(), query.clone(), tx.clone());
                                tokio::spawn(async move {
                                    update(&client, &query, &tx).await;
                                });
                            }
                            Command::Quit => {
                                break;
                            }
                        }
                    }
                    _ = tick => {
                        let (client, query, tx) = (client.clone(), query.clone(), tx.clone());
                        tokio::spawn(async move {
                            update(&client, &query, &tx).await;
                        });
                    }
                }
            }
            log::debug!("media watcher quit");
        });
        rx
    }
    fn unsubscribe(&self) {
        if let Err(e) = self.tx.send(Command::Quit) {
            log::error!("failed to send quit command: {e}");
        }
    }
    fn refresh(&self) {
        if let Err(e) = self.tx.send(Command::Refresh) {
            log::error!("failed to send refresh command: {e}");
        }
    }
}

async fn update(client: &ApiClient, query: &MediaQuery, tx: &watch::Sender<MediaUpdate>) {
    match client.list_media(query).await {
        Ok(page) => {
            log::debug!("fetch {} of {} media", page.media.len(), page.total);
            tx.send(MediaUpdate::Loaded(page)).ok();
        }
        Err(e) => {
            log::error!("failed to list media: {e}");
            tx.send(MediaUpdate::Failed(e.user_message())).ok();
        }
    }
}
