//! Drives [`FeedState`] with real fetches.
//!
//! Each category change spawns one task that runs the fetch and the minimum
//! loading delay side by side, then reports back over a channel tagged with
//! its generation. [`Feed::next_update`] applies only the latest one.
//!
//! Superseded tasks are never aborted; their results are dropped on arrival.
//! Dropping the `Feed` drops the receiver, so late results from a torn-down
//! view go nowhere.

use crate::models::{Category, FetchResult};
use crate::news::NewsSource;
use crate::view::state::FeedState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug)]
struct Loaded {
    generation: u64,
    category: Category,
    result: FetchResult,
}

pub struct Feed {
    state: FeedState,
    source: Arc<dyn NewsSource>,
    min_loading: Duration,
    tx: mpsc::UnboundedSender<Loaded>,
    rx: mpsc::UnboundedReceiver<Loaded>,
}

impl Feed {
    /// Create the view and immediately start loading `initial`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(source: Arc<dyn NewsSource>, min_loading: Duration, initial: Category) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut feed = Self {
            state: FeedState::new(),
            source,
            min_loading,
            tx,
            rx,
        };
        feed.change_category(initial);
        feed
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Switch to `category` and start a new fetch, superseding any in flight.
    pub fn change_category(&mut self, category: Category) {
        let generation = self.state.begin_fetch(category);
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let min_loading = self.min_loading;
        info!(%category, generation, "Loading news");

        tokio::spawn(async move {
            let (result, ()) =
                futures::future::join(source.fetch(category), tokio::time::sleep(min_loading))
                    .await;
            if tx
                .send(Loaded {
                    generation,
                    category,
                    result,
                })
                .is_err()
            {
                debug!(%category, generation, "View gone; dropping result");
            }
        });
    }

    pub fn open(&mut self, index: usize) -> bool {
        self.state.open(index)
    }

    pub fn close(&mut self) -> bool {
        self.state.close()
    }

    /// Wait until a fetch result commits. Stale results are discarded
    /// without returning.
    ///
    /// Cancel-safe: dropping the future never loses a current result.
    pub async fn next_update(&mut self) {
        while let Some(loaded) = self.rx.recv().await {
            let count = loaded.result.articles.len();
            if self.state.commit(loaded.generation, loaded.result) {
                info!(
                    category = %loaded.category,
                    generation = loaded.generation,
                    count,
                    "News ready"
                );
                return;
            }
            debug!(
                category = %loaded.category,
                generation = loaded.generation,
                latest = self.state.generation(),
                "Discarding stale result"
            );
        }
    }
}
