//! The view state machine.
//!
//! Two independent axes:
//! - [`Phase`]: `Loading` until the latest fetch commits, then `Ready`
//! - [`Detail`]: whether the full-article overlay is open
//!
//! Every fetch is tagged with a generation number. Only the result carrying
//! the most recent generation may commit; anything older is stale.

use crate::models::{Article, Category, FetchResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    Ready(Vec<Article>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Closed,
    Open(Article),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    category: Category,
    phase: Phase,
    detail: Detail,
    generation: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            category: Category::All,
            phase: Phase::Loading,
            detail: Detail::Closed,
            generation: 0,
        }
    }
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn detail(&self) -> &Detail {
        &self.detail
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// Articles currently on screen, empty while loading.
    pub fn articles(&self) -> &[Article] {
        match &self.phase {
            Phase::Ready(articles) => articles,
            Phase::Loading => &[],
        }
    }

    /// Enter `Loading` for `category` and return the generation the new
    /// fetch must present when it commits.
    ///
    /// Re-selecting the current category starts a fresh fetch as well.
    pub fn begin_fetch(&mut self, category: Category) -> u64 {
        self.category = category;
        self.phase = Phase::Loading;
        self.generation += 1;
        self.generation
    }

    /// Apply a finished fetch. Returns `false` (and changes nothing) when a
    /// newer fetch has started since `generation` was issued.
    pub fn commit(&mut self, generation: u64, result: FetchResult) -> bool {
        if generation != self.generation {
            return false;
        }
        self.phase = Phase::Ready(result.articles);
        true
    }

    /// Open the overlay on the article at `index` (0-based).
    ///
    /// Ignored while loading or when `index` is out of range.
    pub fn open(&mut self, index: usize) -> bool {
        let Phase::Ready(articles) = &self.phase else {
            return false;
        };
        match articles.get(index) {
            Some(article) => {
                self.detail = Detail::Open(article.clone());
                true
            }
            None => false,
        }
    }

    /// Close the overlay. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = matches!(self.detail, Detail::Open(_));
        self.detail = Detail::Closed;
        was_open
    }
}
