//! Search page state and the controller that drives it.
//!
//! [`SearchPage`] is a plain state machine: it decides *whether* to fetch
//! and *what* to show, and never touches the network. [`SearchController`]
//! pairs it with a [`NewsFeed`] and applies fetch outcomes as they arrive.
//!
//! # Overlapping searches
//!
//! Nothing is cancelled or de-duplicated. If a new search is started while
//! another is in flight, both complete and whichever resolves last overwrites
//! the results, loading flag and error.

use crate::error::ClientFetchError;
use crate::feed::NewsFeed;
use crate::models::{NewsItem, NewsResponse};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// Banner text shown when loading news fails.
pub const FETCH_ERROR_MESSAGE: &str = "Erro ao carregar notícias. Por favor, tente novamente.";

/// Maximum number of cards shown at once.
pub const MAX_CARDS: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    default_query: String,
    search_term: String,
    loading: bool,
    error: Option<String>,
    results: Vec<NewsItem>,
}

/// What the results area shows for the current state.
#[derive(Debug, PartialEq)]
pub enum View<'a> {
    Loading,
    Results(&'a [NewsItem]),
    Empty,
}

impl SearchPage {
    /// A freshly opened page: loading, nothing fetched yet.
    pub fn new(default_query: impl Into<String>) -> Self {
        Self {
            default_query: default_query.into(),
            search_term: String::new(),
            loading: true,
            error: None,
            results: Vec::new(),
        }
    }

    /// Start the initial load. Returns the query to fetch.
    pub fn mount(&mut self) -> String {
        let query = self.default_query.clone();
        self.begin();
        query
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Submit the search form.
    ///
    /// Returns the trimmed query to fetch, or `None` (with no state change)
    /// when the term is blank.
    pub fn submit(&mut self) -> Option<String> {
        let query = self.search_term.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        self.begin();
        Some(query)
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply the outcome of a fetch.
    ///
    /// Failures keep the previous results and set the banner message.
    pub fn complete(&mut self, outcome: Result<NewsResponse, ClientFetchError>) {
        match outcome {
            Ok(news) => {
                debug!(results = news.results.len(), "Applying fetched news");
                self.results = news.results;
            }
            Err(e) => {
                error!(error = %e, "Failed to load news");
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }
        self.loading = false;
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// All results from the last successful fetch, untruncated.
    pub fn results(&self) -> &[NewsItem] {
        &self.results
    }

    pub fn view(&self) -> View<'_> {
        if self.loading {
            View::Loading
        } else if self.results.is_empty() {
            View::Empty
        } else {
            View::Results(&self.results[..self.results.len().min(MAX_CARDS)])
        }
    }
}

/// Drives a shared [`SearchPage`] with a [`NewsFeed`].
///
/// The page lock is only held for state transitions, never across a fetch.
pub struct SearchController<F> {
    feed: Arc<F>,
    page: Arc<Mutex<SearchPage>>,
}

impl<F> Clone for SearchController<F> {
    fn clone(&self) -> Self {
        Self {
            feed: Arc::clone(&self.feed),
            page: Arc::clone(&self.page),
        }
    }
}

impl<F: NewsFeed + 'static> SearchController<F> {
    pub fn new(feed: F, page: SearchPage) -> Self {
        Self {
            feed: Arc::new(feed),
            page: Arc::new(Mutex::new(page)),
        }
    }

    /// Mount the page and load the default query.
    pub async fn load_initial(&self) {
        let query = self.page.lock().await.mount();
        self.fetch(query).await;
    }

    /// Set the search term and submit it, waiting for the fetch to finish.
    ///
    /// Returns `false` when the term was blank and nothing was requested.
    pub async fn search(&self, term: &str) -> bool {
        match self.begin_search(term).await {
            Some(query) => {
                self.fetch(query).await;
                true
            }
            None => false,
        }
    }

    /// Like [`search`](Self::search) but runs the fetch as a background task.
    ///
    /// Earlier in-flight searches are left running.
    pub async fn spawn_search(&self, term: &str) -> Option<JoinHandle<()>> {
        let query = self.begin_search(term).await?;
        let this = self.clone();
        Some(tokio::spawn(async move { this.fetch(query).await }))
    }

    /// A copy of the current page state.
    pub async fn snapshot(&self) -> SearchPage {
        self.page.lock().await.clone()
    }

    async fn begin_search(&self, term: &str) -> Option<String> {
        let mut page = self.page.lock().await;
        page.set_search_term(term);
        let query = page.submit();
        if query.is_none() {
            debug!("Ignoring blank search");
        }
        query
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, query: String) {
        let outcome = self.feed.search(&query).await;
        info!(ok = outcome.is_ok(), "Search finished");
        self.page.lock().await.complete(outcome);
    }
}
