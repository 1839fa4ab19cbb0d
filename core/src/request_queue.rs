use crate::document::{DocumentFilter, DocumentStatus, ExecutionPolicy, ScoredDocument};
use crate::error::Result;
use crate::server::SearchServer;
use std::collections::VecDeque;

/// One request per minute over a day.
pub const MINUTES_IN_DAY: usize = 1440;

/// Forwards queries to a [`SearchServer`] and remembers how many of the most
/// recent requests came back empty.
#[derive(Debug)]
pub struct RequestQueue<'s> {
    server: &'s SearchServer,
    requests: VecDeque<usize>,
    window: usize,
    no_result_requests: usize,
}

impl<'s> RequestQueue<'s> {
    pub fn new(server: &'s SearchServer) -> Self {
        Self::with_window(server, MINUTES_IN_DAY)
    }

    /// Queue that keeps the last `window` requests; a zero window is widened to one.
    pub fn with_window(server: &'s SearchServer, window: usize) -> Self {
        let window = window.max(1);
        Self { server, requests: VecDeque::with_capacity(window), window, no_result_requests: 0 }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<ScoredDocument>> {
        self.add_find_request_by(raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_by<F>(&mut self, raw_query: &str, filter: F) -> Result<Vec<ScoredDocument>>
    where
        F: DocumentFilter,
    {
        let result = self
            .server
            .find_top_documents_with(ExecutionPolicy::Sequential, raw_query, &filter)?;
        self.record(result.len());
        Ok(result)
    }

    fn record(&mut self, result_count: usize) {
        if self.requests.len() == self.window {
            if let Some(0) = self.requests.pop_front() {
                self.no_result_requests -= 1;
            }
        }
        if result_count == 0 {
            self.no_result_requests += 1;
        }
        self.requests.push_back(result_count);
    }

    /// Requests inside the window that returned nothing.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
