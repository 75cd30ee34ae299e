//! Background page fetches.
//!
//! Every request runs on its own tokio task and reports back through one
//! unbounded channel that the frame loop drains. Cache hits skip the task
//! and go straight into the same channel, so all results are applied in one
//! place and in arrival order.

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use reel_tmdb::{Endpoint, TmdbClient, TmdbError};
use reel_types::MoviePage;

/// Which piece of state a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    HomeRow(usize),
    PopularTable,
    PopularFeed { generation: u64 },
    SearchFeed { generation: u64 },
}

#[derive(Debug)]
pub struct FetchEvent {
    pub target: FetchTarget,
    pub endpoint: Endpoint,
    pub page: u32,
    /// Session epoch at request time; bumped on logout.
    pub epoch: u64,
    pub cached: bool,
    pub result: Result<MoviePage, TmdbError>,
}

#[derive(Debug)]
pub(crate) struct FetchQueue {
    tx: mpsc::UnboundedSender<FetchEvent>,
    rx: mpsc::UnboundedReceiver<FetchEvent>,
}

impl Default for FetchQueue {
    fn default() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl FetchQueue {
    /// Queue an already-known result.
    pub(crate) fn deliver(&self, event: FetchEvent) {
        // The receiver lives as long as `self`.
        let _ = self.tx.send(event);
    }

    pub(crate) fn spawn(
        &self,
        client: TmdbClient,
        target: FetchTarget,
        endpoint: Endpoint,
        page: u32,
        epoch: u64,
    ) {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(endpoint = endpoint.name(), page, "No async runtime for fetch");
            self.deliver(FetchEvent {
                target,
                endpoint,
                page,
                epoch,
                cached: false,
                result: Err(TmdbError::Client("no async runtime".to_string())),
            });
            return;
        };

        let tx = self.tx.clone();
        handle.spawn(async move {
            let result = client.fetch_page(&endpoint, page).await;
            let _ = tx.send(FetchEvent {
                target,
                endpoint,
                page,
                epoch,
                cached: false,
                result,
            });
        });
    }

    pub(crate) fn try_recv(&mut self) -> Option<FetchEvent> {
        self.rx.try_recv().ok()
    }
}
