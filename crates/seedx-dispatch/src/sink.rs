//! Order-preserving output sink: workers may finish
//! queries out of order, but buffers are released to the downstream
//! consumer strictly in ascending query id order.

use hashbrown::HashMap;
use parking_lot::Mutex;
use seedx_types::QueryId;

struct SinkState {
    next_expected: QueryId,
    pending: HashMap<QueryId, Vec<u8>>,
    ready: Vec<(QueryId, Vec<u8>)>,
}

pub struct OutputSink {
    state: Mutex<SinkState>,
}

impl OutputSink {
    #[must_use]
    pub fn new(first_query_id: QueryId) -> Self {
        Self {
            state: Mutex::new(SinkState {
                next_expected: first_query_id,
                pending: HashMap::new(),
                ready: Vec::new(),
            }),
        }
    }

    /// Submit a finished query's buffer. A worker that races ahead of
    /// `next_expected` has its buffer held until delivery; one that
    /// completes the gap releases itself and any buffers it unblocks.
    pub fn submit(&self, query_id: QueryId, buffer: Vec<u8>) {
        let mut state = self.state.lock();
        state.pending.insert(query_id, buffer);
        loop {
            let next = state.next_expected;
            match state.pending.remove(&next) {
                Some(buf) => {
                    state.ready.push((next, buf));
                    state.next_expected = next + 1;
                }
                None => break,
            }
        }
    }

    /// Drain whatever has become ready for delivery since the last
    /// call, in strictly ascending query-id order.
    pub fn drain_ready(&self) -> Vec<(QueryId, Vec<u8>)> {
        let mut state = self.state.lock();
        std::mem::take(&mut state.ready)
    }

    #[must_use]
    pub fn is_fully_drained(&self) -> bool {
        let state = self.state.lock();
        state.pending.is_empty() && state.ready.is_empty()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }
}
