// src/progress.rs
/// Lightweight progress reporting for a sync.
/// Frontends implement this to surface status to users; every hook is optional.
pub trait Progress {
    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Cached records were published ahead of the network round-trip.
    fn preview(&mut self, _count: usize) {}

    /// One page came back from the remote (`count` raw entries on it).
    fn page_done(&mut self, _page: u32, _count: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
