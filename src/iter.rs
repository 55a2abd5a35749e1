use crossbeam_channel::Receiver;

/// Lazy, finite, single-pass stream of `(key, value)` pairs merged from
/// per-shard scans.
///
/// Entries arrive in no particular order — neither across shards nor
/// within one. The stream can only be consumed once; for another pass,
/// take a fresh snapshot. Dropping it mid-stream is fine: the merge
/// threads notice the disconnected channel and stop forwarding.
pub struct Entries<V> {
    rx: Receiver<(String, V)>,
}

impl<V> Entries<V> {
    pub(crate) fn new(rx: Receiver<(String, V)>) -> Self {
        Self { rx }
    }
}

impl<V> Iterator for Entries<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.rx.recv().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Whatever is already buffered is a lower bound; the merge may
        // still be forwarding more.
        (self.rx.len(), None)
    }
}
