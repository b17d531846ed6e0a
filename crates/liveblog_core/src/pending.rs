use crate::Post;

/// Update batches held back while a segment's policy is manual.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingUpdates {
    batches: Vec<Vec<Post>>,
}

impl PendingUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty batches are not kept.
    pub fn push(&mut self, batch: Vec<Post>) {
        if !batch.is_empty() {
            self.batches.push(batch);
        }
    }

    /// Take every buffered batch in arrival order, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<Vec<Post>> {
        std::mem::take(&mut self.batches)
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Visible posts waiting, counted once per identity. Removals are not
    /// counted.
    pub fn post_count(&self) -> usize {
        let mut ids: Vec<_> = self
            .batches
            .iter()
            .flatten()
            .filter(|post| post.is_visible())
            .map(|post| &post.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}
