use cliplog_base::ClipEntry;

pub const DEFAULT_CAPACITY: usize = 30;

/// Ordered clip sequence, newest first. Pure data structure: capacity is
/// enforced by the coordinator through `excess` and `truncate_to_capacity`,
/// never by `add` itself, so that evicted entries can be inspected before
/// they are discarded.
pub struct HistoryStore {
    capacity: usize,

    clips: Vec<ClipEntry>,
}

impl HistoryStore {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity == 0 { DEFAULT_CAPACITY } else { capacity };
        Self { capacity, clips: Vec::new() }
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize { self.capacity }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.clips.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.clips.is_empty() }

    #[inline]
    pub fn add(&mut self, clip: ClipEntry) { self.clips.insert(0, clip); }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ClipEntry> { self.clips.get(index) }

    pub fn remove(&mut self, index: usize) -> Option<ClipEntry> {
        (index < self.clips.len()).then(|| self.clips.remove(index))
    }

    /// Mutates the content of the text entry at `index` in place. Returns
    /// `false` without mutating anything for image entries and out-of-range
    /// indices.
    pub fn update_text<S>(&mut self, index: usize, content: S) -> bool
    where
        S: Into<String>,
    {
        self.clips.get_mut(index).is_some_and(|clip| clip.set_text(content))
    }

    #[inline]
    pub fn clear(&mut self) { self.clips.clear(); }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[ClipEntry] { &self.clips }

    #[inline]
    pub fn import(&mut self, clips: Vec<ClipEntry>) { self.clips = clips; }

    /// The oldest entries beyond the capacity boundary, in order.
    #[inline]
    #[must_use]
    pub fn excess(&self) -> &[ClipEntry] {
        if self.clips.len() > self.capacity {
            &self.clips[self.capacity..]
        } else {
            &[]
        }
    }

    #[inline]
    pub fn truncate_to_capacity(&mut self) { self.clips.truncate(self.capacity); }
}
