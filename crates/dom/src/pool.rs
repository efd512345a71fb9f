use countme::Count;

/// Minimum number of elements a freshly grown region holds, mirroring
/// the `max(100, 65536 / sizeof(T))` initial-size rule.
const MIN_BYTES: usize = 65536;

fn min_capacity<T>() -> usize {
    let per_elem = core::mem::size_of::<T>().max(1);
    (MIN_BYTES / per_elem).max(100)
}

/// A reusable append buffer that hands out owned slices carved from an
/// internal growable region.
///
/// `put`/`put_slice` accumulate into the region; `extract_array` copies the
/// accumulated run out into an independent, immutably owned `Box<[T]>` and
/// clears the region so the next `put` sequence starts from an empty, but
/// still-allocated, buffer. Because every extracted slice is its own heap
/// allocation, it can never be invalidated by a later growth of the scratch
/// region — the invalidation-safety guarantee falls out of
/// the copy-out rather than needing hand-rolled region-switching (see
/// `DESIGN.md`). Growth of the scratch region itself is delegated to
/// `Vec<T>`'s own amortized doubling; the minimum initial capacity still
/// matches the same `max(100, 65536 / sizeof(T))` rule the region starts at.
///
/// Not copyable: cloning a pool would make two owners believe they can
/// extract the same backing storage.
pub struct Pool<T> {
    region: Vec<T>,
    _c: Count<Pool<T>>,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Pool { region: Vec::with_capacity(min_capacity::<T>()), _c: Count::new() }
    }

    /// Number of live (not yet extracted) elements.
    pub fn len(&self) -> usize {
        self.region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }
}

impl<T: Clone> Pool<T> {
    pub fn put(&mut self, item: T) {
        self.region.push(item);
    }

    pub fn put_slice(&mut self, items: &[T]) {
        self.region.extend_from_slice(items);
    }

    /// Extracts everything accumulated since the last `extract_array` call
    /// (or since construction) as an owned, independent slice, and leaves
    /// the pool ready to accumulate the next sibling group.
    pub fn extract_array(&mut self) -> Box<[T]> {
        self.region.drain(..).collect::<Vec<T>>().into_boxed_slice()
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool::new()
    }
}
