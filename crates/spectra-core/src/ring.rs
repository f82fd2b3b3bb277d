//! Fixed-capacity ring of spectrum windows with lookahead/lookbehind addressing.

use std::collections::TryReserveError;

use crate::window::SpectralWindow;

/// Circular buffer of owned windows, addressed relative to the newest.
///
/// `nth(0)` is the window produced by the current hop, `nth(1)` the one
/// before it, up to `nth(depth - 1)`, the oldest, which is the next to be
/// resynthesized. The ring never allocates after construction: rotating
/// recycles the oldest slot as the next newest.
///
/// # Example
///
/// ```rust
/// use spectra_core::{Window, WindowRing};
///
/// let mut ring: WindowRing<Window> = WindowRing::new(3, 5).unwrap();
/// ring.newest_mut().parts_mut().0[1] = 1.0;
/// assert_eq!(ring.nth(0).real()[1], 1.0);
/// assert_eq!(ring.oldest().real()[1], 0.0);
/// assert!(ring.get(3).is_none());
/// ```
#[derive(Debug)]
pub struct WindowRing<W> {
    windows: Vec<W>,
    newest: usize,
    produced: u64,
}

impl<W: SpectralWindow> WindowRing<W> {
    /// Allocate `depth` zeroed windows of `spectrum_size` bins.
    pub fn new(depth: usize, spectrum_size: usize) -> Result<Self, TryReserveError> {
        let mut windows = Vec::new();
        windows.try_reserve_exact(depth)?;
        windows.extend((0..depth).map(|_| W::with_spectrum_size(spectrum_size)));
        Ok(Self {
            windows,
            newest: 0,
            produced: 0,
        })
    }
}

impl<W> WindowRing<W> {
    /// Number of windows retained.
    pub fn depth(&self) -> usize {
        self.windows.len()
    }

    /// Number of windows produced since the ring was created,
    /// including the one currently at `nth(0)` once it has been filled.
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Whether every slot holds a produced window.
    pub fn is_full(&self) -> bool {
        self.produced >= self.windows.len() as u64
    }

    fn slot(&self, k: usize) -> usize {
        (self.newest + k) % self.windows.len()
    }

    /// The window `k` hops older than the newest.
    ///
    /// # Panics
    ///
    /// Panics if `k >= depth()`.
    pub fn nth(&self, k: usize) -> &W {
        assert!(k < self.depth(), "ring index {k} out of range (depth {})", self.depth());
        &self.windows[self.slot(k)]
    }

    /// Mutable access to the window `k` hops older than the newest.
    ///
    /// # Panics
    ///
    /// Panics if `k >= depth()`.
    pub fn nth_mut(&mut self, k: usize) -> &mut W {
        assert!(k < self.depth(), "ring index {k} out of range (depth {})", self.depth());
        let slot = self.slot(k);
        &mut self.windows[slot]
    }

    /// Like [`nth`](Self::nth), returning `None` when out of range.
    pub fn get(&self, k: usize) -> Option<&W> {
        (k < self.depth()).then(|| &self.windows[self.slot(k)])
    }

    /// Like [`nth_mut`](Self::nth_mut), returning `None` when out of range.
    pub fn get_mut(&mut self, k: usize) -> Option<&mut W> {
        if k < self.depth() {
            let slot = self.slot(k);
            Some(&mut self.windows[slot])
        } else {
            None
        }
    }

    /// The window produced by the current hop.
    pub fn newest(&self) -> &W {
        self.nth(0)
    }

    /// Mutable access to the window produced by the current hop.
    pub fn newest_mut(&mut self) -> &mut W {
        self.nth_mut(0)
    }

    /// The window next in line for resynthesis.
    pub fn oldest(&self) -> &W {
        self.nth(self.depth() - 1)
    }

    /// Swap the oldest window out for `replacement`, returning it.
    pub(crate) fn replace_oldest(&mut self, replacement: W) -> W {
        let k = self.depth() - 1;
        std::mem::replace(self.nth_mut(k), replacement)
    }

    /// Iterate from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &W> {
        (0..self.depth()).map(move |k| &self.windows[self.slot(k)])
    }

    pub(crate) fn mark_produced(&mut self) {
        self.produced += 1;
    }

    /// Advance one hop: the oldest slot becomes the newest.
    pub(crate) fn rotate(&mut self) {
        let len = self.windows.len();
        self.newest = (self.newest + len - 1) % len;
    }
}
