//! Non-owning views over a sample array
//!
//! The comparer owns the two `Sample` arrays for the whole run; every window
//! created during the search is a `(backing, start, len)` triple over one of
//! them. Sub-windows never copy sample data.

use std::fmt;

use crate::features::novelty::Sample;

/// Bounds-checked view over a range of a sample array
#[derive(Clone, Copy)]
pub struct Window<'a> {
    samples: &'a [Sample],
    start: usize,
    len: usize,
}

impl<'a> Window<'a> {
    /// View covering the whole array
    pub fn full(samples: &'a [Sample]) -> Self {
        Self {
            samples,
            start: 0,
            len: samples.len(),
        }
    }

    /// View over `[start, start + len)`, or `None` if it leaves the array
    pub fn new(samples: &'a [Sample], start: usize, len: usize) -> Option<Self> {
        let end = start.checked_add(len)?;
        if end > samples.len() {
            return None;
        }
        Some(Self { samples, start, len })
    }

    /// First index covered, in backing-array coordinates
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of samples covered
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the window covers no samples
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last index covered (`start + len`)
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The whole backing array
    pub fn backing(&self) -> &'a [Sample] {
        self.samples
    }

    /// Length of the backing array
    pub fn backing_len(&self) -> usize {
        self.samples.len()
    }

    /// Sample at `index` relative to the window start
    ///
    /// Fails only when the translated index falls outside the backing array.
    pub fn get(&self, index: usize) -> Option<&'a Sample> {
        self.samples.get(self.start.checked_add(index)?)
    }

    /// Covered samples as a slice
    pub fn as_slice(&self) -> &'a [Sample] {
        &self.samples[self.start..self.end()]
    }

    /// Iterate over covered samples
    pub fn iter(&self) -> std::slice::Iter<'a, Sample> {
        self.as_slice().iter()
    }

    /// Everything from `offset` to the end of this window
    pub fn tail(&self, offset: usize) -> Self {
        let offset = offset.min(self.len);
        Self {
            samples: self.samples,
            start: self.start + offset,
            len: self.len - offset,
        }
    }

    /// `length` samples from `offset`, clipped to the end of this window
    pub fn slice(&self, offset: usize, length: usize) -> Self {
        let tail = self.tail(offset);
        Self {
            len: length.min(tail.len),
            ..tail
        }
    }

    /// Same length, start moved by `delta`; `None` if that leaves the array
    pub fn shifted_by(&self, delta: isize) -> Option<Self> {
        let start = self.start.checked_add_signed(delta)?;
        Self::new(self.samples, start, self.len)
    }

    /// Grow backward by `amount` samples
    pub fn expanded_start(&self, amount: usize) -> Option<Self> {
        let start = self.start.checked_sub(amount)?;
        Self::new(self.samples, start, self.len + amount)
    }

    /// Grow forward by `amount` samples
    pub fn expanded_end(&self, amount: usize) -> Option<Self> {
        Self::new(self.samples, self.start, self.len.checked_add(amount)?)
    }
}

impl PartialEq for Window<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.samples, other.samples)
            && self.start == other.start
            && self.len == other.len
    }
}

impl fmt::Debug for Window<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("start", &self.start)
            .field("len", &self.len)
            .field("backing_len", &self.samples.len())
            .finish()
    }
}

impl fmt::Display for Window<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:6}-{:6} [{:6}]", self.start, self.end(), self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::novelty::compute_novelty;

    fn samples(n: usize) -> Vec<Sample> {
        let raw: Vec<u16> = (0..n as u16).collect();
        compute_novelty(&raw, 0)
    }

    #[test]
    fn test_indexing_is_translated() {
        let data = samples(10);
        let window = Window::new(&data, 3, 4).unwrap();
        assert_eq!(window.get(0).unwrap().index, 3);
        assert_eq!(window.end(), 7);
        // Past the window but inside the array is still readable
        assert_eq!(window.get(5).unwrap().index, 8);
        assert!(window.get(7).is_none());
    }

    #[test]
    fn test_new_out_of_bounds() {
        let data = samples(10);
        assert!(Window::new(&data, 8, 3).is_none());
        assert!(Window::new(&data, 8, 2).is_some());
    }

    #[test]
    fn test_slice_clips() {
        let data = samples(10);
        let window = Window::new(&data, 2, 6).unwrap();
        let sub = window.slice(4, 10);
        assert_eq!((sub.start(), sub.len()), (6, 2));
        let tail = window.tail(100);
        assert!(tail.is_empty());
        assert_eq!(tail.start(), 8);
    }

    #[test]
    fn test_shifted_by() {
        let data = samples(10);
        let window = Window::new(&data, 2, 6).unwrap();
        assert_eq!(window.shifted_by(-2).unwrap().start(), 0);
        assert!(window.shifted_by(-3).is_none());
        assert_eq!(window.shifted_by(2).unwrap().end(), 10);
        assert!(window.shifted_by(3).is_none());
    }

    #[test]
    fn test_expansion() {
        let data = samples(10);
        let window = Window::new(&data, 2, 3).unwrap();
        let grown = window.expanded_start(2).unwrap();
        assert_eq!((grown.start(), grown.len()), (0, 5));
        assert!(window.expanded_start(3).is_none());
        assert_eq!(window.expanded_end(5).unwrap().end(), 10);
        assert!(window.expanded_end(6).is_none());
    }

    #[test]
    fn test_equality_is_by_view() {
        let data = samples(10);
        let other = samples(10);
        let a = Window::new(&data, 1, 2).unwrap();
        assert_eq!(a, Window::new(&data, 1, 2).unwrap());
        assert_ne!(a, Window::new(&other, 1, 2).unwrap());
        assert_ne!(a, Window::new(&data, 1, 3).unwrap());
    }
}
