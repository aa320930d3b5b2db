//! Encapsulated pixel data: fragments and the sequences that hold them.

use std::ops::{Deref, Index};
use std::sync::Arc;

/// One opaque chunk of compressed bytes. Immutable once created; clones share storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    data: Arc<[u8]>,
}

impl Fragment {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Deref for Fragment {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for Fragment {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for Fragment {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}

/// Ordered fragments making up one encapsulated pixel data value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FragmentSequence {
    fragments: Vec<Fragment>,
}

impl FragmentSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fragments: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, fragment: impl Into<Fragment>) {
        self.fragments.push(fragment.into());
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Fragment> {
        self.fragments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    /// Sum of all fragment lengths.
    pub fn byte_length(&self) -> usize {
        self.fragments.iter().map(Fragment::len).sum()
    }

    /// Concatenates every fragment, in order, into one buffer.
    pub fn to_buffer(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.byte_length());
        for fragment in &self.fragments {
            buffer.extend_from_slice(fragment);
        }
        buffer
    }
}

impl Index<usize> for FragmentSequence {
    type Output = Fragment;

    fn index(&self, index: usize) -> &Fragment {
        &self.fragments[index]
    }
}

impl FromIterator<Fragment> for FragmentSequence {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        Self {
            fragments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FragmentSequence {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

impl IntoIterator for FragmentSequence {
    type Item = Fragment;
    type IntoIter = std::vec::IntoIter<Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.into_iter()
    }
}

/// A pixel data element value, either native samples or encapsulated fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelData {
    Native(Vec<u8>),
    Encapsulated(FragmentSequence),
}

impl PixelData {
    pub fn as_native(&self) -> Option<&[u8]> {
        match self {
            Self::Native(data) => Some(data),
            Self::Encapsulated(_) => None,
        }
    }

    pub fn as_fragments(&self) -> Option<&FragmentSequence> {
        match self {
            Self::Encapsulated(fragments) => Some(fragments),
            Self::Native(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattening_preserves_order() {
        let mut seq = FragmentSequence::new();
        seq.push(vec![1u8, 2]);
        seq.push(Vec::<u8>::new());
        seq.push(&[3u8, 4, 5][..]);

        assert_eq!(seq.len(), 3);
        assert_eq!(seq.byte_length(), 5);
        assert_eq!(seq.to_buffer(), vec![1, 2, 3, 4, 5]);
        assert!(seq[1].is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let fragment = Fragment::from(vec![9u8; 16]);
        let copy = fragment.clone();
        assert!(std::ptr::eq(fragment.as_bytes(), copy.as_bytes()));
    }

    #[test]
    fn pixel_data_accessors() {
        let native = PixelData::Native(vec![1, 2]);
        assert_eq!(native.as_native(), Some(&[1u8, 2][..]));
        assert!(native.as_fragments().is_none());

        let encapsulated = PixelData::Encapsulated(FragmentSequence::new());
        assert!(encapsulated.as_native().is_none());
    }
}
