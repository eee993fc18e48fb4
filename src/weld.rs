//! Single-pass hash welding of attribute streams, and remapping of the indices that refer to them.
//!
//! Based on the linked-chain welder described by Ville Miettinen and Pierre Terdiman: every input is
//! examined once, duplicates are found through a power-of-two bucket table whose chains are
//! threaded through a parallel `next` array, and distinct values are compacted towards the front
//! of the stream in order of first occurrence.

use meshweld_common::ArrayIndex;
use num_traits::AsPrimitive;

use crate::{hash::WeldKey, store::Corners};

/// Chain terminator.
const NIL: usize = usize::MAX;

/// Maps every pre-weld stream position to the position of its representative after the weld.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XRefs {
    map: Vec<usize>,
    welded_len: usize,
}

impl XRefs {
    /// Number of values in the stream before the weld.
    #[inline]
    pub fn source_len(&self) -> usize {
        self.map.len()
    }

    /// Number of distinct values left in the stream after the weld.
    #[inline]
    pub fn welded_len(&self) -> usize {
        self.welded_len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The welded position of the value originally at `source`.
    #[inline]
    pub fn get(&self, source: usize) -> Option<usize> {
        self.map.get(source).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.map
    }

    /// Whether the weld moved nothing; i.e. the stream was already free of duplicates.
    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(i, &x)| i == x)
    }

    /// Rewrite every present index in `indices` to its welded position. Absent corners stay absent.
    ///
    /// # Panics
    ///
    /// * if a present index is not a position of the pre-weld stream
    pub fn remap<Idx: ArrayIndex>(&self, indices: &mut [Corners<Idx>])
    where
        usize: AsPrimitive<Idx>,
    {
        remap_indices(&self.map, indices)
    }

    /// Carry a per-value companion array into welded order, keeping the companion of each value's
    /// first occurrence.
    ///
    /// # Panics
    ///
    /// * if `companion.len() != self.source_len()`
    pub fn compact<U>(&self, companion: Vec<U>) -> Vec<U> {
        assert_eq!(
            companion.len(),
            self.map.len(),
            "companion array length does not match the welded stream"
        );
        let mut out = Vec::with_capacity(self.welded_len);
        for (value, &target) in companion.into_iter().zip(&self.map) {
            // first occurrences arrive in increasing target order
            if target == out.len() {
                out.push(value);
            }
        }
        out
    }
}

impl std::ops::Index<usize> for XRefs {
    type Output = usize;

    #[inline]
    fn index(&self, source: usize) -> &Self::Output {
        &self.map[source]
    }
}

/// Rewrite every present index in `indices` through `xrefs`.
///
/// # Panics
///
/// * if a present index is out of bounds of `xrefs`
pub fn remap_indices<Idx: ArrayIndex>(xrefs: &[usize], indices: &mut [Corners<Idx>])
where
    usize: AsPrimitive<Idx>,
{
    for corners in indices {
        for slot in corners.0.iter_mut().flatten() {
            let source: usize = slot.as_();
            assert!(
                source < xrefs.len(),
                "index {source} out of bounds of a weld over {} values",
                xrefs.len()
            );
            *slot = xrefs[source].as_();
        }
    }
}

/// Weld `stream` in place using its [WeldKey] contract.
#[inline]
pub fn weld<T: WeldKey>(stream: &mut Vec<T>) -> XRefs {
    weld_by(stream, T::weld_hash, T::weld_eq)
}

/// Weld `stream` in place: afterwards, it holds exactly one representative of each distinct value, in
/// order of first occurrence.
///
/// `hash` must agree with `eq` for welding to find every duplicate; an inconsistent hash only
/// causes missed merges.
pub fn weld_by<T, H, E>(stream: &mut Vec<T>, mut hash: H, mut eq: E) -> XRefs
where
    H: FnMut(&T) -> u32,
    E: FnMut(&T, &T) -> bool,
{
    let n = stream.len();
    if n == 0 {
        return XRefs {
            map: Vec::new(),
            welded_len: 0,
        };
    }

    let mask = n.next_power_of_two() - 1;
    let mut heads = vec![NIL; mask + 1];
    let mut next = vec![NIL; n];
    let mut map = Vec::with_capacity(n);
    let mut out = 0;

    for i in 0..n {
        let bucket = hash(&stream[i]) as usize & mask;

        let mut offset = heads[bucket];
        while offset != NIL && !eq(&stream[offset], &stream[i]) {
            offset = next[offset];
        }

        if offset == NIL {
            // new distinct value; everything in out..i is a duplicate already accounted for, so
            // the swap never disturbs a chained entry
            stream.swap(out, i);
            next[out] = heads[bucket];
            heads[bucket] = out;
            map.push(out);
            out += 1;
        } else {
            map.push(offset);
        }
    }

    stream.truncate(out);
    XRefs {
        map,
        welded_len: out,
    }
}
