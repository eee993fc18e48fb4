use meshweld_common::ArrayIndex;
use num_traits::AsPrimitive;

/// Raw marker for a corner without the attribute, as written by serializers.
pub const SENTINEL: i64 = -1;

/// The stream positions used by the three corners of one triangle, for one attribute kind.
///
/// `None` marks a corner for which the attribute was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Corners<Idx: ArrayIndex = u32>(pub [Option<Idx>; 3]);

impl<Idx: ArrayIndex> Default for Corners<Idx> {
    fn default() -> Self {
        Self::ABSENT
    }
}

impl<Idx: ArrayIndex> From<[Option<Idx>; 3]> for Corners<Idx> {
    fn from(value: [Option<Idx>; 3]) -> Self {
        Self(value)
    }
}

impl<Idx: ArrayIndex> From<[Idx; 3]> for Corners<Idx> {
    fn from(value: [Idx; 3]) -> Self {
        Self(value.map(Some))
    }
}

impl<Idx: ArrayIndex> std::ops::Index<usize> for Corners<Idx> {
    type Output = Option<Idx>;

    #[inline]
    fn index(&self, corner: usize) -> &Self::Output {
        &self.0[corner]
    }
}

impl<Idx: ArrayIndex> std::ops::IndexMut<usize> for Corners<Idx> {
    #[inline]
    fn index_mut(&mut self, corner: usize) -> &mut Self::Output {
        &mut self.0[corner]
    }
}

impl<Idx: ArrayIndex> Corners<Idx> {
    pub const ABSENT: Self = Self([None; 3]);

    #[inline]
    pub fn new(a: Option<Idx>, b: Option<Idx>, c: Option<Idx>) -> Self {
        Self([a, b, c])
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Present indices, in corner order.
    #[inline]
    pub fn present(&self) -> impl Iterator<Item = Idx> + '_ {
        self.0.iter().flatten().copied()
    }

    /// Convert to the signed representation, with absent corners as [SENTINEL].
    pub fn to_raw(&self) -> [i64; 3] {
        self.0.map(|c| c.map_or(SENTINEL, |i| AsPrimitive::<usize>::as_(i) as i64))
    }

    /// Read the signed representation; every negative value is treated as absent.
    ///
    /// Returns `None` if a non-negative value does not fit in `Idx`.
    pub fn from_raw(raw: [i64; 3]) -> Option<Self> {
        let mut out = Self::ABSENT;
        for (slot, value) in out.0.iter_mut().zip(raw) {
            if value >= 0 {
                *slot = Some(num_traits::cast::<i64, Idx>(value)?);
            }
        }
        Some(out)
    }
}
