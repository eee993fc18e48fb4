//! Hash and equality contract used by the weld engine.
//!
//! Geometric data clusters tightly, so generic hashers spend most of their entropy on bits
//! that never change. These functions mix the raw IEEE-754 words instead.

use nalgebra::{Point2, Point3, Point4, Vector3};

/// A value which can be deduplicated by [weld](crate::weld::weld).
///
/// Implementations must keep `a.weld_eq(b) ⇒ a.weld_hash() == b.weld_hash()`. Breaking that only
/// costs merges, never correctness: equality is always checked before two entries are merged.
pub trait WeldKey {
    fn weld_hash(&self) -> u32;
    fn weld_eq(&self, other: &Self) -> bool;
}

/// Fold a weighted sum of words down onto its low bits.
#[inline]
fn fold(f: u32) -> u32 {
    // clear the sign bit so that the sign of a word can't flip every hash
    let f = f & 0x7fff_ffff;
    (f >> 22) ^ (f >> 12) ^ f
}

/// Hash the bit patterns of a 3-component value.
#[inline]
pub fn hash_vec3_bits([x, y, z]: [u32; 3]) -> u32 {
    fold(
        x.wrapping_add(y.wrapping_mul(11))
            .wrapping_sub(z.wrapping_mul(17)),
    )
}

/// Hash the bit patterns of a 2-component value.
#[inline]
pub fn hash_vec2_bits([u, v]: [u32; 2]) -> u32 {
    fold(u.wrapping_add(v.wrapping_mul(11)))
}

/// Bucket a color channel into 256 coarse steps.
#[inline]
fn channel_bucket(c: f32) -> u8 {
    // NaN saturates to 0 in an `as` cast
    (c * 0.5 * 255.0).clamp(0.0, 255.0) as u8
}

/// Hash a color by its coarse channel buckets.
///
/// Colors seldom vary much, so bucketing trades exactness for a cheap hash with good enough spread.
#[inline]
pub fn hash_rgba(rgba: [f32; 4]) -> u32 {
    rgba.into_iter().fold(5381u32, |h, c| {
        (h << 5).wrapping_add(h) ^ u32::from(channel_bucket(c))
    })
}

#[inline]
fn bits<const D: usize>(components: &[f32; D]) -> [u32; D] {
    components.map(f32::to_bits)
}

#[inline]
fn bits_eq<const D: usize>(a: &[f32; D], b: &[f32; D]) -> bool {
    bits(a) == bits(b)
}

meshweld_common::item_with! {V3: Point3<f32>, Vector3<f32> =>
    impl WeldKey for V3 {
        #[inline]
        fn weld_hash(&self) -> u32 {
            hash_vec3_bits(bits(&[self.x, self.y, self.z]))
        }

        #[inline]
        fn weld_eq(&self, other: &Self) -> bool {
            bits_eq(&[self.x, self.y, self.z], &[other.x, other.y, other.z])
        }
    }
}

impl WeldKey for Point2<f32> {
    #[inline]
    fn weld_hash(&self) -> u32 {
        hash_vec2_bits(bits(&[self.x, self.y]))
    }

    #[inline]
    fn weld_eq(&self, other: &Self) -> bool {
        bits_eq(&[self.x, self.y], &[other.x, other.y])
    }
}

impl WeldKey for Point4<f32> {
    #[inline]
    fn weld_hash(&self) -> u32 {
        hash_rgba([self.x, self.y, self.z, self.w])
    }

    #[inline]
    fn weld_eq(&self, other: &Self) -> bool {
        bits_eq(
            &[self.x, self.y, self.z, self.w],
            &[other.x, other.y, other.z, other.w],
        )
    }
}
