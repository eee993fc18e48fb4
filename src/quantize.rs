//! Precision reduction applied to attribute components before they enter a store.
//!
//! Quantization is the single point controlling weld sensitivity: two values weld iff their
//! quantized components are bit-identical. It must be applied exactly once per value, since
//! `floor(x * P) / P` is not guaranteed to be a fixed point under floating-point rounding.

use nalgebra::{Point, SVector};

use crate::{
    attribute::{AttributeKind, AttributeValue},
    error::StoreError,
};

/// A precision factor `P`; components are reduced to `floor(value * P) / P`.
///
/// ex. `10` keeps tenths, `1000` keeps thousandths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precision(f32);

impl Precision {
    /// Four decimal digits.
    pub const DEFAULT: Precision = Precision(10_000.0);

    /// # Errors
    ///
    /// * if `factor` is not finite, or is not strictly positive
    pub fn new(factor: f32) -> Result<Self, StoreError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(StoreError::InvalidPrecision(factor))
        }
    }

    #[inline]
    pub fn factor(self) -> f32 {
        self.0
    }

    /// Reduce a single component.
    #[inline]
    pub fn cut(self, value: f32) -> f32 {
        let factor = f64::from(self.0);
        let cut = ((f64::from(value) * factor).floor() / factor) as f32;
        // -0.0 + 0.0 == +0.0; keeps bitwise equality in line with numeric equality at zero
        cut + 0.0
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One [Precision] per [AttributeKind].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precisions {
    pub position: Precision,
    pub normal: Precision,
    pub tangent: Precision,
    pub binormal: Precision,
    pub color: Precision,
    pub texcoord: Precision,
}

impl Default for Precisions {
    fn default() -> Self {
        Self::uniform(Precision::DEFAULT)
    }
}

impl Precisions {
    pub const fn uniform(precision: Precision) -> Self {
        Self {
            position: precision,
            normal: precision,
            tangent: precision,
            binormal: precision,
            color: precision,
            texcoord: precision,
        }
    }

    #[must_use]
    pub fn with(mut self, kind: AttributeKind, precision: Precision) -> Self {
        self[kind] = precision;
        self
    }
}

impl std::ops::Index<AttributeKind> for Precisions {
    type Output = Precision;

    fn index(&self, kind: AttributeKind) -> &Self::Output {
        match kind {
            AttributeKind::Position => &self.position,
            AttributeKind::Normal => &self.normal,
            AttributeKind::Tangent => &self.tangent,
            AttributeKind::Binormal => &self.binormal,
            AttributeKind::Color => &self.color,
            AttributeKind::Texcoord => &self.texcoord,
        }
    }
}

impl std::ops::IndexMut<AttributeKind> for Precisions {
    fn index_mut(&mut self, kind: AttributeKind) -> &mut Self::Output {
        match kind {
            AttributeKind::Position => &mut self.position,
            AttributeKind::Normal => &mut self.normal,
            AttributeKind::Tangent => &mut self.tangent,
            AttributeKind::Binormal => &mut self.binormal,
            AttributeKind::Color => &mut self.color,
            AttributeKind::Texcoord => &mut self.texcoord,
        }
    }
}

/// Types whose components can be reduced by a [Precision].
pub trait Quantize {
    #[must_use]
    fn quantize(&self, precision: Precision) -> Self;
}

impl Quantize for f32 {
    #[inline]
    fn quantize(&self, precision: Precision) -> Self {
        precision.cut(*self)
    }
}

impl<const D: usize> Quantize for Point<f32, D> {
    #[inline]
    fn quantize(&self, precision: Precision) -> Self {
        self.map(|c| precision.cut(c))
    }
}

impl<const D: usize> Quantize for SVector<f32, D> {
    #[inline]
    fn quantize(&self, precision: Precision) -> Self {
        self.map(|c| precision.cut(c))
    }
}

impl AttributeValue {
    /// Quantize this value with the precision configured for its kind.
    #[must_use]
    pub fn quantize(&self, precisions: &Precisions) -> Self {
        let p = precisions[self.kind()];
        match self {
            AttributeValue::Position(v) => AttributeValue::Position(v.quantize(p)),
            AttributeValue::Normal(v) => AttributeValue::Normal(v.quantize(p)),
            AttributeValue::Tangent(v) => AttributeValue::Tangent(v.quantize(p)),
            AttributeValue::Binormal(v) => AttributeValue::Binormal(v.quantize(p)),
            AttributeValue::Color(v) => AttributeValue::Color(v.quantize(p)),
            AttributeValue::Texcoord(v) => AttributeValue::Texcoord(v.quantize(p)),
        }
    }
}
