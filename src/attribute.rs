//! Attribute kinds and the value types recorded for each of them.

use nalgebra::{Point2, Point3, Point4, Vector3};

pub type Position = Point3<f32>;
pub type Normal = Vector3<f32>;
pub type Tangent = Vector3<f32>;
pub type Binormal = Vector3<f32>;
pub type Rgba = Point4<f32>;
pub type Texcoord = Point2<f32>;

/// The per-corner properties tracked by an [AttributeStore](crate::AttributeStore).
///
/// Every kind owns its own stream and its own index array; kinds are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKind {
    Position,
    Normal,
    Tangent,
    Binormal,
    Color,
    Texcoord,
}

impl AttributeKind {
    /// Every kind, in canonical order.
    pub const ALL: [AttributeKind; 6] = [
        AttributeKind::Position,
        AttributeKind::Normal,
        AttributeKind::Tangent,
        AttributeKind::Binormal,
        AttributeKind::Color,
        AttributeKind::Texcoord,
    ];

    /// The shape of a single value of this kind.
    pub const fn attr_type(self) -> AttributeType {
        match self {
            AttributeKind::Position
            | AttributeKind::Normal
            | AttributeKind::Tangent
            | AttributeKind::Binormal => AttributeType::Vec3,
            AttributeKind::Color => AttributeType::Vec4,
            AttributeKind::Texcoord => AttributeType::Vec2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AttributeKind::Position => "position",
            AttributeKind::Normal => "normal",
            AttributeKind::Tangent => "tangent",
            AttributeKind::Binormal => "binormal",
            AttributeKind::Color => "color",
            AttributeKind::Texcoord => "texcoord",
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The shape of a value stored for an [AttributeKind]. Components are always `f32`.
///
/// Names taken from the [glTF specification](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html#accessor-data-types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Vec2,
    Vec3,
    Vec4,
}

impl AttributeType {
    pub const fn size_elements(self) -> usize {
        match self {
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 => 4,
        }
    }

    pub const fn size_bytes(self) -> usize {
        std::mem::size_of::<f32>() * self.size_elements()
    }
}

mod _layout {
    use super::*;

    macro_rules! assert_layout {
        ($t:ident => $($Target:ty),+) => {
            $(
                static_assertions::const_assert_eq!(std::mem::size_of::<$Target>(), AttributeType::$t.size_bytes());
                static_assertions::const_assert_eq!(std::mem::align_of::<$Target>(), std::mem::align_of::<f32>());
            )+
        };
    }

    assert_layout!(Vec2 => Texcoord);
    assert_layout!(Vec3 => Position, Normal, Tangent, Binormal);
    assert_layout!(Vec4 => Rgba);
}

/// A single value of any [AttributeKind].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue {
    Position(Position),
    Normal(Normal),
    Tangent(Tangent),
    Binormal(Binormal),
    Color(Rgba),
    Texcoord(Texcoord),
}

impl AttributeValue {
    #[inline]
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Position(_) => AttributeKind::Position,
            AttributeValue::Normal(_) => AttributeKind::Normal,
            AttributeValue::Tangent(_) => AttributeKind::Tangent,
            AttributeValue::Binormal(_) => AttributeKind::Binormal,
            AttributeValue::Color(_) => AttributeKind::Color,
            AttributeValue::Texcoord(_) => AttributeKind::Texcoord,
        }
    }

    /// The value's components, in order.
    pub fn components(&self) -> &[f32] {
        match self {
            AttributeValue::Position(p) => p.coords.as_slice(),
            AttributeValue::Normal(v) | AttributeValue::Tangent(v) | AttributeValue::Binormal(v) => {
                v.as_slice()
            }
            AttributeValue::Color(c) => c.coords.as_slice(),
            AttributeValue::Texcoord(t) => t.coords.as_slice(),
        }
    }
}
