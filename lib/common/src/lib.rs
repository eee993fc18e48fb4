use num_traits::{AsPrimitive, PrimInt};

pub mod macros;

/// Trait for types which can act as indices within an array (or an array-like structure).
///
/// Implemented for every primitive integer. Signed types are accepted, but the indices stored in
/// them are never negative.
pub trait ArrayIndex: PrimInt + AsPrimitive<usize> + std::fmt::Debug + 'static {}
impl<P> ArrayIndex for P where P: PrimInt + AsPrimitive<usize> + std::fmt::Debug + 'static {}
