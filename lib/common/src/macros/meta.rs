/// Duplicate an [item](https://doc.rust-lang.org/nightly/reference/items.html) `$imp` for each type
/// `$Ty`, making it available within `$imp` under the alias `$Alias`.
///
/// Used where two concrete types share an implementation but no trait bound can express it
/// (ex. `Point3<f32>` and `Vector3<f32>` hash identically).
#[macro_export]
macro_rules! item_with {
    {$Alias:ident: $($Ty:ty),+ => $imp:item} => {
        $(
            const _: () = { // anonymous module
                type $Alias = $Ty;
                $imp
            };
        )+
    };
}
