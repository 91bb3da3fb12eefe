/// Defines a range-checked newtype wrapper around an unsigned scalar and
/// generates:
/// - derives (Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)
/// - `Display`
/// - `new(i64) -> Result<Self, FeatureError>` rejecting values outside `[$min, $max]`
/// - `TryFrom<i64> for $name` (used by serde) and `From<$name> for $inner`
///
/// Out-of-range values are rejected, never clamped.
///
/// Usage:
///   define_bounded_type!(u32, EntryHour, "entry_hour", 0, 23);
#[macro_export]
macro_rules! define_bounded_type {
    ($inner:ty, $name:ident, $field:literal, $min:literal, $max:literal) => {
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name($inner);

        impl $name {
            /// Smallest accepted value (inclusive).
            pub const MIN: $inner = $min;
            /// Largest accepted value (inclusive).
            pub const MAX: $inner = $max;
            /// Field name reported in validation errors.
            pub const FIELD: &'static str = $field;

            pub fn new(value: i64) -> ::std::result::Result<Self, $crate::features::FeatureError> {
                if value < Self::MIN as i64 || value > Self::MAX as i64 {
                    return Err($crate::features::FeatureError::InvalidInput {
                        field: Self::FIELD,
                        value,
                        min: Self::MIN as i64,
                        max: Self::MAX as i64,
                    });
                }
                Ok($name(value as $inner))
            }

            pub fn value(&self) -> $inner {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::std::convert::TryFrom<i64> for $name {
            type Error = $crate::features::FeatureError;

            fn try_from(value: i64) -> ::std::result::Result<Self, Self::Error> {
                $name::new(value)
            }
        }

        impl ::std::convert::From<$name> for $inner {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl ::std::convert::From<$name> for i64 {
            fn from(v: $name) -> Self {
                v.0 as i64
            }
        }
    };
}
