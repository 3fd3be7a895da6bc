//! `0x`-prefixed hexadecimal integers, the wire format for numeric values.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

macro_rules! hex_quantity {
    ($name:ident, $inner:ty, $doc:literal) => {
        #[doc = $doc]
        ///
        /// Serializes as a minimal lowercase `0x`-prefixed hex string, e.g.
        /// `0x3b9aca00`; deserialization rejects anything else.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub $inner);

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&format!("{:#x}", self.0))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                let digits = value.strip_prefix("0x").ok_or_else(|| {
                    de::Error::custom(format!(
                        "expected a 0x-prefixed hex quantity, got '{value}'"
                    ))
                })?;

                <$inner>::from_str_radix(digits, 16)
                    .map(Self)
                    .map_err(|error| {
                        de::Error::custom(format!("invalid hex quantity '{value}': {error}"))
                    })
            }
        }
    };
}

hex_quantity!(U64, u64, "A 64-bit quantity, used for block numbers and gas limits.");
hex_quantity!(U128, u128, "A 128-bit quantity, used for wei amounts such as balances and gas prices.");
