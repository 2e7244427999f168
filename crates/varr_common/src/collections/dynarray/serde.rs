//! Serde support for [`DynArray`].
//!
//! The array serializes as a plain sequence of its live elements; spare capacity is never
//! written. Deserialization rebuilds the array element by element, so the restored length always
//! equals the number of decoded elements.

use core::{fmt, marker::PhantomData};

use serde::{
    de::{Deserialize, Deserializer, SeqAccess, Visitor},
    ser::{Serialize, Serializer},
};

use crate::collections::GrowthStrategy;

use super::DynArray;

impl<T: Serialize, G: GrowthStrategy> Serialize for DynArray<T, G> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Deserialize<'de>, G: GrowthStrategy> Deserialize<'de> for DynArray<T, G> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeqVisitor<T, G>(PhantomData<(T, G)>);

        impl<'de, T: Deserialize<'de>, G: GrowthStrategy> Visitor<'de> for SeqVisitor<T, G> {
            type Value = DynArray<T, G>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a sequence")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                // The size hint is advisory only; cap the upfront allocation.
                let capacity = seq.size_hint().unwrap_or(0).min(4096);
                let mut arr = DynArray::with_capacity_and_growth(capacity);
                while let Some(value) = seq.next_element()? {
                    arr.push(value);
                }
                Ok(arr)
            }
        }

        deserializer.deserialize_seq(SeqVisitor(PhantomData))
    }
}
