use crate::hash::KeyHash;
use crate::map::{IntCounterMap, DEFAULT_LOAD_FACTOR};
use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt::{self, Formatter};
use std::marker::PhantomData;

/// Upper bound on how many entries a size hint from the input may pre-allocate.
const MAX_PREALLOCATED: usize = 1 << 16;

struct IntCounterMapVisitor<H> {
    hasher_marker: PhantomData<H>,
}

impl<H> Serialize for IntCounterMap<H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<'de, H> Deserialize<'de> for IntCounterMap<H>
where
    H: KeyHash + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(IntCounterMapVisitor::new())
    }
}

impl<H> IntCounterMapVisitor<H> {
    pub(crate) fn new() -> Self {
        Self {
            hasher_marker: PhantomData,
        }
    }
}

impl<'de, H> Visitor<'de> for IntCounterMapVisitor<H>
where
    H: KeyHash + Default,
{
    type Value = IntCounterMap<H>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a map of u32 keys to i32 counters")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = match access.size_hint() {
            Some(n) => IntCounterMap::with_expected_size(
                n.min(MAX_PREALLOCATED),
                DEFAULT_LOAD_FACTOR,
                H::default(),
            )
            .map_err(de::Error::custom)?,
            None => IntCounterMap::default(),
        };

        while let Some((key, value)) = access.next_entry::<u32, i32>()? {
            if map
                .try_put(key, value)
                .map_err(de::Error::custom)?
                .is_some()
            {
                return Err(de::Error::custom(format_args!(
                    "duplicate key {} in serialized counter map",
                    key
                )));
            }
        }

        Ok(map)
    }
}
