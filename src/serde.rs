//! Flat serde representation: an encoded StrandMap is a plain map whose
//! fields are the keys — the internal sharding is invisible on the wire.

use crate::StrandMap;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

impl<V> Serialize for StrandMap<V>
where
    V: Serialize + Clone + Send + Sync + 'static,
{
    /// Encodes the flat [`items`](StrandMap::items) view.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.items())
    }
}

struct StrandMapVisitor<V> {
    marker: PhantomData<V>,
}

impl<'de, V> Visitor<'de> for StrandMapVisitor<V>
where
    V: Deserialize<'de>,
{
    type Value = StrandMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map with string keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let map = StrandMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V> Deserialize<'de> for StrandMap<V>
where
    V: Deserialize<'de>,
{
    /// Decodes a flat map by streaming each pair through
    /// [`insert`](StrandMap::insert) into a map built with the default
    /// configuration. Malformed input surfaces as the deserializer's
    /// own error; if the outer structure fails to parse, no map is
    /// produced at all. To load into a custom configuration,
    /// deserialize a `HashMap<String, V>` and
    /// [`extend`](StrandMap::extend) it in.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(StrandMapVisitor {
            marker: PhantomData,
        })
    }
}
