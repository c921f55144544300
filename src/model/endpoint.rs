//! Snapshot payload served by `currentState`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::key::PortKey;

/// String pairs kept in the order the server sent them.
///
/// Properties are listed in the side panel and style pairs are applied to
/// the node in document order, so a hash map would not do here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderedMap(Vec<(String, String)>);

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the value of an existing key in place, or appends.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

struct OrderedMapVisitor;

impl<'de> Visitor<'de> for OrderedMapVisitor {
    type Value = OrderedMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of display values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            // Non-string values are shown in their JSON form.
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for OrderedMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,
    #[serde(default)]
    pub is_multiple: bool,
    /// Ports this one may be linked to.
    #[serde(default)]
    pub potential_connections: Vec<PortKey>,
}

impl Port {
    pub fn key(&self, endpoint_id: &str) -> PortKey {
        PortKey::new(endpoint_id, &self.id)
    }
}

/// A component shown as one node of the diagram.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Endpoint {
    pub id: String,
    #[serde(default)]
    pub properties: OrderedMap,
    #[serde(default)]
    pub style: OrderedMap,
    #[serde(default)]
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    /// Links in `source-target` form; see [`super::ConnectionPair`].
    #[serde(default)]
    pub active_connections: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r##"{
        "endpoints": [
            {
                "id": "org.flexiblepower.Battery.1",
                "properties": { "zeta": "last", "alpha": "first", "capacity": 12 },
                "style": { "background-color": "#eef" },
                "ports": [
                    { "id": "control", "isMultiple": false, "potentialConnections": ["org.flexiblepower.Manager.1:devices"] }
                ]
            },
            {
                "id": "org.flexiblepower.Manager.1",
                "ports": [ { "id": "devices", "isMultiple": true } ]
            }
        ],
        "activeConnections": ["org.flexiblepower.Battery.1:control-org.flexiblepower.Manager.1:devices"]
    }"##;

    #[test]
    fn test_snapshot_deserialization() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
        assert_eq!(snapshot.endpoints.len(), 2);
        assert_eq!(snapshot.active_connections.len(), 1);

        let battery = &snapshot.endpoints[0];
        assert_eq!(battery.style.get("background-color"), Some("#eef"));
        assert!(!battery.ports[0].is_multiple);
        assert_eq!(
            battery.ports[0].potential_connections,
            vec![PortKey::from("org.flexiblepower.Manager.1:devices")]
        );

        let manager = &snapshot.endpoints[1];
        assert!(manager.properties.is_empty());
        assert!(manager.ports[0].is_multiple);
        assert!(manager.ports[0].potential_connections.is_empty());
    }

    #[test]
    fn test_properties_keep_document_order() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let values: Vec<_> = snapshot.endpoints[0].properties.values().collect();
        assert_eq!(values, vec!["last", "first", "12"]);
    }

    #[test]
    fn test_port_key() {
        let port = Port {
            id: "p1".to_string(),
            is_multiple: false,
            potential_connections: Vec::new(),
        };
        assert_eq!(port.key("a.b.C.1").as_str(), "a.b.C.1:p1");
    }

    #[test]
    fn test_ordered_map_insert_replaces() {
        let mut map: OrderedMap = [("a", "1"), ("b", "2")].into_iter().collect();
        map.insert("a", "3");
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
    }
}
