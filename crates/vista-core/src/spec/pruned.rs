use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::BTreeMap;

/// A spec tree restricted to the fields a client asked for.
///
/// `Leaf` is opaque and places no restriction: a scalar renders as-is and a
/// relation renders the related entity's own columns. It is also what an
/// empty field selection projects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrunedSpec {
    Leaf,
    Fields(BTreeMap<String, PrunedSpec>),
}

impl PrunedSpec {
    pub fn is_leaf(&self) -> bool {
        matches!(self, PrunedSpec::Leaf)
    }

    /// Sub-spec for `name`, if this spec selects it.
    pub fn get(&self, name: &str) -> Option<&PrunedSpec> {
        match self {
            PrunedSpec::Leaf => None,
            PrunedSpec::Fields(fields) => fields.get(name),
        }
    }

    /// Selected field names, sorted. Empty for `Leaf`.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            PrunedSpec::Leaf => Vec::new(),
            PrunedSpec::Fields(fields) => fields.keys().map(String::as_str).collect(),
        }
    }
}

/// Renders in the serializer-config shape: `{}` for a leaf, otherwise
/// `{"fields": [[name, spec], ...]}`.
impl Serialize for PrunedSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PrunedSpec::Leaf => serde_json::Map::new().serialize(serializer),
            PrunedSpec::Fields(fields) => {
                struct Pairs<'a>(&'a BTreeMap<String, PrunedSpec>);

                impl Serialize for Pairs<'_> {
                    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
                        for pair in self.0.iter() {
                            seq.serialize_element(&pair)?;
                        }
                        seq.end()
                    }
                }

                let mut map = BTreeMap::new();
                map.insert("fields", Pairs(fields));
                map.serialize(serializer)
            }
        }
    }
}
