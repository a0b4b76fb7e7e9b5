use indexmap::IndexMap;

/// Definitions accumulated by an adapter during one conversion run.
///
/// Names are unique within a collector; a clashing name gets a numeric
/// suffix. Owned by its adapter and cleared by the adapter's `reset`.
#[derive(Debug, Clone, Default)]
pub struct StyleCollector {
    /// Source keyed by definition name, in registration order.
    definitions: IndexMap<String, String>,
    /// Name assigned to each node id.
    by_node: IndexMap<String, String>,
}

impl StyleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name already assigned to a node.
    pub fn name_for(&self, node_id: &str) -> Option<&str> {
        self.by_node.get(node_id).map(String::as_str)
    }

    /// Reserve a unique name for `node_id`, reusing an earlier assignment.
    pub fn reserve(&mut self, node_id: &str, wanted: &str) -> String {
        if let Some(name) = self.by_node.get(node_id) {
            return name.clone();
        }
        let mut name = wanted.to_string();
        let mut n = 2;
        while self.definitions.contains_key(&name) || self.by_node.values().any(|v| v == &name) {
            name = format!("{}{}", wanted, n);
            n += 1;
        }
        self.by_node.insert(node_id.to_string(), name.clone());
        name
    }

    /// Store the source of a definition under a reserved name.
    pub fn insert(&mut self, name: &str, source: String) {
        self.definitions.insert(name.to_string(), source);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(String::as_str)
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.definitions.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.definitions.clear();
        self.by_node.clear();
    }
}
