/*
 * Responsibility
 * - system properties (flat string key/value settings)
 */
use std::collections::BTreeMap;

use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct PropertyRepo {
    props: RwLock<BTreeMap<String, String>>,
}

impl PropertyRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> BTreeMap<String, String> {
        self.props.read().clone()
    }

    /// Insert or overwrite every given key; other keys are left alone.
    pub fn merge(&self, incoming: BTreeMap<String, String>) {
        self.props.write().extend(incoming);
    }
}
