use crate::error::SourceError;
use camino::Utf8Path;
use pkgaudit_domain::query::PackageQuery;
use serde_json::Value;
use std::collections::BTreeMap;

/// Installed packages read from a file instead of the live package manager.
///
/// The file is a JSON object of `name: version`. A `null` or empty version records the
/// package as not installed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticInventory {
    packages: BTreeMap<String, String>,
}

impl StaticInventory {
    pub fn new(packages: BTreeMap<String, String>) -> Self {
        Self { packages }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl FromIterator<(String, String)> for StaticInventory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl PackageQuery for StaticInventory {
    fn installed_version(&self, name: &str) -> Option<String> {
        self.packages
            .get(name)
            .filter(|version| !version.is_empty())
            .cloned()
    }
}

pub fn parse_inventory_json(text: &str) -> Result<StaticInventory, SourceError> {
    parse(text).map_err(SourceError::InventoryText)
}

fn parse(text: &str) -> Result<StaticInventory, serde_json::Error> {
    let raw: BTreeMap<String, Value> = serde_json::from_str(text)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, version)| match version {
            Value::String(v) => Some((name, v)),
            Value::Number(n) => Some((name, n.to_string())),
            Value::Null => None,
            other => {
                tracing::warn!(package = %name, value = %other, "ignoring non-scalar inventory version");
                None
            }
        })
        .collect())
}

pub fn load_inventory(path: &Utf8Path) -> Result<StaticInventory, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_owned(),
        source,
    })?;
    let inventory = parse(&text).map_err(|source| SourceError::Inventory {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(path = %path, packages = inventory.len(), "loaded inventory");
    Ok(inventory)
}
