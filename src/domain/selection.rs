//! Selection value object: one chosen option value per variant group.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::domain::aggregates::Product;

/// Current choice per group name. Immutable; every change yields a new value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<String, String>);

/// One `{name, value}` pair as submitted with a cart line.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SelectedVariant {
    pub name: String,
    pub value: String,
}

impl Selection {
    pub fn new() -> Self { Self::default() }

    /// First option of every group, as shown when the product page loads.
    pub fn defaults_for(product: &Product) -> Self {
        Self(
            product.variant_groups().iter()
                .filter_map(|g| g.first_option().map(|o| (g.name.clone(), o.value.clone())))
                .collect(),
        )
    }

    pub fn with(&self, group: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.0.clone();
        next.insert(group.into(), value.into());
        Self(next)
    }

    pub fn without(&self, group: &str) -> Self {
        let mut next = self.0.clone();
        next.remove(group);
        Self(next)
    }

    pub fn get(&self, group: &str) -> Option<&str> { self.0.get(group).map(String::as_str) }
    pub fn groups(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Pairs sorted by name then value, the normalized form used for cart lines.
    pub fn to_selected_variants(&self) -> Vec<SelectedVariant> {
        self.0.iter().map(|(name, value)| SelectedVariant { name: name.clone(), value: value.clone() }).collect()
    }
}

impl FromIterator<(String, String)> for Selection {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

impl From<Vec<SelectedVariant>> for Selection {
    fn from(pairs: Vec<SelectedVariant>) -> Self { pairs.into_iter().map(|v| (v.name, v.value)).collect() }
}
