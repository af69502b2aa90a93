// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use crate::models::Category;
use crate::view::icons::icon_for;

/// Category id to display name lookup, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDirectory {
    names: BTreeMap<i64, String>,
}

impl CategoryDirectory {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            names: categories.into_iter().map(|c| (c.id, c.name)).collect(),
        }
    }

    pub fn name_of(&self, id: i64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn icon_of(&self, id: i64) -> &'static str {
        icon_for(self.name_of(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        let dir = CategoryDirectory::new(vec![
            Category { id: 3, name: "Rent".into() },
            Category { id: 1, name: "Groceries".into() },
        ]);
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.name_of(3), Some("Rent"));
        assert_eq!(dir.icon_of(1), "🛒");
        assert_eq!(dir.name_of(9), None);
        assert_eq!(dir.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![1, 3]);
    }
}
