//! Tag records and categories

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Catalogue category of a tag.
///
/// Numeric codes follow the catalogue export: `0` general, `1` artist,
/// `3` copyright, `4` character, `5` meta. Anything else is kept as
/// [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    General,
    Artist,
    Copyright,
    Character,
    Meta,
    Other(u8),
}

impl Category {
    /// Map a catalogue type code to a category.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Category::General,
            1 => Category::Artist,
            3 => Category::Copyright,
            4 => Category::Character,
            5 => Category::Meta,
            other => Category::Other(other),
        }
    }

    /// Catalogue type code for this category.
    pub fn code(self) -> u8 {
        match self {
            Category::General => 0,
            Category::Artist => 1,
            Category::Copyright => 3,
            Category::Character => 4,
            Category::Meta => 5,
            Category::Other(code) => code,
        }
    }
}

/// One catalogue entry as produced by a record source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub canonical_name: String,
    pub category: Category,
    pub usage_count: u64,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl TagRecord {
    pub fn new(canonical_name: impl Into<String>, category: Category, usage_count: u64) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            category,
            usage_count,
            aliases: Vec::new(),
        }
    }

    /// Builder-style alias list.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

/// Categories omitted from indexing entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(BTreeSet<Category>);

impl CategorySet {
    /// Set that excludes nothing.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn insert(&mut self, category: Category) -> bool {
        self.0.insert(category)
    }

    pub fn remove(&mut self, category: Category) -> bool {
        self.0.remove(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }
}

impl Default for CategorySet {
    /// artist, copyright, character and meta.
    fn default() -> Self {
        [
            Category::Artist,
            Category::Copyright,
            Category::Character,
            Category::Meta,
        ]
        .into_iter()
        .collect()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<T: IntoIterator<Item = Category>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
