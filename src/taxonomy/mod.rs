//! Three-level subject taxonomy plus the flat keyword tables.
//!
//! Everything here is built once at startup and shared read-only through
//! [`Catalog`].

mod builtin;
mod keywords;

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use keywords::{ExclusionGroup, ExclusionLists, KeywordRule, KeywordRuleSet, OTHER_DISPLAY_NAME};

/// Key used whenever nothing in the taxonomy matched.
pub const OTHER: &str = "other";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub name: String,
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcategory {
    pub key: String,
    pub name: String,
    #[serde(rename = "sub_subcategories")]
    pub leaves: Vec<Leaf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    pub key: String,
    pub name: String,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn subcategory(&self, key: &str) -> Option<&Subcategory> {
        self.subcategories.iter().find(|sub| sub.key == key)
    }

    /// Every leaf keyword below this category, in enumeration order.
    /// Keywords shared by several leaves are yielded once per leaf.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.subcategories.iter().flat_map(|sub| sub.keywords())
    }
}

impl Subcategory {
    pub fn leaf(&self, key: &str) -> Option<&Leaf> {
        self.leaves.iter().find(|leaf| leaf.key == key)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.leaves
            .iter()
            .flat_map(|leaf| leaf.keywords.iter().map(String::as_str))
    }
}

/// A leaf together with its ancestry, as produced by [`Taxonomy::flatten`].
#[derive(Debug, Clone, Serialize)]
pub struct FlatLeaf {
    pub unique_key: String,
    pub category: String,
    pub subcategory: String,
    pub sub_subcategory: String,
    pub name: String,
    pub keywords: Vec<String>,
    pub full_path: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub key: String,
    pub name: String,
    pub subcategories: usize,
    pub sub_subcategories: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyStats {
    pub total_categories: usize,
    pub categories: Vec<CategoryStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let taxonomy = Self { categories };
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    pub fn builtin() -> Self {
        Self {
            categories: builtin::categories(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|cat| cat.key == key)
    }

    pub fn subcategory(&self, category: &str, subcategory: &str) -> Option<&Subcategory> {
        self.category(category)?.subcategory(subcategory)
    }

    pub fn leaf(&self, category: &str, subcategory: &str, leaf: &str) -> Option<&Leaf> {
        self.subcategory(category, subcategory)?.leaf(leaf)
    }

    /// Display names from the top level down, stopping at the first level
    /// that is missing or does not resolve.
    pub fn category_path(
        &self,
        category: &str,
        subcategory: Option<&str>,
        leaf: Option<&str>,
    ) -> Vec<String> {
        let mut path = Vec::with_capacity(3);
        let Some(cat) = self.category(category) else {
            return path;
        };
        path.push(cat.name.clone());

        let Some(sub) = subcategory.and_then(|key| cat.subcategory(key)) else {
            return path;
        };
        path.push(sub.name.clone());

        if let Some(leaf) = leaf.and_then(|key| sub.leaf(key)) {
            path.push(leaf.name.clone());
        }
        path
    }

    pub fn flatten(&self) -> Vec<FlatLeaf> {
        let mut flat = Vec::new();
        for cat in &self.categories {
            for sub in &cat.subcategories {
                for leaf in &sub.leaves {
                    flat.push(FlatLeaf {
                        unique_key: format!("{}_{}_{}", cat.key, sub.key, leaf.key),
                        category: cat.key.clone(),
                        subcategory: sub.key.clone(),
                        sub_subcategory: leaf.key.clone(),
                        name: leaf.name.clone(),
                        keywords: leaf.keywords.clone(),
                        full_path: vec![cat.name.clone(), sub.name.clone(), leaf.name.clone()],
                    });
                }
            }
        }
        flat
    }

    /// Keywords at the most specific level given; coarser levels aggregate
    /// all of their descendants. Unknown keys yield an empty list.
    pub fn keywords_for(
        &self,
        category: Option<&str>,
        subcategory: Option<&str>,
        leaf: Option<&str>,
    ) -> Vec<String> {
        match (category, subcategory, leaf) {
            (Some(cat), Some(sub), Some(leaf)) => self
                .leaf(cat, sub, leaf)
                .map(|leaf| leaf.keywords.clone())
                .unwrap_or_default(),
            (Some(cat), Some(sub), None) => self
                .subcategory(cat, sub)
                .map(|sub| sub.keywords().map(str::to_string).collect())
                .unwrap_or_default(),
            (Some(cat), None, _) => self
                .category(cat)
                .map(|cat| cat.keywords().map(str::to_string).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Flat rules derived from the tree: one rule per category, every
    /// keyword weighted 1.0, duplicates collapsed to their first occurrence.
    pub fn legacy_keyword_rules(&self) -> KeywordRuleSet {
        let rules = self
            .categories
            .iter()
            .map(|cat| {
                let mut seen = HashSet::new();
                let keywords = cat
                    .keywords()
                    .filter(|kw| seen.insert(*kw))
                    .map(|kw| (kw.to_string(), 1.0))
                    .collect();
                KeywordRule {
                    key: cat.key.clone(),
                    name: cat.name.clone(),
                    keywords,
                }
            })
            .collect();
        KeywordRuleSet::from_rules(rules)
    }

    pub fn leaf_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|cat| &cat.subcategories)
            .map(|sub| sub.leaves.len())
            .sum()
    }

    pub fn stats(&self) -> TaxonomyStats {
        TaxonomyStats {
            total_categories: self.categories.len(),
            categories: self
                .categories
                .iter()
                .map(|cat| CategoryStats {
                    key: cat.key.clone(),
                    name: cat.name.clone(),
                    subcategories: cat.subcategories.len(),
                    sub_subcategories: cat.subcategories.iter().map(|s| s.leaves.len()).sum(),
                })
                .collect(),
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::Empty("taxonomy"));
        }
        ensure_unique("category", self.categories.iter().map(|c| c.key.as_str()))?;
        for cat in &self.categories {
            ensure_unique(
                "subcategory",
                cat.subcategories.iter().map(|s| s.key.as_str()),
            )?;
            for sub in &cat.subcategories {
                ensure_unique("sub_subcategory", sub.leaves.iter().map(|l| l.key.as_str()))?;
                if let Some(leaf) = sub.leaves.iter().find(|l| l.keywords.is_empty()) {
                    return Err(CatalogError::EmptyKeywords(format!(
                        "{}/{}/{}",
                        cat.key, sub.key, leaf.key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn ensure_unique<'a>(
    level: &'static str,
    keys: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(CatalogError::DuplicateKey {
                level,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("duplicate {level} key: {key}")]
    DuplicateKey { level: &'static str, key: String },
    #[error("leaf {0} has no keywords")]
    EmptyKeywords(String),
    #[error("keyword {keyword:?} in {category} has weight {weight} outside [0, 1]")]
    WeightOutOfRange {
        category: String,
        keyword: String,
        weight: f64,
    },
}

/// Optional file overrides for the built-in tables.
#[derive(Debug, Clone, Default)]
pub struct CatalogPaths {
    pub taxonomy: Option<PathBuf>,
    pub keyword_rules: Option<PathBuf>,
    pub exclusions: Option<PathBuf>,
}

/// The immutable classification tables, cheap to clone and shared by every
/// classifier instance.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub taxonomy: Arc<Taxonomy>,
    pub keyword_rules: Arc<KeywordRuleSet>,
    pub exclusions: Arc<ExclusionLists>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            taxonomy: Arc::new(Taxonomy::builtin()),
            keyword_rules: Arc::new(KeywordRuleSet::builtin()),
            exclusions: Arc::new(ExclusionLists::builtin()),
        }
    }

    pub fn load(paths: &CatalogPaths) -> Result<Self, CatalogError> {
        let taxonomy = match &paths.taxonomy {
            Some(path) => Taxonomy::new(read_json(path)?)?,
            None => Taxonomy::builtin(),
        };
        let keyword_rules = match &paths.keyword_rules {
            Some(path) => KeywordRuleSet::new(read_json(path)?)?,
            None => KeywordRuleSet::builtin(),
        };
        let exclusions = match &paths.exclusions {
            Some(path) => ExclusionLists::new(read_json(path)?),
            None => ExclusionLists::builtin(),
        };

        tracing::info!(
            target: "classifier",
            categories = taxonomy.categories().len(),
            leaves = taxonomy.leaf_count(),
            keyword_rules = keyword_rules.rules().len(),
            exclusion_groups = exclusions.groups().len(),
            "classification catalog loaded"
        );

        Ok(Self {
            taxonomy: Arc::new(taxonomy),
            keyword_rules: Arc::new(keyword_rules),
            exclusions: Arc::new(exclusions),
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
