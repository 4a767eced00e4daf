use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use cdr_core::models::rule::{slugify, Category, Rule};

use crate::error::CorpusError;
use crate::parser::CorpusParser;

/// The parsed corpus: categories in document order plus a reverse index
/// from rule id and lower-cased rule name to the rule.
///
/// A catalog is immutable once built. Share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    lookup: HashMap<String, (usize, usize)>,
}

impl Catalog {
    pub fn from_categories(categories: Vec<Category>) -> Self {
        let mut lookup = HashMap::new();
        for (ci, category) in categories.iter().enumerate() {
            for (ri, rule) in category.rules.iter().enumerate() {
                for key in [rule.id.clone(), rule.name.to_lowercase()] {
                    if key.is_empty() {
                        continue;
                    }
                    if let Some(&(pc, pr)) = lookup.get(&key) {
                        if (pc, pr) != (ci, ri) {
                            warn!(
                                key = %key,
                                kept = %categories[pc].name,
                                ignored = %category.name,
                                "duplicate rule key, keeping the first occurrence"
                            );
                        }
                        continue;
                    }
                    lookup.insert(key, (ci, ri));
                }
            }
        }
        Self { categories, lookup }
    }

    /// Read and parse the corpus file at `path`.
    pub fn from_path(path: &Path, parser: &CorpusParser) -> Result<Self, CorpusError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = parser.parse(&raw);
        info!(
            path = %path.display(),
            categories = catalog.categories.len(),
            rules = catalog.len(),
            "rule catalog loaded"
        );
        Ok(catalog)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// All rules in document order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.categories.iter().flat_map(|c| &c.rules)
    }

    /// Look up a rule by id or by name, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&Rule> {
        let hit = self
            .lookup
            .get(key)
            .or_else(|| self.lookup.get(&key.to_lowercase()))
            .or_else(|| self.lookup.get(&slugify(key)))?;
        let (ci, ri) = *hit;
        self.categories.get(ci)?.rules.get(ri)
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One line per category, `"<CATEGORY>: <rule1, rule2, ...>"`.
    pub fn index(&self) -> String {
        self.categories
            .iter()
            .map(|category| {
                let names: Vec<&str> = category.rules.iter().map(|r| r.name.as_str()).collect();
                format!("{}: {}", category.name, names.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reads the corpus on first use and hands out the same catalog afterwards.
///
/// Construct one at startup and pass it to whatever needs the catalog. Two
/// callers racing on the first `load` may both parse; the parse is pure, and
/// the first result stored is the one everyone sees.
#[derive(Debug)]
pub struct CatalogLoader {
    path: PathBuf,
    parser: CorpusParser,
    cached: OnceLock<Arc<Catalog>>,
}

impl CatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_parser(path, CorpusParser::new())
    }

    pub fn with_parser(path: impl Into<PathBuf>, parser: CorpusParser) -> Self {
        Self {
            path: path.into(),
            parser,
            cached: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Arc<Catalog>, CorpusError> {
        if let Some(catalog) = self.cached.get() {
            return Ok(Arc::clone(catalog));
        }
        let catalog = Arc::new(Catalog::from_path(&self.path, &self.parser)?);
        Ok(Arc::clone(self.cached.get_or_init(|| catalog)))
    }

    /// The catalog index, loading the catalog if needed.
    pub fn index(&self) -> Result<String, CorpusError> {
        Ok(self.load()?.index())
    }
}
