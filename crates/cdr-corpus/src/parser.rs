//! Line-oriented corpus parser.
//!
//! The corpus is a markdown document with three header levels that matter:
//!
//! ```text
//! CDR Reference Corpus            <- title / preamble, ignored
//! # CARDIOVASCULAR                <- category (must be a known name)
//! Intro text, ignored.
//! ## HEART Score                  <- rule block
//! **Application:** Risk of MACE in ED chest pain.
//! ...
//! ```
//!
//! The parser walks lines through three states (outside any category, inside
//! a category before its first rule, inside a rule). A level-1 header that is
//! not a known category moves the walk to a skipping state, so everything up
//! to the next level-1 header is dropped. Nothing here fails: malformed input
//! only shrinks the catalog.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use cdr_core::models::rule::{slugify, Category, Rule};

use crate::catalog::Catalog;
use crate::categories::KNOWN_CATEGORIES;
use crate::keywords::rule_keywords;

static APPLICATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Application:\*\*[ \t]*([^\r\n]*)").expect("application pattern is valid")
});

/// Parse `raw` with the built-in category list.
pub fn parse(raw: &str) -> Catalog {
    CorpusParser::new().parse(raw)
}

/// Extract the `**Application:**` sentence from a rule block, or `""`.
pub fn application_of(block: &str) -> String {
    APPLICATION
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct CorpusParser {
    categories: Vec<String>,
}

impl Default for CorpusParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Classification of a single corpus line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Category(&'a str),
    Rule(&'a str),
    Text,
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix("## ") {
        Line::Rule(rest)
    } else if let Some(rest) = line.strip_prefix('#')
        && !rest.starts_with('#')
    {
        Line::Category(rest.trim())
    } else {
        Line::Text
    }
}

/// A rule whose block is still being read.
struct Draft<'a> {
    header: &'a str,
    body: Vec<&'a str>,
}

enum State<'a> {
    Outside,
    Skipping,
    InCategory(usize),
    InRule(usize, Draft<'a>),
}

impl CorpusParser {
    pub fn new() -> Self {
        Self::with_categories(KNOWN_CATEGORIES.iter().copied())
    }

    /// Use `categories` instead of the built-in list of accepted level-1 headers.
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    fn is_known(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    pub fn parse(&self, raw: &str) -> Catalog {
        let mut categories: Vec<Category> = Vec::new();
        let mut state = State::Outside;

        for line in raw.lines() {
            state = match (state, classify(line)) {
                (State::InRule(idx, draft), Line::Category(name)) => {
                    finish_rule(&mut categories[idx], draft);
                    self.enter_category(&mut categories, name)
                }
                (_, Line::Category(name)) => self.enter_category(&mut categories, name),
                (State::InRule(idx, draft), Line::Rule(header)) => {
                    finish_rule(&mut categories[idx], draft);
                    State::InRule(idx, Draft { header, body: Vec::new() })
                }
                (State::InCategory(idx), Line::Rule(header)) => {
                    State::InRule(idx, Draft { header, body: Vec::new() })
                }
                (State::InRule(idx, mut draft), Line::Text) => {
                    draft.body.push(line);
                    State::InRule(idx, draft)
                }
                // Preamble, category intro text, and anything under an
                // unknown category.
                (other, _) => other,
            };
        }

        if let State::InRule(idx, draft) = state {
            finish_rule(&mut categories[idx], draft);
        }

        Catalog::from_categories(categories)
    }

    fn enter_category<'a>(&self, categories: &mut Vec<Category>, name: &str) -> State<'a> {
        if !self.is_known(name) {
            debug!(header = name, "dropping unknown category");
            return State::Skipping;
        }
        // A repeated header continues the existing category.
        let idx = match categories.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                categories.push(Category {
                    name: name.to_string(),
                    rules: Vec::new(),
                });
                categories.len() - 1
            }
        };
        State::InCategory(idx)
    }
}

fn finish_rule(category: &mut Category, draft: Draft<'_>) {
    let name = draft.header.trim();
    if name.is_empty() {
        debug!(category = %category.name, "dropping rule with empty header");
        return;
    }

    let mut full_text = format!("## {}", draft.header);
    for line in &draft.body {
        full_text.push('\n');
        full_text.push_str(line);
    }
    let full_text = full_text.trim().to_string();

    let application = application_of(&full_text);
    let keywords = rule_keywords(name, &application);

    category.rules.push(Rule {
        id: slugify(name),
        name: name.to_string(),
        category: category.name.clone(),
        full_text,
        application,
        keywords,
    });
}
