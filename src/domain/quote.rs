//! Core quote domain types.
//!
//! Defines the `Quote` record, the seed collection used when nothing valid
//! is persisted, and the category filter selection. Everything here is
//! pure and serializable; storage and network live in the outer layers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::QuoteError;

/// Category assigned when none (or a blank one) is supplied.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Filter value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "all";

/// Built-in quotes used whenever no valid snapshot exists.
const SEED_QUOTES: [(&str, &str); 4] = [
    (
        "The only way to do great work is to love what you do.",
        "Motivation",
    ),
    (
        "Life is what happens when you’re busy making other plans.",
        "Life",
    ),
    ("In the middle of every difficulty lies opportunity.", "Wisdom"),
    ("Simplicity is the ultimate sophistication.", "Design"),
];

/// A single quote shown to the user.
///
/// Quotes carry no identifier: two quotes are "the same" when their
/// `text` matches (see [`crate::domain::merge`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body, never empty, always trimmed.
    pub text: String,
    /// Category label, never empty.
    pub category: String,
}

impl Quote {
    /// Build a validated quote from raw user input.
    ///
    /// Both fields are trimmed. Empty text is rejected; an empty
    /// category falls back to [`UNCATEGORIZED`].
    ///
    /// # Errors
    /// Returns [`QuoteError::Validation`] when `text` is blank.
    pub fn new(text: &str, category: &str) -> Result<Self, QuoteError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QuoteError::Validation(
                "quote text must not be empty".to_string(),
            ));
        }
        Ok(Self {
            text: text.to_string(),
            category: normalize_category(Some(category)),
        })
    }

    /// Lenient conversion from an arbitrary JSON value.
    ///
    /// Accepts any object with a string `text` field. A missing or
    /// non-string `category` becomes [`UNCATEGORIZED`]. Returns `None`
    /// for anything else, including text that is blank after trimming.
    pub fn from_json(value: &Value) -> Option<Self> {
        let text = value.get("text")?.as_str()?.trim();
        if text.is_empty() {
            return None;
        }
        let category = value.get("category").and_then(Value::as_str);
        Some(Self {
            text: text.to_string(),
            category: normalize_category(category),
        })
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.category)
    }
}

/// Trim a category and default it when blank or absent.
pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}

/// The fixed four-quote seed collection.
pub fn default_quotes() -> Vec<Quote> {
    SEED_QUOTES
        .iter()
        .map(|(text, category)| Quote {
            text: (*text).to_string(),
            category: (*category).to_string(),
        })
        .collect()
}

/// Parse a persisted snapshot into a collection.
///
/// Succeeds if `raw` is a JSON array whose every element has a string
/// `text`. Elements whose text is blank after trimming are dropped
/// rather than invalidating the whole snapshot.
///
/// # Errors
/// Returns [`QuoteError::Format`] describing the first problem found.
pub fn parse_collection(raw: &str) -> Result<Vec<Quote>, QuoteError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| QuoteError::Format(format!("invalid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(QuoteError::Format(
            "expected an array of quote objects".to_string(),
        ));
    };

    let mut quotes = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Some(text) = item.get("text").and_then(Value::as_str) else {
            return Err(QuoteError::Format(format!(
                "element {i} has no string text field"
            )));
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        quotes.push(Quote {
            text: text.to_string(),
            category: normalize_category(item.get("category").and_then(Value::as_str)),
        });
    }
    Ok(quotes)
}

/// Category filter selection.
///
/// Serialized as a bare string: `"all"` or the category name, which is
/// also the form kept in the durable store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every quote passes.
    #[default]
    All,
    /// Only quotes whose category matches exactly (case-sensitive).
    Category(String),
}

impl CategoryFilter {
    /// Parse a stored or user-supplied selection. Blank means `All`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(raw.to_string())
        }
    }

    /// Whether `quote` passes this filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(c) => quote.category == *c,
        }
    }

    /// The stored string form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(c) => c,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Distinct categories in first-seen order.
pub fn categories_of(quotes: &[Quote]) -> Vec<String> {
    let mut seen = Vec::new();
    for quote in quotes {
        if !seen.contains(&quote.category) {
            seen.push(quote.category.clone());
        }
    }
    seen
}

/// Stable-order subsequence of `quotes` passing `filter`.
pub fn filter_quotes(quotes: &[Quote], filter: &CategoryFilter) -> Vec<Quote> {
    quotes.iter().filter(|q| filter.matches(q)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn q(text: &str, category: &str) -> Quote {
        Quote {
            text: text.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_new_trims_and_defaults_category() {
        let quote = Quote::new("  hi  ", "   ").unwrap();
        assert_eq!(quote.text, "hi");
        assert_eq!(quote.category, UNCATEGORIZED);
    }

    #[test]
    fn test_new_rejects_blank_text() {
        let err = Quote::new("   ", "X").unwrap_err();
        assert!(matches!(err, QuoteError::Validation(_)));
    }

    #[test]
    fn test_from_json_defaults_non_string_category() {
        let quote = Quote::from_json(&json!({"text": " a ", "category": 7})).unwrap();
        assert_eq!(quote, q("a", UNCATEGORIZED));
        assert!(Quote::from_json(&json!({"text": 3})).is_none());
        assert!(Quote::from_json(&json!("plain string")).is_none());
    }

    #[test]
    fn test_default_quotes_are_four_seeds() {
        let seeds = default_quotes();
        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds[0].category, "Motivation");
        assert_eq!(seeds[3].text, "Simplicity is the ultimate sophistication.");
    }

    #[test]
    fn test_parse_collection_rejects_non_array_and_bad_elements() {
        assert!(parse_collection("{\"text\":\"a\"}").is_err());
        assert!(parse_collection("not json").is_err());
        assert!(parse_collection("[{\"text\":\"a\"}, {\"nope\":1}]").is_err());
        let parsed = parse_collection("[{\"text\":\"a\"}]").unwrap();
        assert_eq!(parsed, vec![q("a", UNCATEGORIZED)]);
    }

    #[test]
    fn test_parse_collection_drops_blank_text_but_keeps_the_rest() {
        let raw = r#"[{"text":"keep me","category":"A"},{"text":"  ","category":"B"}]"#;
        assert_eq!(parse_collection(raw).unwrap(), vec![q("keep me", "A")]);
        assert!(Quote::from_json(&json!({"text": "  "})).is_none());
    }

    #[test]
    fn test_category_filter_roundtrips_as_string() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        let f = CategoryFilter::parse("Life");
        assert_eq!(serde_json::to_string(&f).unwrap(), "\"Life\"");
        let back: CategoryFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(back, CategoryFilter::All);
    }

    #[test]
    fn test_filter_is_case_sensitive_and_stable() {
        let quotes = vec![q("a", "Life"), q("b", "life"), q("c", "Life")];
        let filtered = filter_quotes(&quotes, &CategoryFilter::Category("Life".into()));
        assert_eq!(filtered, vec![q("a", "Life"), q("c", "Life")]);
        assert_eq!(filter_quotes(&quotes, &CategoryFilter::All), quotes);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let quotes = vec![q("a", "B"), q("b", "A"), q("c", "B")];
        assert_eq!(categories_of(&quotes), vec!["B".to_string(), "A".to_string()]);
    }
}
