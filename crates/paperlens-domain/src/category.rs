//! Category module - the closed classification label set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification label assigned to a paper
///
/// The label set is closed: anything outside A-F is rejected rather than
/// mapped onto a nearby label.
/// - A: Traditional methods in the domain
/// - B: Data-driven methods (general background)
/// - C: Data-driven methods applied to the domain
/// - D: Solutions to the core challenge (any domain)
/// - E: Solutions to the core challenge in the domain
/// - F: Other / unrelated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    /// Traditional methods in the domain
    A,
    /// Data-driven methods, general background
    B,
    /// Data-driven methods applied to the domain
    C,
    /// Solutions to the core challenge, any domain
    D,
    /// Solutions to the core challenge in the domain
    E,
    /// Other / unrelated
    F,
}

impl Category {
    /// All labels in display order
    pub const ALL: [Category; 6] = [
        Category::A,
        Category::B,
        Category::C,
        Category::D,
        Category::E,
        Category::F,
    ];

    /// Get the single-letter label
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
            Category::C => "C",
            Category::D => "D",
            Category::E => "E",
            Category::F => "F",
        }
    }

    /// Human-readable description used in reports
    pub fn description(&self) -> &'static str {
        match self {
            Category::A => "Traditional methods in domain",
            Category::B => "Data-driven methods (general background)",
            Category::C => "Data-driven methods in domain",
            Category::D => "Solutions to core challenge (any domain)",
            Category::E => "Solutions to core challenge in domain (core)",
            Category::F => "Other / Unrelated",
        }
    }

    /// Parse a label as emitted by the model
    ///
    /// Accepts the bare letter (`"E"`) or a decorated label whose letter is
    /// followed by punctuation or whitespace (`"E. Solutions ..."`,
    /// `"e) core"`). Everything else is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use paperlens_domain::Category;
    ///
    /// assert_eq!(Category::parse("C"), Some(Category::C));
    /// assert_eq!(Category::parse("E. Solutions in domain"), Some(Category::E));
    /// assert_eq!(Category::parse("G"), None);
    /// assert_eq!(Category::parse("Data-driven"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next()?;
        match chars.next() {
            None => {}
            Some(c) if c == '.' || c == ')' || c == ':' || c.is_whitespace() => {}
            Some(_) => return None,
        }
        match letter.to_ascii_uppercase() {
            'A' => Some(Category::A),
            'B' => Some(Category::B),
            'C' => Some(Category::C),
            'D' => Some(Category::D),
            'E' => Some(Category::E),
            'F' => Some(Category::F),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid category label: {}", s))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_letters() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("d"), Some(Category::D));
    }

    #[test]
    fn test_parse_decorated_labels() {
        assert_eq!(Category::parse(" B. Data-driven background"), Some(Category::B));
        assert_eq!(Category::parse("F) unrelated"), Some(Category::F));
        assert_eq!(Category::parse("A: traditional"), Some(Category::A));
    }

    #[test]
    fn test_rejects_unknown_labels() {
        assert_eq!(Category::parse(""), None);
        assert_eq!(Category::parse("G"), None);
        assert_eq!(Category::parse("Unknown"), None);
        assert_eq!(Category::parse("AB"), None);
        assert!("Z".parse::<Category>().is_err());
    }

    #[test]
    fn test_ordering_follows_labels() {
        let mut labels = vec![Category::E, Category::A, Category::C];
        labels.sort();
        assert_eq!(labels, vec![Category::A, Category::C, Category::E]);
    }
}
