use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BrainError;

/// Corpus partition. Each category maps to a fixed subdirectory of the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Apis,
    Docs,
    Concepts,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Apis, Category::Docs, Category::Concepts];

    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Apis => "apis",
            Category::Docs => "docs",
            Category::Concepts => "concepts",
        }
    }

    /// Categories a query should visit: the given one, or all of them.
    pub fn targets(filter: Option<Category>) -> Vec<Category> {
        match filter {
            Some(c) => vec![c],
            None => Self::ALL.to_vec(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = BrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apis" => Ok(Category::Apis),
            "docs" => Ok(Category::Docs),
            "concepts" => Ok(Category::Concepts),
            other => Err(BrainError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("APIs".parse::<Category>().unwrap(), Category::Apis);
        assert_eq!(" docs ".parse::<Category>().unwrap(), Category::Docs);
        assert!(matches!("recipes".parse::<Category>(), Err(BrainError::UnknownCategory(_))));
    }

    #[test]
    fn targets_all_when_unfiltered() {
        assert_eq!(Category::targets(None), Category::ALL.to_vec());
        assert_eq!(Category::targets(Some(Category::Concepts)), vec![Category::Concepts]);
    }
}
