//! Extension installation directives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A database extension this crate adapts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extension {
    /// The core extension: `real[]` distance operators and the HNSW
    /// index access method.
    #[default]
    Lantern,
    /// The extras extension: embedding generation functions such as
    /// `text_embedding` and `image_embedding`.
    LanternExtras,
}

impl Extension {
    /// Both extensions, in installation order.
    pub const ALL: [Extension; 2] = [Extension::Lantern, Extension::LanternExtras];

    /// Returns the extension name as known to the database.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Lantern => "lantern",
            Self::LanternExtras => "lantern_extras",
        }
    }

    /// Returns the idempotent installation statement.
    pub fn create_statement(&self) -> String {
        format!("CREATE EXTENSION IF NOT EXISTS {}", self.name())
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_statements() {
        assert_eq!(
            Extension::Lantern.create_statement(),
            "CREATE EXTENSION IF NOT EXISTS lantern",
        );
        assert_eq!(
            Extension::LanternExtras.create_statement(),
            "CREATE EXTENSION IF NOT EXISTS lantern_extras",
        );
    }

    #[test]
    fn names_match_database_catalog() {
        assert_eq!(Extension::Lantern.name(), "lantern");
        assert_eq!(Extension::LanternExtras.name(), "lantern_extras");
        assert_eq!(Extension::Lantern.to_string(), "lantern");
    }
}
