//! Declarative HNSW index definitions.

use serde::{Deserialize, Serialize};

/// Operator classes provided by the extension for index columns.
pub mod opclass {
    /// Squared Euclidean distance.
    pub const L2SQ: &str = "dist_l2sq_ops";
    /// Cosine distance.
    pub const COSINE: &str = "dist_cos_ops";
    /// Hamming distance.
    pub const HAMMING: &str = "dist_hamming_ops";
}

/// An HNSW index over one or more embedding columns.
///
/// This is a plain configuration value plus rendering, decoupled from
/// any query-builder base type: the same definition can be rendered
/// into migration SQL, persisted, and reconstructed. Serialized forms
/// omit unset tuning parameters entirely, so a round-trip reproduces
/// exactly the parameters that were set and nothing else.
///
/// Tuning parameters map directly to the extension's `WITH` options:
/// `m` (graph connectivity), `ef` (search breadth), `ef_construction`
/// (build-time breadth), and `dim` (column dimensionality, inferred by
/// the extension when omitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HnswIndex {
    /// Index name.
    pub name: String,
    /// Table the index is created on.
    pub table: String,
    /// Indexed column expressions, in order.
    pub columns: Vec<String>,
    /// Operator classes, matched positionally with `columns`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opclasses: Vec<String>,
    /// Maximum number of graph connections per element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<u32>,
    /// Candidate list size at query time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef: Option<u32>,
    /// Candidate list size at build time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef_construction: Option<u32>,
    /// Dimensionality of the indexed column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim: Option<u32>,
}

impl HnswIndex {
    /// Creates an index definition with no tuning parameters set.
    pub fn new<I, S>(name: impl Into<String>, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            opclasses: Vec::new(),
            m: None,
            ef: None,
            ef_construction: None,
            dim: None,
        }
    }

    /// Sets the operator classes, matched positionally with the columns.
    pub fn with_opclasses<I, S>(mut self, opclasses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opclasses = opclasses.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the `m` tuning parameter.
    pub fn with_m(mut self, m: u32) -> Self {
        self.m = Some(m);
        self
    }

    /// Sets the `ef` tuning parameter.
    pub fn with_ef(mut self, ef: u32) -> Self {
        self.ef = Some(ef);
        self
    }

    /// Sets the `ef_construction` tuning parameter.
    pub fn with_ef_construction(mut self, ef_construction: u32) -> Self {
        self.ef_construction = Some(ef_construction);
        self
    }

    /// Sets the `dim` tuning parameter.
    pub fn with_dim(mut self, dim: u32) -> Self {
        self.dim = Some(dim);
        self
    }

    /// Returns the set tuning parameters as `key = value` pairs, in the
    /// fixed `m`, `ef`, `ef_construction`, `dim` order. Unset parameters
    /// are omitted, never rendered as defaults.
    pub fn with_params(&self) -> Vec<String> {
        let mut params = Vec::new();
        if let Some(m) = self.m {
            params.push(format!("m = {}", m));
        }
        if let Some(ef) = self.ef {
            params.push(format!("ef = {}", ef));
        }
        if let Some(ef_construction) = self.ef_construction {
            params.push(format!("ef_construction = {}", ef_construction));
        }
        if let Some(dim) = self.dim {
            params.push(format!("dim = {}", dim));
        }
        params
    }

    /// Returns the rendered `WITH (...)` clause, or `None` when no
    /// tuning parameter is set.
    pub fn with_clause(&self) -> Option<String> {
        let params = self.with_params();
        if params.is_empty() {
            return None;
        }
        Some(format!("WITH ({})", params.join(", ")))
    }

    /// Renders the full `CREATE INDEX` statement.
    pub fn to_sql(&self) -> String {
        let mut columns = Vec::with_capacity(self.columns.len());
        for (position, column) in self.columns.iter().enumerate() {
            match self.opclasses.get(position) {
                Some(opclass) => columns.push(format!("{} {}", column, opclass)),
                None => columns.push(column.clone()),
            }
        }

        let mut sql = format!(
            "CREATE INDEX {} ON {} USING hnsw ({})",
            self.name,
            self.table,
            columns.join(", "),
        );
        if let Some(with_clause) = self.with_clause() {
            sql.push(' ');
            sql.push_str(&with_clause);
        }
        sql
    }
}
