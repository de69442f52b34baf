//! Compiles RONIN query descriptions into SQLite-compatible SQL statements.
//!
//! The public surface is intentionally small: build a [`model::Catalog`],
//! hand it and a batch of query descriptions to [`compile`], and receive a
//! [`orchestrator::Statement`] per query.

pub mod condition;
pub mod error;
pub mod expression;
pub mod including;
pub mod model;
pub mod orchestrator;
pub mod preset;
pub mod query;
pub mod resolver;
pub mod selecting;
pub mod symbols;

pub use error::{CompileError, ErrorCode, Result};
pub use model::{Catalog, Field, FieldType, Model, Preset, ReferenceKind};
pub use orchestrator::{compile, Statement};
pub use query::{Query, QueryType};

/// Eagerly compiles a batch of queries and exposes a hydration contract for
/// the caller's result rows (spec §6: `Transaction`).
///
/// Hydration itself — turning SQLite rows back into records — lives outside
/// this crate; `prepare_results` only pairs each input row set with the
/// query that produced it, preserving the `get`-singular / `get`-plural /
/// `count` result-shape distinction the caller is expected to honor.
pub struct Transaction {
    pub statements: Vec<Statement>,
    result_shapes: Vec<ResultShape>,
}

/// The shape a caller should hydrate a statement's rows into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    SingleRecord,
    MultipleRecord,
    Amount,
}

impl Transaction {
    pub fn new(queries: &[serde_json::Value], catalog: &Catalog) -> Result<Self> {
        let parsed: Result<Vec<Query>> = queries.iter().map(Query::parse).collect();
        let parsed = parsed?;

        let mut result_shapes = Vec::with_capacity(parsed.len());
        for query in &parsed {
            let (_, cardinality) = resolver::get_model_by_slug(catalog, &query.model_address)?;
            result_shapes.push(match query.query_type {
                QueryType::Count => ResultShape::Amount,
                _ if cardinality == model::Cardinality::Single => ResultShape::SingleRecord,
                _ => ResultShape::MultipleRecord,
            });
        }

        let statements = compile(queries, catalog)?;
        Ok(Transaction {
            statements,
            result_shapes,
        })
    }

    /// The result shape each compiled statement's rows should be hydrated
    /// into, in the same order as [`Transaction::statements`].
    pub fn result_shapes(&self) -> &[ResultShape] {
        &self.result_shapes
    }
}
