//! The atomic pieces an SQL fragment is built from.

/// One piece of an SQL fragment.
///
/// Kept flat (no recursive spacing logic inside a variant) so that `Sql`'s
/// renderer is the single place that decides spacing and punctuation.
#[derive(Debug, Clone)]
pub enum SqlChunk {
    /// Unquoted SQL text: keywords, operators, function names, numeric
    /// literals already rendered as text.
    Raw(String),

    /// A quoted identifier: renders as `"name"`.
    Ident(String),

    /// A positional parameter placeholder, already bound in the caller's
    /// `ParamBuf`: renders as `?N`.
    Param(usize),

    /// A fully-rendered sub-fragment wrapped in parentheses.
    Nested(Box<super::Sql>),
}
