//! A minimal SQL fragment builder.
//!
//! `Sql` accumulates a flat list of chunks (see [`SqlChunk`]) and renders
//! them to text on demand. Quoting of identifiers and placeholder
//! formatting happen exactly once, at the chunk boundary, so callers never
//! hand-format a `"column"` or a `?3` themselves.
mod chunk;

pub use chunk::SqlChunk;
use smallvec::{smallvec, SmallVec};

/// A composable SQL fragment.
///
/// Fragments carry no spacing magic: callers are responsible for the
/// whitespace between clauses (`Sql::raw("SELECT ")`, not `Sql::raw("SELECT")`
/// followed by an implicit space). This keeps rendering a pure
/// concatenation and avoids a class of "where did that extra space come
/// from" bugs that a smarter auto-spacing renderer would introduce.
#[derive(Debug, Clone, Default)]
pub struct Sql {
    chunks: SmallVec<[SqlChunk; 8]>,
}

impl Sql {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            chunks: smallvec![SqlChunk::Raw(text.into())],
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self {
            chunks: smallvec![SqlChunk::Ident(name.into())],
        }
    }

    /// A dotted, alias-qualified identifier: `"alias"."name"`.
    pub fn qualified_ident(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ident(alias).push_raw(".").append(Self::ident(name))
    }

    pub fn param(position: usize) -> Self {
        Self {
            chunks: smallvec![SqlChunk::Param(position)],
        }
    }

    /// Wraps `inner` as a single parenthesized chunk.
    pub fn nested(inner: Sql) -> Self {
        Self {
            chunks: smallvec![SqlChunk::Nested(Box::new(inner))],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Extends `self` with `other`'s chunks in place.
    pub fn append(mut self, other: Sql) -> Self {
        self.chunks.extend(other.chunks);
        self
    }

    pub fn push_raw(self, text: impl Into<String>) -> Self {
        self.append(Sql::raw(text))
    }

    /// Wraps the whole fragment built so far in parentheses.
    pub fn parens(self) -> Self {
        Sql::nested(self)
    }

    /// Appends ` AS "alias"`.
    pub fn alias(self, name: impl Into<String>) -> Self {
        self.push_raw(" AS ").append(Sql::ident(name))
    }

    /// Joins fragments with a literal separator (e.g. `", "` or `" AND "`).
    /// Fragments that are empty are skipped so optional clauses don't leave
    /// behind a dangling separator.
    pub fn join(items: impl IntoIterator<Item = Sql>, separator: &str) -> Sql {
        let mut out = Sql::empty();
        let mut first = true;
        for item in items {
            if item.is_empty() {
                continue;
            }
            if !first {
                out = out.push_raw(separator);
            }
            first = false;
            out = out.append(item);
        }
        out
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for chunk in &self.chunks {
            Self::render_chunk(chunk, &mut out);
        }
        out
    }

    fn render_chunk(chunk: &SqlChunk, out: &mut String) {
        match chunk {
            SqlChunk::Raw(text) => out.push_str(text),
            SqlChunk::Ident(name) => {
                out.push('"');
                out.push_str(&name.replace('"', "\"\""));
                out.push('"');
            }
            SqlChunk::Param(position) => {
                out.push('?');
                out.push_str(&position.to_string());
            }
            SqlChunk::Nested(inner) => {
                out.push('(');
                out.push_str(&inner.render());
                out.push(')');
            }
        }
    }
}
