//! Compiles declarative query descriptions into SQLite-compatible SQL
//! statements plus an out-of-band bound-parameter vector.
//!
//! This crate is a thin facade: [`ronin_compiler_core`] supplies the
//! dialect-agnostic SQL fragment builder and parameter buffer, and
//! [`ronin_compiler_sqlite`] implements the compiler itself. Most consumers
//! only need [`compile`], [`Catalog`], and [`Statement`].

pub use ronin_compiler_sqlite::{
    compile, model, CompileError, Catalog, Field, FieldType, Model, Preset, Query, QueryType,
    ReferenceKind, Result, Statement, Transaction,
};

pub use ronin_compiler_core::{ParamBuf, Sql, SqlValue};
