//! Ecore → Avro Protocol Generation
//!
//! Translates a meta-model package graph (classes, attributes, references,
//! enumerations, inheritance) into an equivalent Avro protocol declaration.
//! Build-time code generation, one direction only.
//!
//! ## Pipeline
//!
//! ```text
//! model.json ──load──▶ MetaModel ──translate──▶ Protocol ──write──▶
//!     <out>/<namespace-segments>/<ProtocolName>.avpr
//! ```
//!
//! The translator is a pure function over an immutable graph: inheritance is
//! flattened into each record (the target format has no class hierarchy),
//! optional single-valued features become `["null", T]` unions, multi-valued
//! features become arrays, and type declarations are emitted in a
//! dependency-first order with a stable declared-order tie-break so repeated
//! runs are byte-identical.

pub mod error;
pub mod generator;
pub mod model;
pub mod protocol;
pub mod translate;

pub use error::{Result, TranslateError};
pub use generator::{GeneratedFile, Generator};
pub use model::MetaModel;
pub use protocol::Protocol;
pub use translate::translate;
