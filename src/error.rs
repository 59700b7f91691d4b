//! Errors raised while resolving descriptors into the IR.

use thiserror::Error;

/// Fatal conditions. Any of these aborts generation for the whole batch.
#[derive(Error, Debug)]
pub enum Error {
    /// A type symbol is not registered in the descriptor pool
    #[error("symbol `{0}` not found in descriptor pool")]
    SymbolNotFound(String),

    /// `body` or `response_body` names a field the message does not have
    #[error("message `{message}` has no field named `{field}`")]
    FieldNotFound { message: String, field: String },

    /// A body was declared on a `get` or `delete` binding
    #[error("{verb} {path} body should not be declared")]
    InvalidBodyDeclaration { verb: String, path: String },

    /// A binding other than `get`/`delete` did not declare a body
    #[error("{verb} {path} does not declare a body")]
    MissingBodyDeclaration { verb: String, path: String },

    /// Map keys must be bool, integer or string
    #[error("map field `{field}` has unsupported key type {kind}")]
    InvalidMapKey { field: String, kind: String },

    /// A map value type leads back to a map entry it is nested in
    #[error("map field `{field}` nests its own entry type `{entry}`")]
    RecursiveMap { field: String, entry: String },

    #[error("invalid descriptor set: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),

    #[error("decode failed: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("IR serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
