//! # protoc-gen-http
//!
//! Library backing the protoc plugin resolving `google.api.http` bindings.
//!
//! For every annotated RPC method it resolves the HTTP verb, path, request/response types and
//! body mapping into an intermediate representation ([`FileIr`]) ready for a template renderer.
//! The binary emits that IR as JSON; a renderer written in Rust can call [`build_file`]
//! directly.

pub mod annotations;
mod args;
pub mod comments;
mod error;
mod generator;
pub mod http;
pub mod ir;
pub mod resolver;
pub mod utils;

pub use args::{options_from_opts, Options, DEFAULT_SUFFIX};
pub use error::{Error, Result};
pub use generator::{build_file, output_name, Generator};
pub use ir::{
    FileIr, ImportRef, MessageRef, MethodIr, ScalarType, ServiceIr, TypeDescriptor, TypeKind, Verb,
};
pub use utils::{split_escaped, Request};
