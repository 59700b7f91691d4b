//! Renderer-facing intermediate representation.
//!
//! Everything here is built once per plugin invocation and only read afterwards. The whole tree
//! serializes with serde so an external template stage can consume it as-is.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::utils::{build_alias, pascal_to_snake, snake_to_pascal};

/// IR for one generated proto file
#[derive(Debug, Clone, Serialize)]
pub struct FileIr {
    /// Name of the file handed back to protoc
    pub output_file: String,
    pub services: Vec<ServiceIr>,
    /// Every module the generated file needs to import, deduplicated
    pub imports: BTreeSet<ImportRef>,
    pub features: Features,
}

/// Flags telling the renderer which support code to include
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Features {
    pub has_vars: bool,
    pub has_repeated_scalar: bool,
    pub has_repeated_message: bool,
    pub has_scalar_map: bool,
    pub has_message_map: bool,
}

impl Features {
    /// Fold one method into the flags.
    pub fn add(&mut self, method: &MethodIr) {
        self.has_vars |= method.has_vars;

        let Some(body) = &method.body_type else { return };
        match &body.kind {
            TypeKind::Scalar(_) if body.repeated => self.has_repeated_scalar = true,
            TypeKind::Message(_) if body.repeated => self.has_repeated_message = true,
            TypeKind::Map { value, .. } => match **value {
                TypeKind::Scalar(_) => self.has_scalar_map = true,
                _ => self.has_message_map = true,
            },
            _ => (),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceIr {
    #[serde(flatten)]
    pub names: Names,
    /// Generated message module of the defining file, e.g. `items_pb2`
    pub entity_package: String,
    /// Path of the defining `.proto` file
    pub proto_file: String,
    pub methods: Vec<MethodIr>,
    pub comment: Option<Vec<String>>,
    /// Position of the service in its file descriptor
    #[serde(skip)]
    pub index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodIr {
    #[serde(flatten)]
    pub names: Names,
    pub verb: Verb,
    pub path: String,
    pub request: TypeDescriptor,
    pub response: TypeDescriptor,
    /// Request field bound to the body; `None` when the whole request is the body
    pub body: Option<String>,
    pub body_type: Option<TypeDescriptor>,
    pub response_body: Option<String>,
    pub response_body_type: Option<TypeDescriptor>,
    pub has_body: bool,
    /// Whether `path` contains a `{var}` placeholder
    pub has_vars: bool,
    pub comment: Option<Vec<String>>,
    /// Position of the method in its service descriptor
    #[serde(skip)]
    pub index: usize,
}

impl MethodIr {
    /// All type descriptors the method references, in request/response/body/response-body order
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        [
            Some(&self.request),
            Some(&self.response),
            self.body_type.as_ref(),
            self.response_body_type.as_ref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// A proto identifier in the three forms templates need
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Names {
    pub name: String,
    pub snake_case_name: String,
    pub pascal_case_name: String,
}

impl Names {
    pub fn new(name: &str) -> Self {
        let snake_case_name = pascal_to_snake(name);
        let pascal_case_name = snake_to_pascal(&snake_case_name);
        Self { name: name.to_owned(), snake_case_name, pascal_case_name }
    }
}

/// HTTP verb of a binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Get,
    Delete,
    Post,
    Put,
    Patch,
    Custom(String),
}

impl Verb {
    pub fn as_str(&self) -> &str {
        match self {
            Verb::Get => "get",
            Verb::Delete => "delete",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Patch => "patch",
            Verb::Custom(kind) => kind,
        }
    }

    /// `get` and `delete` carry no request body
    pub fn forbids_body(&self) -> bool {
        matches!(self, Verb::Get | Verb::Delete)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Verb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Resolved type of a message, a field, or a map entry value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    #[serde(flatten)]
    pub kind: TypeKind,
    pub repeated: bool,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind, repeated: bool) -> Self {
        Self { kind, repeated }
    }

    /// Module the renderer must import to name this type, if any.
    ///
    /// Maps import whatever their value type needs.
    pub fn import(&self) -> Option<&ImportRef> {
        self.kind.import()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum TypeKind {
    Scalar(ScalarType),
    Message(MessageRef),
    Map { key: ScalarType, value: Box<TypeKind> },
}

impl TypeKind {
    pub fn import(&self) -> Option<&ImportRef> {
        match self {
            TypeKind::Scalar(_) => None,
            TypeKind::Message(message) => Some(&message.import),
            TypeKind::Map { value, .. } => value.import(),
        }
    }
}

/// Canonical scalar names, as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Bool,
    Str,
    Bytes,
    Float,
    Int,
    Object,
}

impl ScalarType {
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Str => "str",
            ScalarType::Bytes => "bytes",
            ScalarType::Float => "float",
            ScalarType::Int => "int",
            ScalarType::Object => "object",
        }
    }

    /// Whether protobuf allows this as a map key
    pub fn is_map_key(self) -> bool {
        matches!(self, ScalarType::Bool | ScalarType::Str | ScalarType::Int)
    }
}

/// Reference to a named message or enum, living in some generated module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRef {
    #[serde(flatten)]
    pub names: Names,
    /// Path of the type inside its file, `Outer.Inner` for nested types
    pub qualified: String,
    pub import: ImportRef,
    /// Fully qualified reference through the import alias
    pub reference: String,
}

impl MessageRef {
    pub fn new(name: &str, qualified: String, import: ImportRef) -> Self {
        let reference = format!("{}.{qualified}", import.alias);
        Self { names: Names::new(name), qualified, import, reference }
    }
}

/// A module import needed by the generated file.
///
/// Identity is `(package, file)`: the module and alias are derived from those two. Files of one
/// package sharing a stem map to the same module and alias.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRef {
    pub package: String,
    /// Defining `.proto` path
    pub file: String,
    /// Generated module name, `<file stem>_pb2`
    pub module: String,
    pub alias: String,
    pub statement: String,
}

impl ImportRef {
    pub fn new(package: &str, file: &str) -> Self {
        let module = pb2_module(file);
        let alias = if package.is_empty() {
            build_alias(&module)
        } else {
            build_alias(&format!("{package}.{module}"))
        };
        let statement = if package.is_empty() {
            format!("import {module} as {alias}")
        } else {
            format!("from {package} import {module} as {alias}")
        };
        Self { package: package.to_owned(), file: file.to_owned(), module, alias, statement }
    }
}

/// Name of the message module generated for a proto file: `shop/items.proto` -> `items_pb2`
pub fn pb2_module(file: &str) -> String {
    let base = file.rsplit('/').next().unwrap_or(file);
    let stem = base.strip_suffix(".proto").unwrap_or(base);
    format!("{stem}_pb2")
}

impl PartialEq for ImportRef {
    fn eq(&self, other: &Self) -> bool {
        self.package == other.package && self.file == other.file
    }
}

impl Eq for ImportRef {}

impl Hash for ImportRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.package.hash(state);
        self.file.hash(state);
    }
}

impl PartialOrd for ImportRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ImportRef {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.package, &self.file).cmp(&(&other.package, &other.file))
    }
}
