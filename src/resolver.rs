//! Type resolution: turn message symbols and field descriptors into [`TypeDescriptor`]s.

use prost_reflect::{
    Cardinality, DescriptorPool, FieldDescriptor, FileDescriptor, Kind, MessageDescriptor,
};
use tracing::trace;

use crate::ir::{ImportRef, MessageRef, ScalarType, TypeDescriptor, TypeKind};
use crate::{Error, Result};

/// Resolves types against a fully populated, read-only descriptor pool
#[derive(Clone, Copy)]
pub struct TypeResolver<'a> {
    pool: &'a DescriptorPool,
}

impl<'a> TypeResolver<'a> {
    pub fn new(pool: &'a DescriptorPool) -> Self {
        Self { pool }
    }

    /// Resolve a fully qualified message or enum name, with or without the leading `.`
    pub fn resolve_message(&self, symbol: &str) -> Result<TypeDescriptor> {
        let symbol = symbol.strip_prefix('.').unwrap_or(symbol);

        let named = if let Some(message) = self.pool.get_message_by_name(symbol) {
            named_ref(message.name(), message.full_name(), &message.parent_file())
        } else if let Some(enumeration) = self.pool.get_enum_by_name(symbol) {
            named_ref(enumeration.name(), enumeration.full_name(), &enumeration.parent_file())
        } else {
            return Err(Error::SymbolNotFound(symbol.to_owned()));
        };

        trace!(symbol, reference = %named.reference, "resolved message");
        Ok(TypeDescriptor::new(TypeKind::Message(named), false))
    }

    /// Resolve the type of a field, classifying it once as scalar, map or named type.
    ///
    /// Map fields are never reported as repeated, even though protobuf encodes them as repeated
    /// entry messages. A map whose value leads back to one of its enclosing entries is an error.
    pub fn resolve_field(&self, field: &FieldDescriptor) -> Result<TypeDescriptor> {
        self.resolve_field_within(field, &mut Vec::new())
    }

    /// `entries` holds the full names of the map entries being resolved around `field`
    fn resolve_field_within(
        &self,
        field: &FieldDescriptor,
        entries: &mut Vec<String>,
    ) -> Result<TypeDescriptor> {
        let repeated = field.cardinality() == Cardinality::Repeated;

        let resolved = match field.kind() {
            Kind::Message(message) => match map_entry(&message) {
                Some((key, value)) => {
                    if entries.iter().any(|entry| entry == message.full_name()) {
                        return Err(Error::RecursiveMap {
                            field: field.full_name().to_owned(),
                            entry: message.full_name().to_owned(),
                        });
                    }
                    let key_type = scalar_type(&key.kind());
                    if !key_type.is_map_key() {
                        return Err(Error::InvalidMapKey {
                            field: field.full_name().to_owned(),
                            kind: kind_name(&key.kind()),
                        });
                    }

                    entries.push(message.full_name().to_owned());
                    let value = self.resolve_field_within(&value, entries)?;
                    entries.pop();

                    let kind = TypeKind::Map { key: key_type, value: Box::new(value.kind) };
                    TypeDescriptor::new(kind, false)
                }
                None => TypeDescriptor { repeated, ..self.resolve_message(message.full_name())? },
            },
            Kind::Enum(enumeration) => {
                TypeDescriptor { repeated, ..self.resolve_message(enumeration.full_name())? }
            }
            kind => TypeDescriptor::new(TypeKind::Scalar(scalar_type(&kind)), repeated),
        };

        trace!(field = field.full_name(), ?resolved, "resolved field");
        Ok(resolved)
    }
}

/// Build the reference to a named type defined in `file`
fn named_ref(name: &str, full_name: &str, file: &FileDescriptor) -> MessageRef {
    let package = file.package_name();
    let qualified = match package {
        "" => full_name,
        package => full_name
            .strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(full_name),
    };
    MessageRef::new(name, qualified.to_owned(), ImportRef::new(package, file.name()))
}

/// A message with exactly two fields, `key` and `value`, in any order is a map entry.
fn map_entry(message: &MessageDescriptor) -> Option<(FieldDescriptor, FieldDescriptor)> {
    if message.fields().len() != 2 {
        return None;
    }
    Some((message.get_field_by_name("key")?, message.get_field_by_name("value")?))
}

fn scalar_type(kind: &Kind) -> ScalarType {
    match kind {
        Kind::Bool => ScalarType::Bool,
        Kind::String => ScalarType::Str,
        Kind::Bytes => ScalarType::Bytes,
        Kind::Double | Kind::Float => ScalarType::Float,
        Kind::Int32
        | Kind::Int64
        | Kind::Uint32
        | Kind::Uint64
        | Kind::Sint32
        | Kind::Sint64
        | Kind::Fixed32
        | Kind::Fixed64
        | Kind::Sfixed32
        | Kind::Sfixed64 => ScalarType::Int,
        Kind::Message(_) | Kind::Enum(_) => ScalarType::Object,
    }
}

fn kind_name(kind: &Kind) -> String {
    match kind {
        Kind::Message(message) => message.full_name().to_owned(),
        Kind::Enum(enumeration) => enumeration.full_name().to_owned(),
        kind => format!("{kind:?}").to_lowercase(),
    }
}
