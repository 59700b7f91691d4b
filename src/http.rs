//! Build [`MethodIr`] from a method's `google.api.http` binding.

use prost_reflect::{MessageDescriptor, MethodDescriptor};
use tracing::debug;

use crate::annotations::HttpRules;
use crate::ir::{MethodIr, Names, TypeDescriptor};
use crate::resolver::TypeResolver;
use crate::{Error, Result};

/// `body` value binding the whole request message
const WHOLE_BODY: &str = "*";

pub struct HttpRuleBuilder<'a> {
    resolver: TypeResolver<'a>,
    rules: &'a HttpRules,
}

impl<'a> HttpRuleBuilder<'a> {
    pub fn new(resolver: TypeResolver<'a>, rules: &'a HttpRules) -> Self {
        Self { resolver, rules }
    }

    /// Build the IR of one method.
    ///
    /// `Ok(None)` means the method has no usable binding and is left out of the output. A binding
    /// that breaks the body rules is an error.
    pub fn build(&self, method: &MethodDescriptor) -> Result<Option<MethodIr>> {
        let Some(rule) = self.rules.get(method) else {
            debug!(method = method.full_name(), "no http annotation, skipping");
            return Ok(None);
        };
        let Some((verb, path)) = rule.binding() else {
            debug!(method = method.full_name(), "http annotation has no usable pattern, skipping");
            return Ok(None);
        };

        let input = method.input();
        let output = method.output();
        let request = self.resolver.resolve_message(input.full_name())?;
        let response = self.resolver.resolve_message(output.full_name())?;

        let (body, body_type) = match rule.body.as_str() {
            "" => (None, None),
            WHOLE_BODY => (None, Some(request.clone())),
            field => (Some(field.to_owned()), Some(self.field_type(&input, field)?)),
        };
        let has_body = body_type.is_some();

        if verb.forbids_body() && has_body {
            return Err(Error::InvalidBodyDeclaration {
                verb: verb.to_string(),
                path: path.to_owned(),
            });
        }
        if !verb.forbids_body() && !has_body {
            return Err(Error::MissingBodyDeclaration {
                verb: verb.to_string(),
                path: path.to_owned(),
            });
        }

        let (response_body, response_body_type) = match rule.response_body.as_str() {
            "" => (None, None),
            field => (Some(field.to_owned()), Some(self.field_type(&output, field)?)),
        };

        Ok(Some(MethodIr {
            names: Names::new(method.name()),
            verb,
            path: path.to_owned(),
            has_vars: has_path_vars(path),
            request,
            response,
            body,
            body_type,
            response_body,
            response_body_type,
            has_body,
            comment: None,
            index: method.index(),
        }))
    }

    fn field_type(&self, message: &MessageDescriptor, field: &str) -> Result<TypeDescriptor> {
        let descriptor = message.get_field_by_name(field).ok_or_else(|| Error::FieldNotFound {
            message: message.full_name().to_owned(),
            field: field.to_owned(),
        })?;
        self.resolver.resolve_field(&descriptor)
    }
}

/// Whether a path pattern has a `{...}` variable
pub fn has_path_vars(path: &str) -> bool {
    path.find('{').is_some_and(|open| path[open..].contains('}'))
}
