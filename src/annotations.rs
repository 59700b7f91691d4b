//! `google.api.http` method annotations.
//!
//! The messages mirror `google/api/http.proto`, except the verb fields are not a oneof: a rule
//! decoded from the wire keeps every verb that was set, and [`HttpRule::binding`] picks one.
//! Rules are read straight from the encoded file descriptors for that reason. Going through a
//! descriptor pool would decode them against the real oneof and keep only the last verb.

use std::collections::HashMap;

use prost::Message;
use prost_reflect::MethodDescriptor;

use crate::ir::Verb;
use crate::Result;

#[derive(Clone, PartialEq, Message)]
pub struct HttpRule {
    #[prost(string, tag = "1")]
    pub selector: String,
    #[prost(string, tag = "2")]
    pub get: String,
    #[prost(string, tag = "3")]
    pub put: String,
    #[prost(string, tag = "4")]
    pub post: String,
    #[prost(string, tag = "5")]
    pub delete: String,
    #[prost(string, tag = "6")]
    pub patch: String,
    #[prost(message, optional, tag = "8")]
    pub custom: Option<CustomHttpPattern>,
    #[prost(string, tag = "7")]
    pub body: String,
    #[prost(string, tag = "12")]
    pub response_body: String,
    #[prost(message, repeated, tag = "11")]
    pub additional_bindings: Vec<HttpRule>,
}

#[derive(Clone, PartialEq, Message)]
pub struct CustomHttpPattern {
    #[prost(string, tag = "1")]
    pub kind: String,
    #[prost(string, tag = "2")]
    pub path: String,
}

impl HttpRule {
    /// Pick the verb and path pattern of this rule.
    ///
    /// Verbs are tried in order `get`, `delete`, `post`, `put`, `patch`, then a custom pattern.
    /// `None` when nothing is set or the custom pattern has no kind.
    pub fn binding(&self) -> Option<(Verb, &str)> {
        let standard = [
            (Verb::Get, &self.get),
            (Verb::Delete, &self.delete),
            (Verb::Post, &self.post),
            (Verb::Put, &self.put),
            (Verb::Patch, &self.patch),
        ];
        if let Some((verb, path)) = standard.into_iter().find(|(_, path)| !path.is_empty()) {
            return Some((verb, path.as_str()));
        }

        self.custom
            .as_ref()
            .filter(|custom| !custom.kind.is_empty())
            .map(|custom| (Verb::Custom(custom.kind.clone()), custom.path.as_str()))
    }
}

// Just the path from a file descriptor down to the method options, with `google.api.http`
// (extension 72295728) as a plain field.

#[derive(Clone, PartialEq, Message)]
struct RawFile {
    #[prost(string, tag = "1")]
    name: String,
    #[prost(message, repeated, tag = "6")]
    service: Vec<RawService>,
}

#[derive(Clone, PartialEq, Message)]
struct RawService {
    #[prost(message, repeated, tag = "2")]
    method: Vec<RawMethod>,
}

#[derive(Clone, PartialEq, Message)]
struct RawMethod {
    #[prost(message, optional, tag = "4")]
    options: Option<RawMethodOptions>,
}

#[derive(Clone, PartialEq, Message)]
struct RawMethodOptions {
    #[prost(message, optional, tag = "72295728")]
    http: Option<HttpRule>,
}

/// Every `(google.api.http)` option of a request, keyed by file, service index and method index
#[derive(Debug, Clone, Default)]
pub struct HttpRules {
    by_method: HashMap<(String, usize, usize), HttpRule>,
}

impl HttpRules {
    /// Collect the rules of encoded `FileDescriptorProto`s
    pub fn decode(files: &[Vec<u8>]) -> Result<Self> {
        let mut by_method = HashMap::new();
        for file in files {
            let file = RawFile::decode(file.as_slice())?;
            for (s, service) in file.service.into_iter().enumerate() {
                for (m, method) in service.method.into_iter().enumerate() {
                    if let Some(rule) = method.options.and_then(|options| options.http) {
                        by_method.insert((file.name.clone(), s, m), rule);
                    }
                }
            }
        }
        Ok(Self { by_method })
    }

    /// The rule set on `method`, if any
    pub fn get(&self, method: &MethodDescriptor) -> Option<&HttpRule> {
        let service = method.parent_service();
        let key = (service.parent_file().name().to_owned(), service.index(), method.index());
        self.by_method.get(&key)
    }
}
