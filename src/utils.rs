use std::io::{Read, Write};

use anyhow::{Context, Result};
use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::compiler::CodeGeneratorResponse;

use crate::annotations::HttpRules;

/// `CodeGeneratorRequest` with the proto files left encoded.
///
/// Decoding them through `prost_types::FileDescriptorProto` would drop the method option
/// extensions, so they are handed to `prost_reflect` as raw bytes instead.
#[derive(Clone, PartialEq, Message)]
pub struct Request {
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    #[prost(bytes = "vec", repeated, tag = "15")]
    pub proto_file: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
struct RawFileDescriptorSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

impl Request {
    /// Register every proto file of the request, dependencies included, in one pool.
    pub fn descriptor_pool(&self) -> crate::Result<DescriptorPool> {
        let set = RawFileDescriptorSet { file: self.proto_file.clone() };
        Ok(DescriptorPool::decode(set.encode_to_vec().as_slice())?)
    }

    /// Read the `(google.api.http)` option of every method in the request
    pub fn http_rules(&self) -> crate::Result<HttpRules> {
        HttpRules::decode(&self.proto_file)
    }
}

/// Read the plugin request protoc writes on stdin
pub fn request_from_env() -> Result<Request> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf).context("Failed to read stdin")?;
    Request::decode(buf.as_slice()).context("Failed to decode CodeGeneratorRequest")
}

/// Write the plugin response back to protoc on stdout
pub fn response_to_env(res: CodeGeneratorResponse) -> Result<()> {
    let buf = res.encode_to_vec();
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&buf).context("Failed to write response to stdout")?;
    stdout.flush().context("Failed to flush stdout")
}

/// Split a string by a char separator, but not when the separator is preceded by a `\`
pub fn split_escaped(string: &str, sep: char) -> Vec<String> {
    let mut ret = Vec::new();
    let mut full_substr = String::new();

    for substr in string.split(sep) {
        if let Some(substr) = substr.strip_suffix('\\') {
            full_substr.push_str(substr);
            full_substr.push(sep);
        } else {
            ret.push(full_substr + substr);
            full_substr = String::new();
        }
    }

    ret
}

/// `GetItem` -> `get_item`. Every uppercase letter past the first starts a new word.
pub fn pascal_to_snake(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            snake.push('_');
        }
        snake.extend(c.to_lowercase());
    }
    snake
}

/// `get_item` -> `GetItem`. Each word gets its first letter uppercased and the rest lowercased.
pub fn snake_to_pascal(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Turn a dotted module path into a flat identifier usable as an import alias.
///
/// Underscores are doubled before dots become `_dot_`, so `a_b.c` and `a.b_c` can never meet.
pub fn build_alias(path: &str) -> String {
    path.replace('_', "__").replace('.', "_dot_")
}
