//! In-memory descriptor sets for the integration tests.
//!
//! `prost_types::MethodOptions` cannot carry extensions, so user files are encoded through the
//! small `Test*` messages below, which keep the `google.api.http` option as a regular field.

#![allow(dead_code)]

use prost::Message;
use prost_types::descriptor_proto::ExtensionRange;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::source_code_info::Location;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MessageOptions, OneofDescriptorProto, SourceCodeInfo,
};
use protoc_gen_http::annotations::{CustomHttpPattern, HttpRule};
use protoc_gen_http::Request;

pub const ITEMS: &str = "shop/v1/items.proto";
pub const COMMON: &str = "shop/v1/common.proto";
pub const ORDERS: &str = "shop/v1/orders.proto";

#[derive(Clone, PartialEq, Message)]
pub struct TestFile {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub package: Option<String>,
    #[prost(string, repeated, tag = "3")]
    pub dependency: Vec<String>,
    #[prost(message, repeated, tag = "4")]
    pub message_type: Vec<DescriptorProto>,
    #[prost(message, repeated, tag = "5")]
    pub enum_type: Vec<EnumDescriptorProto>,
    #[prost(message, repeated, tag = "6")]
    pub service: Vec<TestService>,
    #[prost(message, optional, tag = "9")]
    pub source_code_info: Option<SourceCodeInfo>,
    #[prost(string, optional, tag = "12")]
    pub syntax: Option<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TestService {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    pub method: Vec<TestMethod>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TestMethod {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub input_type: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub output_type: Option<String>,
    #[prost(message, optional, tag = "4")]
    pub options: Option<TestMethodOptions>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TestMethodOptions {
    #[prost(message, optional, tag = "72295728")]
    pub http: Option<HttpRule>,
}

pub fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.into()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

pub fn typed(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto { type_name: Some(type_name.into()), ..field(name, number, ty) }
}

pub fn repeated(field: FieldDescriptorProto) -> FieldDescriptorProto {
    FieldDescriptorProto { label: Some(Label::Repeated as i32), ..field }
}

pub fn message(name: &str, field: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto { name: Some(name.into()), field, ..Default::default() }
}

/// Nested `<Name>Entry` message as protoc emits it for a `map<K, V>` field
pub fn map_entry(
    name: &str,
    key: FieldDescriptorProto,
    value: FieldDescriptorProto,
) -> DescriptorProto {
    DescriptorProto {
        options: Some(MessageOptions { map_entry: Some(true), ..Default::default() }),
        ..message(name, vec![key, value])
    }
}

pub fn enumeration(name: &str, values: &[&str]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.into()),
        value: values
            .iter()
            .zip(0..)
            .map(|(value, number)| EnumValueDescriptorProto {
                name: Some(value.to_string()),
                number: Some(number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub fn method(name: &str, input: &str, output: &str, http: Option<HttpRule>) -> TestMethod {
    TestMethod {
        name: Some(name.into()),
        input_type: Some(input.into()),
        output_type: Some(output.into()),
        options: http.map(|http| TestMethodOptions { http: Some(http) }),
    }
}

pub fn service(name: &str, method: Vec<TestMethod>) -> TestService {
    TestService { name: Some(name.into()), method }
}

pub fn get(path: &str) -> HttpRule {
    HttpRule { get: path.into(), ..Default::default() }
}

pub fn delete(path: &str) -> HttpRule {
    HttpRule { delete: path.into(), ..Default::default() }
}

pub fn post(path: &str, body: &str) -> HttpRule {
    HttpRule { post: path.into(), body: body.into(), ..Default::default() }
}

pub fn put(path: &str, body: &str) -> HttpRule {
    HttpRule { put: path.into(), body: body.into(), ..Default::default() }
}

pub fn custom(kind: &str, path: &str) -> HttpRule {
    HttpRule {
        custom: Some(CustomHttpPattern { kind: kind.into(), path: path.into() }),
        ..Default::default()
    }
}

pub fn comment(path: Vec<i32>, leading: &str) -> Location {
    Location { path, leading_comments: Some(leading.into()), ..Default::default() }
}

/// `shop/v1/common.proto`, defining `shop.v1.Empty`
pub fn common_file() -> TestFile {
    TestFile {
        name: Some(COMMON.into()),
        package: Some("shop.v1".into()),
        message_type: vec![message("Empty", vec![])],
        syntax: Some("proto3".into()),
        ..Default::default()
    }
}

/// `shop/v1/items.proto` with every message the tests bind, and the given services
pub fn items_file(service: Vec<TestService>) -> TestFile {
    let item = DescriptorProto {
        nested_type: vec![message("Part", vec![field("sku", 1, Type::String)])],
        enum_type: vec![enumeration("Kind", &["KIND_UNSPECIFIED", "KIND_BOOK"])],
        ..message(
            "Item",
            vec![
                field("id", 1, Type::String),
                field("name", 2, Type::String),
                typed("kind", 3, Type::Enum, ".shop.v1.Item.Kind"),
                repeated(typed("parts", 4, Type::Message, ".shop.v1.Item.Part")),
            ],
        )
    };

    let body_request = DescriptorProto {
        nested_type: vec![
            map_entry("LabelsEntry", field("key", 1, Type::String), field("value", 2, Type::Int32)),
            map_entry(
                "PartsEntry",
                field("key", 1, Type::String),
                typed("value", 2, Type::Message, ".shop.v1.Item.Part"),
            ),
            map_entry(
                "ByKindEntry",
                field("key", 1, Type::Int32),
                typed("value", 2, Type::Enum, ".shop.v1.Item.Kind"),
            ),
        ],
        ..message(
            "BodyRequest",
            vec![
                field("id", 1, Type::String),
                repeated(field("tags", 2, Type::String)),
                repeated(typed("items", 3, Type::Message, ".shop.v1.Item")),
                repeated(typed("pairs", 4, Type::Message, ".shop.v1.Pair")),
                repeated(typed("labels", 5, Type::Message, ".shop.v1.BodyRequest.LabelsEntry")),
                repeated(typed("parts", 6, Type::Message, ".shop.v1.BodyRequest.PartsEntry")),
                repeated(typed("by_kind", 7, Type::Message, ".shop.v1.BodyRequest.ByKindEntry")),
                repeated(typed("bad_pairs", 8, Type::Message, ".shop.v1.BadPair")),
                typed("item", 9, Type::Message, ".shop.v1.Item"),
                typed("kind", 10, Type::Enum, ".shop.v1.Item.Kind"),
                field("weight", 11, Type::Double),
                field("raw", 12, Type::Bytes),
                field("active", 13, Type::Bool),
            ],
        )
    };

    TestFile {
        name: Some(ITEMS.into()),
        package: Some("shop.v1".into()),
        dependency: vec!["google/api/annotations.proto".into(), COMMON.into()],
        message_type: vec![
            message("GetItemRequest", vec![field("id", 1, Type::String)]),
            item,
            message(
                "CreateItemRequest",
                vec![field("name", 1, Type::String), repeated(field("tags", 2, Type::String))],
            ),
            body_request,
            // Named like a map entry, fields declared value first
            message("Pair", vec![field("value", 1, Type::String), field("key", 2, Type::Int64)]),
            message("BadPair", vec![field("key", 1, Type::Bytes), field("value", 2, Type::String)]),
        ],
        service,
        syntax: Some("proto3".into()),
        ..Default::default()
    }
}

/// Single-service `items.proto` with one method taking `BodyRequest`
pub fn body_file(rule: HttpRule) -> TestFile {
    items_file(vec![service(
        "ItemService",
        vec![method("Update", ".shop.v1.BodyRequest", ".shop.v1.BodyRequest", Some(rule))],
    )])
}

/// Request carrying the annotation protos followed by `files`, generating `generate`
pub fn request(files: Vec<TestFile>, generate: &[&str]) -> Request {
    let mut proto_file = vec![
        descriptor_proto().encode_to_vec(),
        http_proto().encode_to_vec(),
        annotations_proto().encode_to_vec(),
    ];
    proto_file.extend(files.iter().map(Message::encode_to_vec));

    Request {
        file_to_generate: generate.iter().map(|name| name.to_string()).collect(),
        parameter: None,
        proto_file,
    }
}

/// Just enough of `google/protobuf/descriptor.proto` to be extended
fn descriptor_proto() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/protobuf/descriptor.proto".into()),
        package: Some("google.protobuf".into()),
        message_type: vec![DescriptorProto {
            extension_range: vec![ExtensionRange {
                start: Some(1000),
                end: Some(536_870_912),
                options: None,
            }],
            ..message("MethodOptions", vec![])
        }],
        syntax: Some("proto2".into()),
        ..Default::default()
    }
}

fn http_proto() -> FileDescriptorProto {
    let pattern =
        |field: FieldDescriptorProto| FieldDescriptorProto { oneof_index: Some(0), ..field };
    let http_rule = DescriptorProto {
        oneof_decl: vec![OneofDescriptorProto { name: Some("pattern".into()), options: None }],
        ..message(
            "HttpRule",
            vec![
                field("selector", 1, Type::String),
                pattern(field("get", 2, Type::String)),
                pattern(field("put", 3, Type::String)),
                pattern(field("post", 4, Type::String)),
                pattern(field("delete", 5, Type::String)),
                pattern(field("patch", 6, Type::String)),
                field("body", 7, Type::String),
                pattern(typed("custom", 8, Type::Message, ".google.api.CustomHttpPattern")),
                repeated(typed("additional_bindings", 11, Type::Message, ".google.api.HttpRule")),
                field("response_body", 12, Type::String),
            ],
        )
    };

    FileDescriptorProto {
        name: Some("google/api/http.proto".into()),
        package: Some("google.api".into()),
        message_type: vec![
            http_rule,
            message(
                "CustomHttpPattern",
                vec![field("kind", 1, Type::String), field("path", 2, Type::String)],
            ),
        ],
        syntax: Some("proto3".into()),
        ..Default::default()
    }
}

fn annotations_proto() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/api/annotations.proto".into()),
        package: Some("google.api".into()),
        dependency: vec!["google/api/http.proto".into(), "google/protobuf/descriptor.proto".into()],
        extension: vec![FieldDescriptorProto {
            extendee: Some(".google.protobuf.MethodOptions".into()),
            ..typed("http", 72295728, Type::Message, ".google.api.HttpRule")
        }],
        syntax: Some("proto3".into()),
        ..Default::default()
    }
}
