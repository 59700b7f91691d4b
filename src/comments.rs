//! Attach proto source comments to services and methods.

use std::collections::BTreeMap;

use prost_types::source_code_info::Location;
use prost_types::{FileDescriptorProto, SourceCodeInfo};

use crate::ir::ServiceIr;

/// Used for a documented element whose location carries no comment at all
pub const MISSING_COMMENT: &str = "Missing associated documentation comment in .proto file.";

/// `FileDescriptorProto.service`
const SERVICE_FIELD: i32 = 6;
/// `ServiceDescriptorProto.method`
const METHOD_FIELD: i32 = 2;

/// Comment lines keyed by source location path, paragraphs separated by an empty line.
#[derive(Debug, Default)]
pub struct Comments {
    by_path: BTreeMap<Vec<i32>, Vec<String>>,
}

impl Comments {
    pub fn new(info: Option<&SourceCodeInfo>) -> Self {
        let by_path = info
            .into_iter()
            .flat_map(|info| &info.location)
            .filter(|location| is_documented(&location.path))
            .map(|location| (location.path.clone(), paragraphs(location)))
            .collect();
        Self { by_path }
    }

    pub fn service(&self, service: usize) -> Option<&[String]> {
        self.get(&[SERVICE_FIELD, service as i32])
    }

    pub fn method(&self, service: usize, method: usize) -> Option<&[String]> {
        self.get(&[SERVICE_FIELD, service as i32, METHOD_FIELD, method as i32])
    }

    fn get(&self, path: &[i32]) -> Option<&[String]> {
        self.by_path.get(path).map(Vec::as_slice)
    }
}

/// Set the comment of every service and method that has a source location.
///
/// Lookups go by descriptor index, so methods dropped from the IR do not shift the others.
pub fn attach(file: &FileDescriptorProto, services: &mut [ServiceIr]) {
    let comments = Comments::new(file.source_code_info.as_ref());

    for service in services {
        if let Some(comment) = comments.service(service.index) {
            service.comment = Some(comment.to_vec());
        }
        for method in &mut service.methods {
            if let Some(comment) = comments.method(service.index, method.index) {
                method.comment = Some(comment.to_vec());
            }
        }
    }
}

fn is_documented(path: &[i32]) -> bool {
    matches!(path, [SERVICE_FIELD, _] | [SERVICE_FIELD, _, METHOD_FIELD, _])
}

/// Detached comments each make a paragraph; leading and trailing comments share the last one.
fn paragraphs(location: &Location) -> Vec<String> {
    let mut lines = Vec::new();
    let mut add_paragraph = |paragraph: Vec<&str>| {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(paragraph.into_iter().map(|line| line.trim().to_owned()));
    };

    for detached in &location.leading_detached_comments {
        add_paragraph(split_lines(detached).collect());
    }

    let attached: Vec<_> = [location.leading_comments(), location.trailing_comments()]
        .into_iter()
        .filter(|comment| !comment.is_empty())
        .flat_map(split_lines)
        .collect();
    if !attached.is_empty() {
        add_paragraph(attached);
    }

    if lines.is_empty() {
        lines.push(MISSING_COMMENT.to_owned());
    }
    lines
}

fn split_lines(comment: &str) -> impl Iterator<Item = &str> {
    comment.trim_end_matches('\n').split('\n')
}
