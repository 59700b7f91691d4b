//! Main code generator module.

use anyhow::{bail, Context};
use itertools::Itertools;
use prost_reflect::{DescriptorPool, FileDescriptor};
use prost_types::compiler::code_generator_response::File;
use tracing::info;

use crate::annotations::HttpRules;
use crate::args::{options_from_opts, Options};
use crate::comments;
use crate::http::HttpRuleBuilder;
use crate::ir::{pb2_module, FileIr, Features, Names, ServiceIr};
use crate::resolver::TypeResolver;
use crate::utils::Request;
use crate::Result;

/// HTTP binding generator
///
/// Resolves every file protoc asks for into a [`FileIr`] and emits it as JSON for the renderer.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    pub options: Options,
}

impl Generator {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Create a new generator from a list of options, as given by protoc directly
    pub fn new_from_opts(opts: Vec<String>) -> (Self, Vec<String>) {
        let (options, leftovers) = options_from_opts(opts);
        (Self::new(options), leftovers)
    }

    /// Generate one output file per file to generate, in request order
    pub fn generate(&self, request: &Request) -> anyhow::Result<Vec<File>> {
        let pool = request.descriptor_pool().context("Failed to build descriptor pool")?;
        let rules = request.http_rules().context("Failed to read http annotations")?;

        let mut files = Vec::new();
        let mut failures = Vec::new();
        for name in &request.file_to_generate {
            let file = pool
                .get_file_by_name(name)
                .with_context(|| format!("{name} is not part of the request's proto files"))?;

            let ir = match build_file(&file, &pool, &rules, &self.options.suffix) {
                Ok(ir) => ir,
                Err(e) if self.options.report_all => {
                    failures.push(format!("{name}: {e}"));
                    continue;
                }
                Err(e) => return Err(e).with_context(|| format!("Failed to generate {name}")),
            };

            let methods: usize = ir.services.iter().map(|service| service.methods.len()).sum();
            if methods == 0 && self.options.skip_empty {
                info!(file = name.as_str(), "no http bindings, skipping");
                continue;
            }
            info!(file = name.as_str(), output = ir.output_file.as_str(), methods, "generated");
            files.push(self.render(&ir).with_context(|| format!("Failed to render {name}"))?);
        }

        if !failures.is_empty() {
            bail!("{} file(s) failed:\n - {}", failures.len(), failures.iter().join("\n - "));
        }

        Ok(files)
    }

    fn render(&self, ir: &FileIr) -> Result<File> {
        let content = if self.options.pretty {
            serde_json::to_string_pretty(ir)?
        } else {
            serde_json::to_string(ir)?
        };
        Ok(File {
            name: Some(ir.output_file.clone()),
            content: Some(content),
            ..Default::default()
        })
    }
}

/// Resolve one proto file into its IR.
///
/// Services come out in descriptor order and are kept even when none of their methods has a
/// binding. Imports sharing an alias are kept once. Fails on the first method breaking a binding
/// rule.
pub fn build_file(
    file: &FileDescriptor,
    pool: &DescriptorPool,
    rules: &HttpRules,
    suffix: &str,
) -> Result<FileIr> {
    let builder = HttpRuleBuilder::new(TypeResolver::new(pool), rules);

    let mut services = Vec::new();
    for service in file.services() {
        let mut methods = Vec::new();
        for method in service.methods() {
            if let Some(method) = builder.build(&method)? {
                methods.push(method);
            }
        }

        services.push(ServiceIr {
            names: Names::new(service.name()),
            entity_package: pb2_module(file.name()),
            proto_file: file.name().to_owned(),
            methods,
            comment: None,
            index: service.index(),
        });
    }

    comments::attach(file.file_descriptor_proto(), &mut services);

    let methods = services.iter().flat_map(|service| &service.methods);
    let imports = methods
        .clone()
        .flat_map(|method| method.types())
        .filter_map(|ty| ty.import())
        .unique_by(|import| import.alias.clone())
        .cloned()
        .collect();
    let features = methods.fold(Features::default(), |mut features, method| {
        features.add(method);
        features
    });

    Ok(FileIr { output_file: output_name(file.name(), suffix), services, imports, features })
}

/// `shop/items.proto` -> `shop/items<suffix>`
pub fn output_name(proto: &str, suffix: &str) -> String {
    format!("{}{suffix}", proto.strip_suffix(".proto").unwrap_or(proto))
}
