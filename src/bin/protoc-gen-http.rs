use anyhow::{bail, Result};
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::CodeGeneratorResponse;
use protoc_gen_http::utils::*;
use protoc_gen_http::Generator;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter. Logs go to stderr, stdout belongs to protoc.
const LOG_ENV: &str = "PROTOC_GEN_HTTP_LOG";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let res = match gen_files() {
        Ok(file) => CodeGeneratorResponse { file, ..Default::default() },
        Err(e) => CodeGeneratorResponse { error: Some(format!("{e:?}")), ..Default::default() },
    };
    response_to_env(CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..res
    })
}

fn gen_files() -> Result<Vec<File>> {
    let req = request_from_env()?;

    let params = req.parameter.as_deref().unwrap_or_default();
    let (gen, opts) = Generator::new_from_opts(split_escaped(params, ','));
    if !opts.is_empty() {
        bail!("Unknown opts:\n - {}", opts.join("\n - "));
    }

    gen.generate(&req)
}
