//! Options for the protoc plugin
//!
//! Set with protoc's `--http_opt`

/// Suffix replacing `.proto` in output file names
pub const DEFAULT_SUFFIX: &str = "_pb2_http.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub suffix: String,
    /// Pretty-print the emitted IR
    pub pretty: bool,
    /// Build every file and report all failures together instead of stopping at the first
    pub report_all: bool,
    /// Emit nothing for files without any bound method
    pub skip_empty: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_owned(),
            pretty: false,
            report_all: false,
            skip_empty: false,
        }
    }
}

/// Take a list of arguments, in the form of key=value, and returns the leftovers arguments
pub fn options_from_opts(opts: Vec<String>) -> (Options, Vec<String>) {
    let mut options = Options::default();
    let mut leftovers = Vec::new();

    for opt in opts {
        match opt.splitn(2, '=').collect::<Vec<_>>().as_slice() {
            [] | [""] => (),
            ["suffix", v] if !v.is_empty() => options.suffix = v.to_string(),
            ["pretty"] => options.pretty = true,
            ["report_all"] => options.report_all = true,
            ["skip_empty"] => options.skip_empty = true,
            _ => leftovers.push(opt),
        }
    }

    (options, leftovers)
}
