//! Settings for the h_sharp transpiler.
//!
//! The base layer is `defaults/h_sharp.default.toml`, compiled into the crate.
//! The CLI stacks `./h_sharp.toml`, an explicit `--config` file and its own flags
//! on top of it, in that order.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use h_sharp::TranspileOptions;
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/h_sharp.default.toml");

/// Name of the project-local config file picked up when present.
pub const LOCAL_CONFIG_FILE: &str = "h_sharp.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HSharpConfig {
    pub transpile: TranspileOptions,
    pub output: OutputConfig,
}

/// File naming for sources and generated output.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub source_extension: String,
    pub target_extension: String,
}

/// Builds an [`HSharpConfig`] from the embedded defaults plus whatever TOML
/// files and overrides the caller stacks on top. Later layers win.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Add a TOML file that must exist, e.g. one named by `--config`.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer_toml(path.as_ref(), true)
    }

    /// Add a TOML file only if it is there, e.g. the project-local `h_sharp.toml`.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer_toml(path.as_ref(), false)
    }

    /// Force `key` (dotted, such as `transpile.brace_style`) to `value`.
    pub fn set_override<I>(self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        let builder = self.builder.set_override(key, value)?;
        Ok(Self { builder })
    }

    /// Merge every layer and deserialize it. Unknown brace styles and
    /// malformed files surface here.
    pub fn build(self) -> Result<HSharpConfig, ConfigError> {
        let merged = self.builder.build()?;
        merged.try_deserialize()
    }

    fn layer_toml(self, path: &Path, required: bool) -> Self {
        let file = File::from(path).format(FileFormat::Toml).required(required);
        Self {
            builder: self.builder.add_source(file),
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults with nothing layered on top.
pub fn load_defaults() -> Result<HSharpConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use h_sharp::BraceStyle;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.transpile, TranspileOptions::default());
        assert_eq!(config.output.source_extension, "hss");
        assert_eq!(config.output.target_extension, "htvm");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("transpile.brace_style", "own-line")
            .expect("override to apply")
            .set_override("transpile.comment_marker", "//")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.transpile.brace_style, BraceStyle::OwnLine);
        assert_eq!(config.transpile.comment_marker, "//");
        assert_eq!(config.transpile.open_brace, "{");
    }

    #[test]
    fn layers_user_file_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[transpile]\nescape_char = \"~\"\n\n[output]\ntarget_extension = \"ahk\"")
            .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.transpile.escape_char, '~');
        assert_eq!(config.transpile.comment_marker, ";");
        assert_eq!(config.output.target_extension, "ahk");
        assert_eq!(config.output.source_extension, "hss");
    }

    #[test]
    fn override_beats_file_layer() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[transpile]\nbrace_style = \"stripped\"").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .set_override("transpile.brace_style", "cuddled")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.transpile.brace_style, BraceStyle::Cuddled);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("definitely/not/here/h_sharp.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.output.target_extension, "htvm");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new()
            .with_file("definitely/not/here/h_sharp.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_brace_style() {
        let result = Loader::new()
            .set_override("transpile.brace_style", "allman")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
