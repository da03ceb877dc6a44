//! 🔧 App Configuration: the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." (every developer at 3am) 🦆
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::parsers::ContentfulParserConfig;
use crate::sources::FileSourceConfig;

/// 📦 Everything one parse run needs: where to look, how to read, what to keep.
///
/// ```toml
/// urls = ["/exports/contentful.json"]
///
/// [source_config.File]
/// item_selector = "entries"
///
/// [parser_config]
/// content_type = "news"
/// with_alerts = true
/// ```
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 📚 Exports to parse, in order. Results are concatenated.
    #[serde(default)]
    pub urls: Vec<String>,
    pub source_config: SourceConfig,
    #[serde(default)]
    pub parser_config: ContentfulParserConfig,
}

/// 🎭 Which source backend fetches the exports. Externally tagged, like `[source_config.File]`.
#[derive(Debug, Deserialize, Clone)]
pub enum SourceConfig {
    File(FileSourceConfig),
}

/// 🚀 Load the config from env vars (CFX_*) and, optionally, a TOML file.
///
/// - `None`: env vars only. No file. No assumptions.
/// - `Some(path)`: env vars + TOML, merged. TOML wins on conflicts.
///
/// 💀 Returns an error if the merged config doesn't deserialize. The message
/// names the file (if any) so you know which haystack to search.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    // 🏗️ env vars as the base layer. nested keys use double underscores: CFX_PARSER_CONFIG__CONTENT_TYPE
    let config = Figment::new().merge(Env::prefixed("CFX_").split("__"));

    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (CFX_*). \
             The file exists in our hearts, but apparently not in a shape serde likes.",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (CFX_*). \
                 No file was provided, so this one's all on the environment. Classic."
            .to_string(),
    };

    config.extract().context(context_msg)
}
