use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::tpl::Tpl;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "xpi.toml";
pub const ADDON_MANIFEST: &str = "manifest.json";

pub const DEFAULT_OUTPUT: &str = "zotero-mistral-ocr.xpi";

/// Written first and in this order; some JAR readers expect the manifest up front.
pub const DEFAULT_ROOT_FILES: &[&str] = &[
    "manifest.json",
    "bootstrap.js",
    "prefs.js",
    "icon.png",
    "icon@2x.png",
];

pub const DEFAULT_DIRECTORIES: &[&str] = &["content", "locale"];

/// Contents of `xpi.toml`
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct XpiConfig {
    #[serde(default)]
    pub output: Option<String>,

    #[serde(default)]
    pub root_files: Option<Vec<String>>,

    #[serde(default)]
    pub directories: Option<Vec<String>>,

    #[serde(default)]
    pub sort: bool,
}

/// The fields of the add-on's own `manifest.json` used for templating
#[derive(Debug, Deserialize)]
pub struct AddonManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

/// Resolved packaging plan
#[derive(Debug, Clone)]
pub struct Manifest {
    pub title: String,
    pub output: String,
    pub root_files: Vec<String>,
    pub directories: Vec<String>,
    pub sort: bool,
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest {
            title: DEFAULT_OUTPUT.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            root_files: DEFAULT_ROOT_FILES.iter().map(|s| s.to_string()).collect(),
            directories: DEFAULT_DIRECTORIES.iter().map(|s| s.to_string()).collect(),
            sort: false,
        }
    }
}

impl Manifest {
    /// Load `xpi.toml` from the working directory, falling back to the
    /// built-in file lists when it is absent
    pub fn load(ctx: &Context) -> Result<Self> {
        let config_path = ctx.base_dir.join(CONFIG_FILE);
        let config = if config_path.is_file() {
            read_config(&config_path)?
        } else {
            XpiConfig::default()
        };
        Self::resolve(ctx, config)
    }

    /// Load an explicitly named configuration file, which must exist
    pub fn load_with_config(ctx: &Context, path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.display().to_string()));
        }
        Self::resolve(ctx, read_config(path)?)
    }

    fn resolve(ctx: &Context, config: XpiConfig) -> Result<Self> {
        let defaults = Manifest::default();
        let addon = read_addon_manifest(&ctx.base_dir.join(ADDON_MANIFEST));

        let mut tpl = Tpl::new();
        if let Some(addon) = &addon {
            if let Some(name) = &addon.name {
                tpl.register("NAME", name);
            }
            if let Some(version) = &addon.version {
                tpl.register("VERSION", version);
            }
        }

        let output = config
            .output
            .map(|o| tpl.parse(&o))
            .unwrap_or(defaults.output);
        if output.trim().is_empty() {
            return Err(Error::InvalidConfig("`output` must not be empty".to_string()));
        }

        let title = match addon {
            Some(AddonManifest {
                name: Some(name),
                version: Some(version),
            }) => format!("{name} {version}"),
            Some(AddonManifest { name: Some(name), .. }) => name,
            _ => output.clone(),
        };

        Ok(Manifest {
            title,
            output,
            root_files: config.root_files.unwrap_or(defaults.root_files),
            directories: config.directories.unwrap_or(defaults.directories),
            sort: config.sort,
        })
    }
}

fn read_config(path: &Path) -> Result<XpiConfig> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

// Contents are not validated: an unreadable manifest only disables templating.
fn read_addon_manifest(path: &Path) -> Option<AddonManifest> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(addon) => Some(addon),
        Err(err) => {
            eprintln!("WARNING: {}", Error::Json(err));
            None
        }
    }
}
