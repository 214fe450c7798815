use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

use crate::prober::DocumentCategory;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(alias = "data_source")]
    pub data: Option<String>,
    #[serde(alias = "documents")]
    pub docs: Option<String>,
    pub docs_href: Option<String>,
    pub title: Option<String>,
    pub concurrency: Option<u32>,
    pub rate: Option<u32>,
    pub timeout: Option<usize>,
    pub workers: Option<usize>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub expanded: Option<bool>,
    pub no_color: Option<bool>,
    pub categories: Option<Vec<DocumentCategory>>,
}

fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .iter()
        .find_map(|key| env::var_os(key))
        .map(PathBuf::from)
        .or_else(|| {
            let mut home = PathBuf::from(env::var_os("HOMEDRIVE")?);
            home.push(env::var_os("HOMEPATH")?);
            Some(home)
        })
}

/// `~/.staffdir/config.yml`, when a home directory can be found.
pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".staffdir").join("config.yml"))
}

/// Expands a leading `~` to the home directory; other paths pass through.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path {
        "~" => Some(""),
        _ => path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")),
    };
    match (rest, home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).display().to_string()
}

/// Reads a YAML config. A missing file yields the empty config only when
/// `allow_missing` is set (the implicit default location).
pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if allow_missing {
                return Ok(ConfigFile::default());
            }
            return Err(format!("no config at '{}'", path.display()));
        }
        Err(e) => return Err(format!("cannot read config '{}': {e}", path.display())),
    };
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&contents)
        .map_err(|e| format!("invalid config '{}': {e}", path.display()))
}

fn default_config_yaml() -> String {
    r#"# staffdir config
#
# Location (default):
#   ~/.staffdir/config.yml

# Employee data (file path or http(s) URL)
data: ./Data.json

# Where documents live: a directory or an http(s) base URL.
# Documents are probed at {folder}/{lowercased-code}.pdf
docs: .
# Prefix for document links on the rendered page (directory mode only)
# docs_href: ./

title: Employee Directory

# Output (optional, defaults to stdout)
# output: ./directory.html
# output_format: html

# Probing
concurrency: 16
# rate: 50
timeout: 10
workers: 4

# View
expanded: false
no_color: false

# Document categories, in button order
categories:
  - folder: "R&R"
    label: "R&R, Skill Matrix"
    title: "R&R Document"
  - folder: "DWM"
    label: "DWM Activities"
    title: "DWM Activities"
  - folder: "KPI"
    label: "KPI Activities"
    title: "KPI Activities"
"#
    .to_string()
}

/// Writes the commented default config unless a file already exists.
pub fn ensure_default_config_file(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("cannot create '{}': {e}", dir.display()))?;
    }
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("cannot write config '{}': {e}", path.display()))
}
