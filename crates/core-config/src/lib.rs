//! Configuration loading and parsing.
//!
//! Parses `block-panel.toml` (or an override path provided by the binary).
//! Every section is optional and every field has a default, so a missing
//! file, an empty file, and a file with only `[save]` all load. Unknown fields
//! are ignored. A file that fails to parse or validate is replaced by defaults
//! and recorded in `LoadOutcome` for the caller to log; only an unreadable
//! existing file is an error.

use serde::Deserialize;
use std::{fs, io, path::PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "block-panel.toml";
const CONFIG_DIR_NAME: &str = "block-panel";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("label `{0}` must not be empty")]
    EmptyLabel(&'static str),
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LabelsConfig {
    pub edit: String,
    pub save: String,
    pub name: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            edit: "Edit".into(),
            save: "Save".into(),
            name: "Name:".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BlockConfig {
    pub title: String,
    pub edit_disabled: bool,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            title: "Untitled Reusable Block".into(),
            edit_disabled: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SaveConfig {
    #[serde(default = "SaveConfig::default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            delay_ms: Self::default_delay_ms(),
        }
    }
}

impl SaveConfig {
    const fn default_delay_ms() -> u64 {
        400
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
        }
    }
}

impl LogConfig {
    fn default_filter() -> String {
        "info".into()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub labels: LabelsConfig,
    #[serde(default)]
    pub block: BlockConfig,
    #[serde(default)]
    pub save: SaveConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl ConfigFile {
    /// Parse and validate one config document.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let labels = [
            ("edit", &self.labels.edit),
            ("save", &self.labels.save),
            ("name", &self.labels.name),
        ];
        for (field, value) in labels {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyLabel(field));
            }
        }
        Ok(())
    }
}

/// How `load_from` arrived at its values. Loading happens before the log
/// subscriber exists, so the outcome is kept and reported afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(PathBuf),
    Missing(PathBuf),
    Invalid { path: PathBuf, error: String },
}

impl LoadOutcome {
    /// Emit the outcome under the `config` target.
    pub fn report(&self) {
        match self {
            LoadOutcome::Loaded(path) => {
                info!(target: "config", path = %path.display(), "config_loaded");
            }
            LoadOutcome::Missing(path) => {
                info!(target: "config", path = %path.display(), "config_missing_using_defaults");
            }
            LoadOutcome::Invalid { path, error } => {
                warn!(target: "config", path = %path.display(), error = %error, "config_invalid_using_defaults");
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: Option<PathBuf>, // file the values came from, if any
    pub file: ConfigFile,
    pub outcome: LoadOutcome,
}

impl Config {
    fn defaults(outcome: LoadOutcome) -> Self {
        Self {
            source: None,
            file: ConfigFile::default(),
            outcome,
        }
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
    }
    local
}

/// Read and parse the config. Only an unreadable existing file is an error;
/// call `outcome.report()` once logging is up.
pub fn load_from(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(Config::defaults(LoadOutcome::Missing(path)));
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    match ConfigFile::parse(&content) {
        Ok(file) => Ok(Config {
            source: Some(path.clone()),
            file,
            outcome: LoadOutcome::Loaded(path),
        }),
        Err(err) => Ok(Config::defaults(LoadOutcome::Invalid {
            path,
            error: err.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_tmp(content: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(cfg.source.is_none());
        assert_eq!(cfg.file.labels.edit, "Edit");
        assert_eq!(cfg.file.block.title, "Untitled Reusable Block");
        assert_eq!(cfg.file.save.delay_ms, 400);
        assert_eq!(cfg.file.log.filter, "info");
    }

    #[test]
    fn parses_every_section() {
        let tmp = write_tmp(
            "[labels]\nedit = \"Modifier\"\nsave = \"Enregistrer\"\nname = \"Nom :\"\n\
             [block]\ntitle = \"Footer\"\nedit_disabled = true\n\
             [save]\ndelay_ms = 25\n\
             [log]\nfilter = \"debug\"\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
        assert_eq!(cfg.file.labels.save, "Enregistrer");
        assert_eq!(cfg.file.block.title, "Footer");
        assert!(cfg.file.block.edit_disabled);
        assert_eq!(cfg.file.save.delay_ms, 25);
        assert_eq!(cfg.file.log.filter, "debug");
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let tmp = write_tmp("[labels]\nsave = \"Store\"\n[block]\nedit_disabled = true\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.labels.edit, "Edit");
        assert_eq!(cfg.file.labels.save, "Store");
        assert_eq!(cfg.file.block.title, "Untitled Reusable Block");
        assert!(cfg.file.block.edit_disabled);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tmp = write_tmp("[save]\ndelay_ms = 10\nretries = 3\n[theme]\nname = \"dark\"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.save.delay_ms, 10);
    }

    #[test]
    fn empty_label_is_rejected_by_parse() {
        let err = ConfigFile::parse("[labels]\nedit = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyLabel("edit")));
        assert_eq!(err.to_string(), "label `edit` must not be empty");
    }

    #[test]
    fn type_mismatch_is_a_parse_error() {
        let err = ConfigFile::parse("[save]\ndelay_ms = \"soon\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let tmp = write_tmp("[block\ntitle = ");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(cfg.source.is_none());
        assert!(matches!(
            &cfg.outcome,
            LoadOutcome::Invalid { path, .. } if path.as_path() == tmp.path()
        ));
    }

    #[test]
    fn invalid_file_warning_is_reported_through_a_later_subscriber() {
        let tmp = write_tmp("[labels]\nedit = \"\"\n");
        // No subscriber while loading, as in the binary's startup.
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();

        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, || cfg.outcome.report());

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_invalid_using_defaults"));
        assert!(log_output.contains("label `edit` must not be empty"));
    }

    #[test]
    fn missing_and_loaded_outcomes_name_the_path() {
        let missing = PathBuf::from("__nonexistent_hopefully__.toml");
        let cfg = load_from(Some(missing.clone())).unwrap();
        assert_eq!(cfg.outcome, LoadOutcome::Missing(missing));

        let tmp = write_tmp("[save]\ndelay_ms = 5\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.outcome, LoadOutcome::Loaded(tmp.path().to_path_buf()));
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(Some(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
