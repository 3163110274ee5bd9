//! Flat key/value settings file
//!
//! Settings live in a two-column table (`Setting`, `Value`) serialized as XML in
//! the layout written by a .NET `DataSet`, so configuration files produced by
//! earlier tooling load unchanged:
//!
//! ```xml
//! <?xml version="1.0" standalone="yes"?>
//! <NewDataSet>
//!   <Settings>
//!     <Setting>SSID</Setting>
//!     <Value>CampusGuest</Value>
//!   </Settings>
//! </NewDataSet>
//! ```

use super::cipher::{Cipher, NoopCipher};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Default settings file name
pub const DEFAULT_FILE_NAME: &str = "config.xml";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" standalone=\"yes\"?>\n";

const ROW_ELEMENT: &[u8] = b"Settings";
const NAME_ELEMENT: &[u8] = b"Setting";
const VALUE_ELEMENT: &[u8] = b"Value";

/// Errors raised by the settings store
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file does not exist and creation was not allowed
    #[error("Cannot find configuration file: {0}")]
    CannotFindFile(String),

    /// The settings file exists but could not be read or parsed
    #[error("Error reading configuration file {path}: {reason}")]
    ReadError {
        /// File that failed to load
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// The setting is absent and no default was supplied
    #[error("Setting does not exist: {0}")]
    SettingMissing(String),

    /// The settings file could not be written
    #[error("Error writing configuration file {path}: {reason}")]
    WriteError {
        /// File that failed to save
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// A stored value could not be decrypted
    #[error("Cannot decrypt setting {setting}: {reason}")]
    Decrypt {
        /// Name of the setting
        setting: String,
        /// Underlying cause
        reason: String,
    },

    /// A value could not be encrypted for storage
    #[error("Cannot encrypt setting {setting}: {reason}")]
    Encrypt {
        /// Name of the setting
        setting: String,
        /// Underlying cause
        reason: String,
    },
}

impl SettingsError {
    fn read(path: &Path, reason: impl ToString) -> Self {
        Self::ReadError { path: path.display().to_string(), reason: reason.to_string() }
    }

    fn write(path: &Path, reason: impl ToString) -> Self {
        Self::WriteError { path: path.display().to_string(), reason: reason.to_string() }
    }
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// One row of the settings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    /// Setting name, unique within the store
    #[serde(rename = "Setting")]
    pub name: String,
    /// Stored value
    #[serde(rename = "Value", default)]
    pub value: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename = "NewDataSet")]
struct SettingsDocument {
    #[serde(rename = "Settings", default)]
    rows: Vec<Setting>,
}

/// Settings table backed by an XML file
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    rows: Vec<Setting>,
    changed: bool,
    cipher: Box<dyn Cipher>,
}

impl SettingsStore {
    /// Open the settings file at `path`
    ///
    /// When the file is absent and `create_if_missing` is set the store starts
    /// empty and the file is written by the first [`save`](Self::save).
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(create_if_missing: bool, path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !create_if_missing && !path.exists() {
            return Err(SettingsError::CannotFindFile(path.display().to_string()));
        }

        let rows = Self::load_rows(&path)?;
        info!("Loaded {} settings", rows.len());

        Ok(Self { path, rows, changed: false, cipher: Box::new(NoopCipher) })
    }

    /// Open `file_name` inside `directory`, or the working directory when none is given
    pub fn open_in(
        create_if_missing: bool,
        file_name: &str,
        directory: Option<&Path>,
    ) -> SettingsResult<Self> {
        let path = match directory {
            Some(directory) => directory.join(file_name),
            None => std::env::current_dir()
                .map_err(|e| SettingsError::read(Path::new(file_name), e))?
                .join(file_name),
        };
        Self::open(create_if_missing, path)
    }

    /// Replace the cipher used by the encrypted accessors
    pub fn with_cipher(mut self, cipher: impl Cipher + 'static) -> Self {
        self.cipher = Box::new(cipher);
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are unsaved changes
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// All settings in file order
    pub fn entries(&self) -> &[Setting] {
        &self.rows
    }

    /// Value of `setting`, or [`SettingsError::SettingMissing`]
    pub fn get(&self, setting: &str) -> SettingsResult<String> {
        self.get_with_default(setting, None)
    }

    /// Value of `setting`, or `default` when it is absent
    pub fn get_or(&self, setting: &str, default: &str) -> String {
        self.find(setting).map_or_else(|| default.to_string(), |row| row.value.clone())
    }

    /// Value of `setting`, falling back to an optional default
    pub fn get_with_default(&self, setting: &str, default: Option<&str>) -> SettingsResult<String> {
        match (self.find(setting), default) {
            (Some(row), _) => Ok(row.value.clone()),
            (None, Some(default)) => Ok(default.to_string()),
            (None, None) => Err(SettingsError::SettingMissing(setting.to_string())),
        }
    }

    /// Decrypted value of `setting`; a default is returned as given
    pub fn get_encrypted(&self, setting: &str, default: Option<&str>) -> SettingsResult<String> {
        match self.find(setting) {
            Some(row) => self.cipher.decrypt(&row.value).map_err(|e| SettingsError::Decrypt {
                setting: setting.to_string(),
                reason: e.to_string(),
            }),
            None => self.get_with_default(setting, default),
        }
    }

    /// Insert or replace `setting`
    pub fn set(&mut self, setting: &str, value: &str) {
        match self.rows.iter_mut().find(|row| row.name == setting) {
            Some(row) => row.value = value.to_string(),
            None => self.rows.push(Setting { name: setting.to_string(), value: value.to_string() }),
        }
        self.changed = true;
        debug!(setting, "Setting updated");
    }

    /// Encrypt `value` and store it under `setting`
    pub fn set_encrypted(&mut self, setting: &str, value: &str) -> SettingsResult<()> {
        let encrypted = self.cipher.encrypt(value).map_err(|e| SettingsError::Encrypt {
            setting: setting.to_string(),
            reason: e.to_string(),
        })?;
        self.set(setting, &encrypted);
        Ok(())
    }

    /// Write the table back to the file it was opened from
    pub fn save(&mut self) -> SettingsResult<()> {
        let path = self.path.clone();
        self.save_as(path)
    }

    /// Write the table to `path`, creating parent directories as needed
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> SettingsResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SettingsError::write(path, e))?;
        }

        let document = SettingsDocument { rows: self.rows.clone() };
        let mut xml = String::from(XML_DECLARATION);
        let mut serializer = quick_xml::se::Serializer::new(&mut xml);
        serializer.indent(' ', 2);
        document.serialize(serializer).map_err(|e| SettingsError::write(path, e))?;
        xml.push('\n');

        fs::write(path, xml).map_err(|e| SettingsError::write(path, e))?;

        self.changed = false;
        info!("Saved {} settings", self.rows.len());
        Ok(())
    }

    /// Discard unsaved changes by reloading the backing file
    pub fn reset(&mut self) -> SettingsResult<()> {
        self.rows = Self::load_rows(&self.path)?;
        self.changed = false;
        Ok(())
    }

    fn find(&self, setting: &str) -> Option<&Setting> {
        self.rows.iter().find(|row| row.name == setting)
    }

    fn load_rows(path: &Path) -> SettingsResult<Vec<Setting>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::read(path, e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let rows = parse_rows(&content).map_err(|reason| SettingsError::read(path, reason))?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = rows.iter().find(|row| !seen.insert(row.name.clone())) {
            return Err(SettingsError::read(
                path,
                format!("duplicate setting '{}'", duplicate.name),
            ));
        }

        Ok(rows)
    }
}

/// Read the rows of a DataSet document
///
/// Text is not trimmed: a value saved with surrounding whitespace, or made
/// only of whitespace, loads back unchanged. Any root element name is accepted.
fn parse_rows(content: &str) -> Result<Vec<Setting>, String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut name: Option<String> = None;
    let mut value = String::new();
    let mut text = String::new();

    let mut rows = Vec::new();
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(element) => {
                let tag = element.local_name().into_inner().to_vec();
                if open.len() == 1 && tag == ROW_ELEMENT {
                    name = None;
                    value.clear();
                }
                text.clear();
                open.push(tag);
            }
            Event::Empty(element) => {
                if in_row(&open) {
                    match element.local_name().into_inner() {
                        NAME_ELEMENT => name = Some(String::new()),
                        VALUE_ELEMENT => value.clear(),
                        _ => {}
                    }
                }
            }
            Event::Text(content) if in_field(&open) => {
                text.push_str(&content.unescape().map_err(|e| e.to_string())?);
            }
            Event::CData(content) if in_field(&open) => {
                text.push_str(std::str::from_utf8(&content).map_err(|e| e.to_string())?);
            }
            Event::End(_) => {
                let tag = open.pop().unwrap_or_default();
                if in_row(&open) {
                    match tag.as_slice() {
                        NAME_ELEMENT => name = Some(std::mem::take(&mut text)),
                        VALUE_ELEMENT => value = std::mem::take(&mut text),
                        _ => {}
                    }
                } else if open.len() == 1 && tag == ROW_ELEMENT {
                    let name = name.take().ok_or("settings row without a Setting element")?;
                    rows.push(Setting { name, value: std::mem::take(&mut value) });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err("unexpected end of document".to_string());
    }
    Ok(rows)
}

/// Directly inside a `Settings` row
fn in_row(open: &[Vec<u8>]) -> bool {
    open.len() == 2 && open[1] == ROW_ELEMENT
}

/// Inside the `Setting` or `Value` element of a row
fn in_field(open: &[Vec<u8>]) -> bool {
    open.len() == 3
        && open[1] == ROW_ELEMENT
        && matches!(open[2].as_slice(), NAME_ELEMENT | VALUE_ELEMENT)
}
