use crate::error::{ConfigError, EvalError};
use crate::hotkeys::{BindingTable, Dispatch, Keychord};
use crate::operation::{Operation, OperationTable};
use crate::presets::Profile;
use crate::window::FocusedWindow;
use crate::{Result, ScreenMetrics};
use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The on-disk configuration: operation declarations followed by bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub operations: Vec<OperationEntry>,
    #[serde(default)]
    pub bindings: Vec<BindingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOperationEntry")]
pub struct OperationEntry {
    pub name: String,
    pub kind: String,
    #[serde(flatten)]
    pub parameters: BTreeMap<String, String>,
}

// Constant formulas may be written unquoted, e.g. `x = 0`.
#[derive(Deserialize)]
struct RawOperationEntry {
    name: String,
    kind: String,
    #[serde(flatten)]
    parameters: BTreeMap<String, ParameterValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParameterValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<RawOperationEntry> for OperationEntry {
    fn from(raw: RawOperationEntry) -> Self {
        let parameters = raw
            .parameters
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    ParameterValue::Text(text) => text,
                    ParameterValue::Integer(n) => n.to_string(),
                    ParameterValue::Float(n) => n.to_string(),
                };
                (key, text)
            })
            .collect();
        Self {
            name: raw.name,
            kind: raw.kind,
            parameters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingEntry {
    pub keychord: String,
    pub operation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Toml,
        }
    }
}

impl Config {
    pub fn declare(&mut self, name: &str, operation: &Operation) {
        self.operations.push(OperationEntry {
            name: name.to_string(),
            kind: operation.kind().to_string(),
            parameters: operation.parameters(),
        });
    }

    pub fn bind(&mut self, keychord: &str, operation: &str) {
        self.bindings.push(BindingEntry {
            keychord: keychord.to_string(),
            operation: operation.to_string(),
        });
    }

    /// Appends another configuration's declarations and bindings.
    pub fn extend(&mut self, other: Config) {
        self.operations.extend(other.operations);
        self.bindings.extend(other.bindings);
    }

    pub fn parse(content: &str, format: Format) -> Result<Self> {
        let config = match format {
            Format::Toml => toml::from_str(content)?,
            Format::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(config)
    }

    pub fn render(&self, format: Format) -> Result<String> {
        let content = match format {
            Format::Toml => toml::to_string_pretty(self)?,
            Format::Yaml => serde_yaml::to_string(self)?,
        };
        Ok(content)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            let config = Self::default_profile();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::parse(&content, Format::from_path(path))
            .with_context(|| format!("parsing {}", path.display()))?;
        info!(
            "Loaded {} operations and {} bindings from {:?}",
            config.operations.len(),
            config.bindings.len(),
            path
        );
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.render(Format::from_path(path))?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        *self = Self::load(path)?;
        Ok(())
    }

    pub fn default_profile() -> Self {
        Profile::default().config()
    }
}

/// The two immutable tables a configuration builds into.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    operations: OperationTable,
    bindings: BindingTable,
}

impl Tables {
    pub fn operations(&self) -> &OperationTable {
        &self.operations
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn dispatch(
        &self,
        chord: &Keychord,
        window: Option<&mut dyn FocusedWindow>,
        screen: &ScreenMetrics,
    ) -> std::result::Result<Dispatch, EvalError> {
        self.bindings.dispatch(chord, window, screen, &self.operations)
    }
}

/// Parses and validates every declaration and binding in `config`.
///
/// Operations are declared in order, a repeated name replacing the earlier
/// one. Bindings must use distinct keychords and name declared operations.
pub fn build(config: &Config) -> std::result::Result<Tables, ConfigError> {
    let mut operations = OperationTable::new();
    for entry in &config.operations {
        let operation = Operation::declare(&entry.name, &entry.kind, &entry.parameters)?;
        debug!("  {} = {:?}", entry.name, operation);
        operations.insert(entry.name.clone(), operation);
    }

    let mut bindings = BindingTable::new();
    for entry in &config.bindings {
        let chord: Keychord = entry.keychord.parse()?;
        bindings.insert(chord, entry.operation.clone())?;
    }
    bindings.validate(&operations)?;

    info!(
        "Built {} operations and {} bindings",
        operations.len(),
        bindings.len()
    );
    Ok(Tables {
        operations,
        bindings,
    })
}
