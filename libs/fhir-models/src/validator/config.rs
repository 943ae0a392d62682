//! Validator configuration: presets, builder and YAML

use super::plan::{
    ExtensionsPlan, ModifierExtensionsPlan, ResourceIdsPlan, Step, ValidationPlan,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("modifier extension settings given while the modifier extension check is disabled")]
    ModifierSettingsWithoutCheck,

    #[error("configuration enables no validation steps")]
    NoSteps,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    /// Every check on; unknown modifier extensions are errors
    Strict,
    /// Extension structure only; unknown modifier extensions are warnings
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
    pub extensions: ExtensionsConfig,
    pub modifier_extensions: ModifierExtensionsConfig,
    pub ids: IdsConfig,
    pub exec: ExecConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionsConfig {
    pub enabled: bool,
    /// Report extensions carrying both child extensions and a value (ext-1)
    pub ext_1: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierExtensionsConfig {
    pub enabled: bool,
    /// Modifier extension URLs this system knows how to process
    pub understood: Vec<String>,
    /// Report unknown modifier extensions as warnings instead of errors
    pub allow_unknown: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdsConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    pub fail_fast: bool,
    pub max_issues: usize,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ext_1: true,
        }
    }
}

impl Default for ModifierExtensionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            understood: Vec::new(),
            allow_unknown: false,
        }
    }
}

impl Default for IdsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_issues: 1000,
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            preset: None,
            extensions: ExtensionsConfig::default(),
            modifier_extensions: ModifierExtensionsConfig::default(),
            ids: IdsConfig::default(),
            exec: ExecConfig::default(),
        }
    }
}

impl ValidatorConfig {
    pub fn preset(preset: Preset) -> Self {
        let mut cfg = Self {
            preset: Some(preset),
            ..Self::default()
        };
        match preset {
            Preset::Strict => {}
            Preset::Lenient => {
                cfg.modifier_extensions.allow_unknown = true;
                cfg.ids.enabled = false;
            }
        }
        cfg
    }

    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::default()
    }

    /// Parse YAML. A `preset` key seeds the defaults that the other keys override.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let raw: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let preset = match raw.get("preset") {
            Some(value) if !value.is_null() => {
                Some(serde_yaml::from_value::<Preset>(value.clone())?)
            }
            _ => None,
        };
        let Some(preset) = preset else {
            return Ok(serde_yaml::from_value(raw)?);
        };

        let mut merged = serde_yaml::to_value(Self::preset(preset))?;
        merge_yaml(&mut merged, raw);
        Ok(serde_yaml::from_value(merged)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check the settings and turn them into an ordered list of steps.
    pub fn compile(&self) -> Result<ValidationPlan, ConfigError> {
        let modifiers = &self.modifier_extensions;
        if !modifiers.enabled && (!modifiers.understood.is_empty() || modifiers.allow_unknown) {
            return Err(ConfigError::ModifierSettingsWithoutCheck);
        }
        if let Some(url) = modifiers.understood.iter().find(|url| url.trim().is_empty()) {
            return Err(ConfigError::InvalidConfig(format!(
                "understood modifier extension URL must not be blank, got {url:?}"
            )));
        }
        if self.exec.max_issues == 0 {
            return Err(ConfigError::InvalidConfig(
                "exec.max_issues must be at least 1".to_string(),
            ));
        }

        let mut steps = Vec::new();
        if self.ids.enabled {
            steps.push(Step::ResourceIds(ResourceIdsPlan::default()));
        }
        if self.extensions.enabled {
            steps.push(Step::Extensions(ExtensionsPlan::from(&self.extensions)));
        }
        if modifiers.enabled {
            steps.push(Step::ModifierExtensions(ModifierExtensionsPlan::from(modifiers)));
        }
        if steps.is_empty() {
            return Err(ConfigError::NoSteps);
        }

        Ok(ValidationPlan {
            steps,
            fail_fast: self.exec.fail_fast,
            max_issues: self.exec.max_issues,
        })
    }
}

/// Recursively overlay `overlay` onto `base`; mappings merge, everything else replaces.
fn merge_yaml(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base_map), serde_yaml::Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    /// Reset every setting to `preset`. Call it before the other setters.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.config = ValidatorConfig::preset(preset);
        self
    }

    pub fn extensions(mut self, enabled: bool) -> Self {
        self.config.extensions.enabled = enabled;
        self
    }

    pub fn enforce_ext_1(mut self, enforce: bool) -> Self {
        self.config.extensions.ext_1 = enforce;
        self
    }

    pub fn modifier_extensions(mut self, enabled: bool) -> Self {
        self.config.modifier_extensions.enabled = enabled;
        self
    }

    pub fn understand_modifier(mut self, url: impl Into<String>) -> Self {
        self.config.modifier_extensions.understood.push(url.into());
        self
    }

    pub fn allow_unknown_modifiers(mut self, allow: bool) -> Self {
        self.config.modifier_extensions.allow_unknown = allow;
        self
    }

    pub fn resource_ids(mut self, enabled: bool) -> Self {
        self.config.ids.enabled = enabled;
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.config.exec.fail_fast = fail_fast;
        self
    }

    pub fn max_issues(mut self, max_issues: usize) -> Self {
        self.config.exec.max_issues = max_issues;
        self
    }

    pub fn build(self) -> ValidatorConfig {
        self.config
    }
}
