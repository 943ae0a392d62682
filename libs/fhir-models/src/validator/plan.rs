use super::config::{ExtensionsConfig, ModifierExtensionsConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Compiled validation plan - list of steps to execute
#[derive(Debug, Clone)]
pub struct ValidationPlan {
    pub steps: Vec<Step>,
    pub fail_fast: bool,
    pub max_issues: usize,
}

#[derive(Debug, Clone)]
pub enum Step {
    ResourceIds(ResourceIdsPlan),
    Extensions(ExtensionsPlan),
    ModifierExtensions(ModifierExtensionsPlan),
}

// ============================================================================
// Step Plans
// ============================================================================

static RESOURCE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9\-\.]{1,64}$").expect("resource id regex must compile")
});

#[derive(Debug, Clone)]
pub struct ResourceIdsPlan {
    pub pattern: Regex,
}

impl Default for ResourceIdsPlan {
    fn default() -> Self {
        Self {
            pattern: RESOURCE_ID.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtensionsPlan {
    pub enforce_ext_1: bool,
}

impl From<&ExtensionsConfig> for ExtensionsPlan {
    fn from(cfg: &ExtensionsConfig) -> Self {
        Self {
            enforce_ext_1: cfg.ext_1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModifierExtensionsPlan {
    pub understood: HashSet<String>,
    pub allow_unknown: bool,
}

impl From<&ModifierExtensionsConfig> for ModifierExtensionsPlan {
    fn from(cfg: &ModifierExtensionsConfig) -> Self {
        Self {
            understood: cfg.understood.iter().cloned().collect(),
            allow_unknown: cfg.allow_unknown,
        }
    }
}
