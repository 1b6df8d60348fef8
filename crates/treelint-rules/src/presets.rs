//! Rule presets and the configured-rule registry.

use crate::{
    eqeqeq, no_debugger, no_empty_block, no_unsafe_finally, no_unused_vars, no_var, prefer_const,
    Eqeqeq, NoDebugger, NoEmptyBlock, NoUnsafeFinally, NoUnusedVars, NoVar, PreferConst,
};
use treelint_core::{ActivationError, Config, ConfigValue, RuleBox};

/// Preset configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// All rules, including the stricter hygiene ones.
    Strict,
    /// Minimal rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Resolves a preset by name; unknown names fall back to recommended.
    #[must_use]
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            None | Some("recommended") => Self::Recommended,
            Some("strict") => Self::Strict,
            Some("minimal") => Self::Minimal,
            Some(other) => {
                tracing::warn!(preset = other, "unknown preset, using 'recommended'");
                Self::Recommended
            }
        }
    }

    /// Rule names included in this preset.
    #[must_use]
    pub fn rule_names(self) -> &'static [&'static str] {
        match self {
            Self::Recommended => &[
                prefer_const::NAME,
                no_var::NAME,
                eqeqeq::NAME,
                no_unsafe_finally::NAME,
                no_debugger::NAME,
            ],
            Self::Strict => &[
                prefer_const::NAME,
                no_var::NAME,
                eqeqeq::NAME,
                no_unsafe_finally::NAME,
                no_debugger::NAME,
                no_empty_block::NAME,
                no_unused_vars::NAME,
            ],
            Self::Minimal => &[no_unsafe_finally::NAME, no_debugger::NAME],
        }
    }

    /// The rules for this preset, with default options.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        self.rule_names()
            .iter()
            .filter_map(|name| {
                factory(name).and_then(|f| f(&ConfigValue::Absent).ok())
            })
            .collect()
    }
}

/// Returns the recommended set of rules with default options.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns every available rule with default options.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    Preset::Strict.rules()
}

type Factory = fn(&ConfigValue) -> Result<RuleBox, String>;

/// All known rules in registration order. This order is the tie-break for
/// diagnostic ordering and fix selection at equal offsets.
const REGISTRY: &[(&str, Factory)] = &[
    (prefer_const::NAME, |v| {
        PreferConst::from_config(v).map(|r| Box::new(r) as RuleBox)
    }),
    (no_var::NAME, |v| {
        NoVar::from_config(v).map(|r| Box::new(r) as RuleBox)
    }),
    (eqeqeq::NAME, |v| {
        Eqeqeq::from_config(v).map(|r| Box::new(r) as RuleBox)
    }),
    (no_unsafe_finally::NAME, |v| {
        NoUnsafeFinally::from_config(v).map(|r| Box::new(r) as RuleBox)
    }),
    (no_debugger::NAME, |v| {
        NoDebugger::from_config(v).map(|r| Box::new(r) as RuleBox)
    }),
    (no_empty_block::NAME, |v| {
        NoEmptyBlock::from_config(v).map(|r| Box::new(r) as RuleBox)
    }),
    (no_unused_vars::NAME, |v| {
        NoUnusedVars::from_config(v).map(|r| Box::new(r) as RuleBox)
    }),
];

fn factory(name: &str) -> Option<Factory> {
    REGISTRY
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, f)| f)
}

/// Names of all known rules, in registration order.
#[must_use]
pub fn rule_names() -> Vec<&'static str> {
    REGISTRY.iter().map(|&(name, _)| name).collect()
}

/// Builds a rule by name with default options.
#[must_use]
pub fn rule_by_name(name: &str) -> Option<RuleBox> {
    factory(name).and_then(|f| f(&ConfigValue::Absent).ok())
}

/// Builds the active rule set for a run: the configured preset's rules plus
/// any rule mentioned in `[rules]`, each bound to its decoded options.
///
/// Rules whose configuration entry is malformed are excluded and reported as
/// activation errors; the others proceed. Rules set to `"off"` are still
/// constructed here and dropped by the engine's level filtering.
#[must_use]
pub fn configured_rules(config: &Config) -> (Vec<RuleBox>, Vec<ActivationError>) {
    let preset = Preset::from_name(config.preset.as_deref());
    let preset_names = preset.rule_names();

    let mut rules = Vec::new();
    let mut errors = Vec::new();

    for &(name, factory) in REGISTRY {
        let value = match config.rule_value(name) {
            Ok(value) => value,
            Err(e) => {
                errors.push(ActivationError {
                    rule: name.to_string(),
                    message: e.to_string(),
                });
                continue;
            }
        };
        let mentioned = !matches!(value, ConfigValue::Absent);
        if !preset_names.contains(&name) && !mentioned {
            continue;
        }
        match factory(&value) {
            Ok(rule) => rules.push(rule),
            Err(message) => errors.push(ActivationError {
                rule: name.to_string(),
                message,
            }),
        }
    }

    (rules, errors)
}
