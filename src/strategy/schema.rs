//! Strategy schema types for TOML deserialization.
//!
//! A definition is plain data straight from the file. `compile` checks it and
//! turns it into an immutable `HealthStrategy`; any problem is fatal for that
//! strategy and the error names it.

use serde::Deserialize;

use super::kind::{ConstructConfig, OrganicConfig, RobotConfig, StrategyKind};
use super::HealthStrategy;
use crate::core::config::Thresholds;
use crate::core::error::{HealthError, Result};
use crate::core::types::StrategyId;
use crate::formula::Formula;
use crate::severity::{parse_range, SeverityRange, SeverityTable, SeverityTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindDef {
    Inanimate,
    Construct,
    Robot,
    Organic,
}

/// Complete strategy definition
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyDef {
    pub id: u32,
    pub name: String,
    pub kind: KindDef,
    #[serde(default)]
    pub description: String,
    pub formulas: FormulaDefs,
    #[serde(default)]
    pub organic: OrganicTuning,
    #[serde(default)]
    pub thresholds: Thresholds,
    pub severity: Vec<RangeDef>,
    #[serde(default)]
    pub percentage_severity: Vec<RangeDef>,
}

/// Formula sources; which ones are required depends on the kind
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormulaDefs {
    pub lodge: Option<String>,
    pub max_hp: Option<String>,
    pub max_stun: Option<String>,
    pub max_pain: Option<String>,
    pub heal_damage: Option<String>,
    pub heal_pain: Option<String>,
    pub heal_stun: Option<String>,
    pub penalty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganicTuning {
    pub fracture_fraction: f64,
    pub fracture_merge_chance: f64,
}

impl Default for OrganicTuning {
    fn default() -> Self {
        Self {
            fracture_fraction: 0.5,
            fracture_merge_chance: 0.5,
        }
    }
}

/// One severity band, e.g. `{ tier = "minor", range = "[2, 5)" }`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeDef {
    pub tier: SeverityTier,
    pub range: String,
}

impl StrategyDef {
    /// Validate and build the runtime strategy
    pub fn compile(&self) -> Result<HealthStrategy> {
        let fail = |message: String| {
            tracing::warn!("Rejecting strategy '{}': {}", self.name, message);
            HealthError::config(&self.name, message)
        };

        if self.name.trim().is_empty() {
            return Err(HealthError::config(
                format!("#{}", self.id),
                "strategy name is empty",
            ));
        }

        self.thresholds.validate().map_err(&fail)?;

        let severity = build_table(&self.severity, "severity").map_err(&fail)?;
        if severity.is_empty() {
            return Err(fail("severity table has no ranges".to_string()));
        }
        let percentage_severity =
            build_table(&self.percentage_severity, "percentage_severity").map_err(&fail)?;

        let formula = |field: &str| -> Result<Formula> {
            let source = self.formulas.get(field).ok_or_else(|| {
                fail(format!(
                    "{} strategies require formula '{}'",
                    self.kind.label(),
                    field
                ))
            })?;
            Formula::compile(source).map_err(|e| fail(format!("formula '{}': {}", field, e)))
        };

        let lodge = formula("lodge")?;
        let max_hp = formula("max_hp")?;
        let heal_damage = formula("heal_damage")?;

        let kind = match self.kind {
            KindDef::Inanimate => StrategyKind::Inanimate,
            KindDef::Construct => StrategyKind::Construct(ConstructConfig {
                penalty: formula("penalty")?,
            }),
            KindDef::Robot => StrategyKind::Robot(RobotConfig {
                max_stun: formula("max_stun")?,
                heal_stun: formula("heal_stun")?,
                penalty: formula("penalty")?,
            }),
            KindDef::Organic => {
                let tuning = &self.organic;
                for (field, value) in [
                    ("fracture_fraction", tuning.fracture_fraction),
                    ("fracture_merge_chance", tuning.fracture_merge_chance),
                ] {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(fail(format!("{} ({}) must be within [0, 1]", field, value)));
                    }
                }
                StrategyKind::Organic(OrganicConfig {
                    max_stun: formula("max_stun")?,
                    max_pain: formula("max_pain")?,
                    heal_pain: formula("heal_pain")?,
                    heal_stun: formula("heal_stun")?,
                    penalty: formula("penalty")?,
                    fracture_fraction: tuning.fracture_fraction,
                    fracture_merge_chance: tuning.fracture_merge_chance,
                })
            }
        };

        for field in self.formulas.present() {
            if !self.kind.uses(field) {
                tracing::warn!(
                    "Strategy '{}': formula '{}' is ignored by {} strategies",
                    self.name,
                    field,
                    self.kind.label()
                );
            }
        }

        Ok(HealthStrategy {
            id: StrategyId(self.id),
            name: self.name.clone(),
            severity,
            percentage_severity,
            lodge,
            max_hp,
            heal_damage,
            thresholds: self.thresholds.clone(),
            kind,
        })
    }
}

impl KindDef {
    pub fn label(&self) -> &'static str {
        match self {
            KindDef::Inanimate => "inanimate",
            KindDef::Construct => "construct",
            KindDef::Robot => "robot",
            KindDef::Organic => "organic",
        }
    }

    fn uses(&self, formula: &str) -> bool {
        match formula {
            "lodge" | "max_hp" | "heal_damage" => true,
            "penalty" => !matches!(self, KindDef::Inanimate),
            "max_stun" | "heal_stun" => matches!(self, KindDef::Robot | KindDef::Organic),
            "max_pain" | "heal_pain" => matches!(self, KindDef::Organic),
            _ => false,
        }
    }
}

impl FormulaDefs {
    fn get(&self, field: &str) -> Option<&str> {
        let slot = match field {
            "lodge" => &self.lodge,
            "max_hp" => &self.max_hp,
            "max_stun" => &self.max_stun,
            "max_pain" => &self.max_pain,
            "heal_damage" => &self.heal_damage,
            "heal_pain" => &self.heal_pain,
            "heal_stun" => &self.heal_stun,
            "penalty" => &self.penalty,
            _ => return None,
        };
        slot.as_deref()
    }

    fn present(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            "lodge",
            "max_hp",
            "max_stun",
            "max_pain",
            "heal_damage",
            "heal_pain",
            "heal_stun",
            "penalty",
        ]
        .into_iter()
        .filter(|field| self.get(field).is_some())
    }
}

fn build_table(defs: &[RangeDef], table: &str) -> std::result::Result<SeverityTable, String> {
    let ranges = defs
        .iter()
        .map(|def| {
            let (lower, upper) = parse_range(&def.range)
                .map_err(|e| format!("{} range for {:?}: {}", table, def.tier, e))?;
            Ok(SeverityRange::new(def.tier, lower, upper))
        })
        .collect::<std::result::Result<Vec<_>, String>>()?;
    SeverityTable::new(ranges).map_err(|e| format!("{}: {}", table, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORGANIC: &str = r#"
        id = 7
        name = "test creature"
        kind = "organic"

        [formulas]
        lodge = "damage * 2"
        max_hp = "100"
        max_stun = "100"
        max_pain = "100"
        heal_damage = "1"
        heal_pain = "2"
        heal_stun = "3"
        penalty = "10"

        [[severity]]
        tier = "minor"
        range = "[0, 10)"

        [[severity]]
        tier = "severe"
        range = "[10, inf)"
    "#;

    #[test]
    fn test_compile_organic() {
        let def: StrategyDef = toml::from_str(ORGANIC).unwrap();
        let strategy = def.compile().unwrap();
        assert_eq!(strategy.id, StrategyId(7));
        assert!(matches!(strategy.kind, StrategyKind::Organic(_)));
        assert!(strategy.percentage_severity.is_empty());
        assert_eq!(strategy.thresholds, Thresholds::default());
    }

    #[test]
    fn test_missing_formula_names_strategy() {
        let source = ORGANIC.replace("max_pain = \"100\"", "");
        let def: StrategyDef = toml::from_str(&source).unwrap();
        match def.compile() {
            Err(HealthError::StrategyConfig { strategy, message }) => {
                assert_eq!(strategy, "test creature");
                assert!(message.contains("max_pain"));
            }
            other => panic!("expected config error, got {:?}", other.map(|s| s.name)),
        }
    }

    #[test]
    fn test_bad_range_rejected() {
        let source = ORGANIC.replace("[0, 10)", "0 to 10");
        let def: StrategyDef = toml::from_str(&source).unwrap();
        assert!(matches!(
            def.compile(),
            Err(HealthError::StrategyConfig { .. })
        ));
    }

    #[test]
    fn test_unknown_function_rejected_at_load() {
        let source = ORGANIC.replace("damage * 2", "explode(damage)");
        let def: StrategyDef = toml::from_str(&source).unwrap();
        assert!(def.compile().is_err());
    }

    #[test]
    fn test_inanimate_needs_only_core_formulas() {
        let source = r#"
            id = 1
            name = "barrel"
            kind = "inanimate"

            [formulas]
            lodge = "50"
            max_hp = "40"
            heal_damage = "0"

            [[severity]]
            tier = "minor"
            range = "[0, inf)"
        "#;
        let def: StrategyDef = toml::from_str(source).unwrap();
        let strategy = def.compile().unwrap();
        assert_eq!(strategy.kind, StrategyKind::Inanimate);
    }

    #[test]
    fn test_fracture_fraction_out_of_range() {
        let source = format!("{}\n[organic]\nfracture_fraction = 1.5\n", ORGANIC);
        let def: StrategyDef = toml::from_str(&source).unwrap();
        assert!(def.compile().is_err());
    }

    #[test]
    fn test_threshold_override() {
        let source = format!("{}\n[thresholds]\nblood_death_ratio = 0.4\n", ORGANIC);
        let def: StrategyDef = toml::from_str(&source).unwrap();
        let strategy = def.compile().unwrap();
        assert_eq!(strategy.thresholds.blood_death_ratio, 0.4);
        assert_eq!(strategy.thresholds.anesthesia_lethal, 50.0);
    }
}
