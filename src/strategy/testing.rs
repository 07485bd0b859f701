//! Strategies shared by unit tests

use super::schema::StrategyDef;
use super::{HealthStrategy, OrganicConfig, StrategyKind};

const SEVERITY: &str = r#"
[[severity]]
tier = "superficial"
range = "[0, 2)"

[[severity]]
tier = "minor"
range = "[2, 5)"

[[severity]]
tier = "small"
range = "[5, 10)"

[[severity]]
tier = "moderate"
range = "[10, 20)"

[[severity]]
tier = "severe"
range = "[20, 35)"

[[severity]]
tier = "very_severe"
range = "[35, 50)"

[[severity]]
tier = "grievous"
range = "[50, 75)"

[[severity]]
tier = "horrifying"
range = "[75, inf)"

[[percentage_severity]]
tier = "superficial"
range = "[0, 0.1)"

[[percentage_severity]]
tier = "minor"
range = "[0.1, 0.2)"

[[percentage_severity]]
tier = "small"
range = "[0.2, 0.35)"

[[percentage_severity]]
tier = "moderate"
range = "[0.35, 0.5)"

[[percentage_severity]]
tier = "severe"
range = "[0.5, 0.7)"

[[percentage_severity]]
tier = "very_severe"
range = "[0.7, 0.85)"

[[percentage_severity]]
tier = "grievous"
range = "[0.85, 1)"

[[percentage_severity]]
tier = "horrifying"
range = "[1, inf)"
"#;

fn compile(head: &str) -> HealthStrategy {
    let source = format!("{}\n{}", head, SEVERITY);
    let def: StrategyDef = toml::from_str(&source).unwrap();
    def.compile().unwrap()
}

pub(crate) fn organic() -> HealthStrategy {
    compile(
        r#"
        id = 1
        name = "humanoid"
        kind = "organic"

        [formulas]
        lodge = "0"
        max_hp = "100"
        max_stun = "100"
        max_pain = "100"
        heal_damage = "max(0, 1 + outcome)"
        heal_pain = "2"
        heal_stun = "5"
        penalty = "10"

        [organic]
        fracture_fraction = 0.5
        fracture_merge_chance = 0.0
        "#,
    )
}

pub(crate) fn robot() -> HealthStrategy {
    compile(
        r#"
        id = 2
        name = "android"
        kind = "robot"

        [formulas]
        lodge = "0"
        max_hp = "150"
        max_stun = "60"
        heal_damage = "0"
        heal_stun = "3"
        penalty = "20"
        "#,
    )
}

pub(crate) fn construct() -> HealthStrategy {
    compile(
        r#"
        id = 3
        name = "golem"
        kind = "construct"

        [formulas]
        lodge = "0"
        max_hp = "200"
        heal_damage = "2"
        penalty = "25"
        "#,
    )
}

pub(crate) fn inanimate() -> HealthStrategy {
    compile(
        r#"
        id = 4
        name = "furniture"
        kind = "inanimate"

        [formulas]
        lodge = "0"
        max_hp = "40"
        heal_damage = "0"
        "#,
    )
}

pub(crate) fn organic_config(strategy: &mut HealthStrategy) -> &mut OrganicConfig {
    match &mut strategy.kind {
        StrategyKind::Organic(config) => config,
        other => panic!("not an organic strategy: {}", other.label()),
    }
}
