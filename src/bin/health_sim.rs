//! Headless Health Simulator
//!
//! Loads strategy definitions, injures a test subject and ticks it forward,
//! printing condition prompts or JSON tick reports.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use vitality::anatomy::BodyPlan;
use vitality::condition::PromptFormat;
use vitality::narrative::NarrativeLog;
use vitality::simulation::TickReport;
use vitality::{
    DamageEvent, DamageType, Entity, EvalContext, HealthStrategy, ItemId, Result, StrategyKind,
    StrategyRegistry,
};

/// Health Simulator - watch a wounded subject tick by tick
#[derive(Parser, Debug)]
#[command(name = "health_sim")]
#[command(about = "Apply a scripted injury and run the health tick loop")]
struct Args {
    /// Directory of strategy TOML files
    #[arg(long, default_value = "data/strategies")]
    strategies: PathBuf,

    /// Strategy name to simulate
    #[arg(long, default_value = "humanoid")]
    strategy: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to simulate
    #[arg(long, default_value_t = 60)]
    ticks: u64,

    /// Prompt format: classic, full or brief
    #[arg(long, default_value = "classic")]
    format: PromptFormat,

    /// Emit one JSON tick report per line instead of prompts
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct TickLine<'a> {
    tick: u64,
    #[serde(flatten)]
    report: &'a TickReport,
    blood: f64,
    prompt: String,
}

fn subject(strategy: &HealthStrategy) -> Entity {
    let body = match strategy.kind {
        StrategyKind::Organic(_) => BodyPlan::humanoid(),
        StrategyKind::Robot(_) => BodyPlan::android(),
        StrategyKind::Construct(_) | StrategyKind::Inanimate => BodyPlan::object(100.0),
    };
    Entity::new("Subject", Arc::new(body))
        .with_trait("constitution", 12.0)
        .with_trait("willpower", 10.0)
}

/// A sword cut, a club to the leg and an arrow where the body has room
fn injuries(entity: &Entity) -> Vec<DamageEvent> {
    let part = |names: &[&str]| {
        names
            .iter()
            .find_map(|n| entity.body.part_by_name(n))
            .or_else(|| entity.body.parts().first())
            .map(|p| p.id)
    };
    vec![
        DamageEvent::new(DamageType::Slashing, 38.0, part(&["left arm", "structure"])),
        DamageEvent::new(DamageType::Crushing, 18.0, part(&["left leg", "structure"])).with_stun(6.0),
        DamageEvent::new(DamageType::Piercing, 12.0, part(&["torso", "chassis", "structure"]))
            .with_lodgable(ItemId(1)),
    ]
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut registry = StrategyRegistry::new();
    registry.load_directory(&args.strategies)?;
    let strategy = registry.require(&args.strategy)?;
    tracing::info!("Simulating '{}' with seed {}", strategy.name, seed);

    let mut entity = subject(strategy);
    for event in injuries(&entity) {
        let ctx = EvalContext::at(0);
        if let Some(id) = strategy.suffer_damage(&mut entity, &event, ctx, &mut rng)? {
            tracing::info!("{:?} {:?} -> wound {:?}", event.damage_type, event.bodypart, id);
        }
    }

    let mut narrative = NarrativeLog::new();
    for tick in 1..=args.ticks {
        let ctx = EvalContext::at(tick);
        let report = strategy.perform_health_tick(&mut entity, ctx, &mut rng, &mut narrative);
        let prompt = strategy.report_condition_prompt(&entity, args.format, ctx);

        if args.json {
            let line = TickLine {
                tick,
                report: &report,
                blood: entity.blood.current,
                prompt,
            };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!("{:>4} {:?} {}", tick, report.verdict, prompt);
            for event in &report.narrative_events {
                println!("     * {:?}", event);
            }
        }

        if report.verdict.ends_processing() {
            tracing::info!("Subject died at tick {}", tick);
            break;
        }
    }

    for wound in entity.wounds() {
        let severity = strategy.severity_of(wound, &entity.body);
        tracing::info!(
            "wound {:?} on {:?}: {:.1} damage ({:?}){}",
            wound.id,
            wound.bodypart,
            wound.current_damage,
            severity,
            if wound.lodged.is_some() { ", object lodged" } else { "" }
        );
    }
    Ok(())
}
