//! Body plans: bodyparts, bones, organs and circulatory fluid

use serde::{Deserialize, Serialize};

use crate::core::types::BodypartId;

/// Organs the health engine queries by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganKind {
    /// Brain, or a robot's positronic core
    Brain,
    Heart,
    Lungs,
    Trachea,
    Liver,
    Kidney,
    Spleen,
    Stomach,
    Esophagus,
    Intestines,
    /// Robot power supply
    PowerCore,
}

impl OrganKind {
    /// Bleeding from this organ pools in the airway
    pub fn drains_to_airway(&self) -> bool {
        matches!(self, OrganKind::Lungs | OrganKind::Trachea)
    }

    /// Bleeding from this organ pools in the digestive tract
    pub fn drains_to_gut(&self) -> bool {
        matches!(
            self,
            OrganKind::Stomach | OrganKind::Esophagus | OrganKind::Intestines
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodypartKind {
    /// Skin, muscle, casing
    External,
    Bone,
    Organ(OrganKind),
}

/// What fills the circulatory system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CirculatoryFluid {
    Blood,
    Hydraulic,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bodypart {
    pub id: BodypartId,
    pub name: String,
    pub kind: BodypartKind,
    /// Damage this part can absorb before it stops functioning
    pub max_life: f64,
    /// 0.0 = indifferent to oxygen, 1.0 = dies first
    pub hypoxia_sensitivity: f64,
    /// Bone underneath an external part
    pub bone: Option<BodypartId>,
}

impl Bodypart {
    pub fn organ(&self) -> Option<OrganKind> {
        match self.kind {
            BodypartKind::Organ(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_bone(&self) -> bool {
        self.kind == BodypartKind::Bone
    }

    pub fn is_external(&self) -> bool {
        self.kind == BodypartKind::External
    }
}

/// Immutable anatomy shared by every entity of a kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPlan {
    pub name: String,
    pub fluid: CirculatoryFluid,
    /// Litres of fluid when full
    pub fluid_capacity: f64,
    parts: Vec<Bodypart>,
}

impl BodyPlan {
    pub fn builder(name: &str) -> BodyPlanBuilder {
        BodyPlanBuilder {
            plan: BodyPlan {
                name: name.to_string(),
                fluid: CirculatoryFluid::None,
                fluid_capacity: 0.0,
                parts: Vec::new(),
            },
        }
    }

    pub fn parts(&self) -> &[Bodypart] {
        &self.parts
    }

    pub fn part(&self, id: BodypartId) -> Option<&Bodypart> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn part_by_name(&self, name: &str) -> Option<&Bodypart> {
        self.parts.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn organs(&self) -> impl Iterator<Item = (&Bodypart, OrganKind)> {
        self.parts.iter().filter_map(|p| p.organ().map(|k| (p, k)))
    }

    /// The bone that takes a fracture when `id` is struck by blunt force
    pub fn bone_for(&self, id: BodypartId) -> Option<&Bodypart> {
        let part = self.part(id)?;
        if part.is_bone() {
            return Some(part);
        }
        part.bone.and_then(|b| self.part(b))
    }

    /// A humanoid with a full set of organs and five litres of blood
    pub fn humanoid() -> Self {
        BodyPlan::builder("humanoid")
            .fluid(CirculatoryFluid::Blood, 5.0)
            .limb("head", 50.0, "skull", 40.0)
            .external("neck", 40.0)
            .limb("torso", 80.0, "ribcage", 50.0)
            .limb("left arm", 40.0, "left humerus", 30.0)
            .limb("right arm", 40.0, "right humerus", 30.0)
            .limb("left leg", 50.0, "left femur", 40.0)
            .limb("right leg", 50.0, "right femur", 40.0)
            .organ("brain", OrganKind::Brain, 20.0, 1.0)
            .organ("heart", OrganKind::Heart, 30.0, 0.6)
            .organ("left lung", OrganKind::Lungs, 30.0, 0.4)
            .organ("right lung", OrganKind::Lungs, 30.0, 0.4)
            .organ("trachea", OrganKind::Trachea, 20.0, 0.2)
            .organ("liver", OrganKind::Liver, 30.0, 0.3)
            .organ("left kidney", OrganKind::Kidney, 20.0, 0.3)
            .organ("right kidney", OrganKind::Kidney, 20.0, 0.3)
            .organ("spleen", OrganKind::Spleen, 20.0, 0.2)
            .organ("stomach", OrganKind::Stomach, 25.0, 0.15)
            .organ("esophagus", OrganKind::Esophagus, 15.0, 0.1)
            .organ("intestines", OrganKind::Intestines, 35.0, 0.15)
            .build()
    }

    /// A hydraulic android with a positronic brain and a power core
    pub fn android() -> Self {
        BodyPlan::builder("android")
            .fluid(CirculatoryFluid::Hydraulic, 3.0)
            .external("head", 60.0)
            .external("chassis", 120.0)
            .external("left arm", 50.0)
            .external("right arm", 50.0)
            .external("left leg", 60.0)
            .external("right leg", 60.0)
            .organ("positronic brain", OrganKind::Brain, 30.0, 0.0)
            .organ("power core", OrganKind::PowerCore, 40.0, 0.0)
            .build()
    }

    /// A single-part object with no circulation
    pub fn object(max_life: f64) -> Self {
        BodyPlan::builder("object")
            .external("structure", max_life)
            .build()
    }
}

pub struct BodyPlanBuilder {
    plan: BodyPlan,
}

impl BodyPlanBuilder {
    fn push(&mut self, name: &str, kind: BodypartKind, max_life: f64, sensitivity: f64) -> BodypartId {
        let id = BodypartId(self.plan.parts.len() as u32 + 1);
        self.plan.parts.push(Bodypart {
            id,
            name: name.to_string(),
            kind,
            max_life,
            hypoxia_sensitivity: sensitivity,
            bone: None,
        });
        id
    }

    pub fn fluid(mut self, fluid: CirculatoryFluid, capacity: f64) -> Self {
        self.plan.fluid = fluid;
        self.plan.fluid_capacity = capacity;
        self
    }

    pub fn external(mut self, name: &str, max_life: f64) -> Self {
        self.push(name, BodypartKind::External, max_life, 0.0);
        self
    }

    pub fn bone(mut self, name: &str, max_life: f64) -> Self {
        self.push(name, BodypartKind::Bone, max_life, 0.0);
        self
    }

    /// An external part with a bone beneath it
    pub fn limb(mut self, name: &str, max_life: f64, bone: &str, bone_life: f64) -> Self {
        let outer = self.push(name, BodypartKind::External, max_life, 0.0);
        let inner = self.push(bone, BodypartKind::Bone, bone_life, 0.0);
        if let Some(part) = self.plan.parts.iter_mut().find(|p| p.id == outer) {
            part.bone = Some(inner);
        }
        self
    }

    pub fn organ(mut self, name: &str, kind: OrganKind, max_life: f64, sensitivity: f64) -> Self {
        self.push(name, BodypartKind::Organ(kind), max_life, sensitivity);
        self
    }

    pub fn build(self) -> BodyPlan {
        self.plan
    }
}
