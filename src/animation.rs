//! Animation kinds available to light and darkness sources

use serde_derive::{Deserialize, Serialize};
use validator::ValidationError;

use crate::l10n::{self, Localization};

/// Localization key of the "no animation" entry
pub const NONE_LABEL: &str = "LIGHTGROUPS.AnimationNone";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationKind {
    /// Identifier stored in the light's `animation.type`
    pub id: String,
    /// Localization key for the display label
    pub label: String,
    /// English label, used when `label` has no translation
    pub name: String,
}

impl AnimationKind {
    fn new(id: &str, label: &str, name: &str) -> Self {
        Self {
            id: id.to_owned(),
            label: label.to_owned(),
            name: name.to_owned(),
        }
    }
}

/// Ordered catalogs of animation kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationCatalog {
    pub light: Vec<AnimationKind>,
    /// Kinds for darkness sources. The light catalog is used when this is not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub darkness: Option<Vec<AnimationKind>>,
}

impl Default for AnimationCatalog {
    fn default() -> Self {
        let kind = AnimationKind::new;

        Self {
            light: vec![
                kind("flame", "LIGHT.AnimationFlame", "Torch"),
                kind("torch", "LIGHT.AnimationTorch", "Flickering Light"),
                kind("revolving", "LIGHT.AnimationRevolving", "Revolving Light"),
                kind("siren", "LIGHT.AnimationSiren", "Siren Light"),
                kind("pulse", "LIGHT.AnimationPulse", "Pulse"),
                kind("chroma", "LIGHT.AnimationChroma", "Chroma"),
                kind("wave", "LIGHT.AnimationWave", "Pulsing Wave"),
                kind("fog", "LIGHT.AnimationFog", "Swirling Fog"),
                kind("sunburst", "LIGHT.AnimationSunburst", "Sunburst"),
                kind("dome", "LIGHT.AnimationLightDome", "Light Dome"),
                kind("emanation", "LIGHT.AnimationEmanation", "Mysterious Emanation"),
                kind("hexa", "LIGHT.AnimationHexaDome", "Hexa Dome"),
                kind("ghost", "LIGHT.AnimationGhostLight", "Ghostly Light"),
                kind("energy", "LIGHT.AnimationEnergyField", "Energy Field"),
                kind("vortex", "LIGHT.AnimationVortex", "Vortex"),
                kind("witchwave", "LIGHT.AnimationBewitchingWave", "Bewitching Wave"),
                kind("rainbowswirl", "LIGHT.AnimationSwirlingRainbow", "Swirling Rainbow"),
                kind("radialrainbow", "LIGHT.AnimationRadialRainbow", "Radial Rainbow"),
                kind("fairy", "LIGHT.AnimationFairyLight", "Fairy Light"),
                kind("grid", "LIGHT.AnimationForceGrid", "Force Grid"),
                kind("starlight", "LIGHT.AnimationStarLight", "Star Light"),
                kind("smokepatch", "LIGHT.AnimationSmokePatch", "Smoke Patch"),
            ],
            darkness: Some(vec![
                kind("magicalGloom", "LIGHT.AnimationMagicalGloom", "Magical Gloom"),
                kind("roiling", "LIGHT.AnimationRoilingMass", "Roiling Mass"),
                kind("hole", "LIGHT.AnimationBlackHole", "Black Hole"),
                kind("denseSmoke", "LIGHT.AnimationDenseSmoke", "Dense Smoke"),
            ]),
        }
    }
}

impl AnimationCatalog {
    /// Kinds valid for a light with the given darkness role
    pub fn candidates(&self, is_darkness: bool) -> &[AnimationKind] {
        match &self.darkness {
            Some(darkness) if is_darkness => darkness,
            _ => &self.light,
        }
    }

    /// Returns `kind` if it is still valid for the given role, or the empty kind otherwise
    pub fn retain_kind(&self, is_darkness: bool, kind: &str) -> String {
        if self.candidates(is_darkness).iter().any(|k| k.id == kind) {
            kind.to_owned()
        } else {
            String::new()
        }
    }
}

pub(crate) fn validate_catalog(catalog: &AnimationCatalog) -> Result<(), ValidationError> {
    let darkness = catalog.darkness.iter().flatten();

    for kind in catalog.light.iter().chain(darkness) {
        if kind.id.is_empty() {
            return Err(ValidationError::new("empty_animation_id"));
        }
    }

    Ok(())
}

/// Entry in an animation selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Options for a light with the given darkness role, starting with the "None" entry
///
/// Nothing is marked as selected, see [select].
pub fn resolve(
    catalog: &AnimationCatalog,
    is_darkness: bool,
    l10n: &dyn Localization,
) -> Vec<AnimationOption> {
    std::iter::once(AnimationOption {
        value: String::new(),
        label: l10n::text(l10n, NONE_LABEL, "None"),
        selected: false,
    })
    .chain(
        catalog
            .candidates(is_darkness)
            .iter()
            .map(|kind| AnimationOption {
                value: kind.id.clone(),
                label: l10n::text(l10n, &kind.label, &kind.name),
                selected: false,
            }),
    )
    .collect()
}

/// Mark the option matching `kind` as selected, falling back to the "None" entry
///
/// Returns the value of the selected option.
pub fn select(options: &mut [AnimationOption], kind: &str) -> String {
    let index = options
        .iter()
        .position(|option| option.value == kind)
        .unwrap_or(0);

    for (i, option) in options.iter_mut().enumerate() {
        option.selected = i == index;
    }

    options
        .get(index)
        .map(|option| option.value.clone())
        .unwrap_or_default()
}
