use std::collections::BTreeMap;

use serde_derive::Serialize;

use super::{form, Group};
use crate::{
    animation::{self, AnimationCatalog, AnimationOption},
    color,
    l10n::Localization,
};

pub const DEFAULT_COLOR_INTENSITY: f64 = 0.5;
pub const DEFAULT_ANIMATION_SPEED: f64 = 5.0;
pub const DEFAULT_ANIMATION_INTENSITY: f64 = 5.0;

/// Values displayed and edited for a group
///
/// The same type carries the operator's edits back to [super::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEditState {
    pub enabled: bool,
    pub color: String,
    pub color_intensity: f64,
    pub is_darkness_source: bool,
    pub provides_vision: bool,
    pub animation_kind: String,
    pub animation_speed: f64,
    pub animation_intensity: f64,
    pub animation_reverse: bool,
    /// Animation kinds valid for `is_darkness_source`, the current kind marked as selected
    pub animation_options: Vec<AnimationOption>,
}

/// Derive the edit state of a group from its lead member
pub fn project(
    group: &Group,
    catalog: &AnimationCatalog,
    l10n: &dyn Localization,
) -> GroupEditState {
    let lead = group.lead();
    let config = &lead.config;
    let is_darkness_source = config.is_darkness_source();

    let mut animation_options = animation::resolve(catalog, is_darkness_source, l10n);
    let animation_kind = animation::select(
        &mut animation_options,
        config.animation.kind.as_deref().unwrap_or(""),
    );

    GroupEditState {
        enabled: !lead.hidden,
        color: color::normalize(config.color.as_deref().unwrap_or("")),
        color_intensity: config.alpha.unwrap_or(DEFAULT_COLOR_INTENSITY),
        is_darkness_source,
        provides_vision: config.vision.unwrap_or(false),
        animation_kind,
        animation_speed: config.animation.speed.unwrap_or(DEFAULT_ANIMATION_SPEED),
        animation_intensity: config
            .animation
            .intensity
            .unwrap_or(DEFAULT_ANIMATION_INTENSITY),
        animation_reverse: config.animation.reverse.unwrap_or(false),
        animation_options,
    }
}

impl GroupEditState {
    /// Switch the darkness role while editing
    ///
    /// The animation options are recomputed for the new role. The selected animation kind is
    /// kept only if it is still one of the options, otherwise it is reset to none.
    pub fn set_darkness_source(
        &mut self,
        is_darkness_source: bool,
        catalog: &AnimationCatalog,
        l10n: &dyn Localization,
    ) {
        self.is_darkness_source = is_darkness_source;
        self.animation_options = animation::resolve(catalog, is_darkness_source, l10n);
        self.animation_kind = animation::select(&mut self.animation_options, &self.animation_kind);
    }

    /// Select an animation kind, falling back to none if it is not a valid option
    pub fn set_animation_kind(&mut self, kind: &str) {
        self.animation_kind = animation::select(&mut self.animation_options, kind);
    }

    /// Apply a submitted form to this state
    ///
    /// Keys follow the light configuration form: `enabled`, `color`, `alpha`, `darkness`,
    /// `vision`, `animation.type`, `animation.speed`, `animation.intensity` and
    /// `animation.reverse`. Missing keys keep their current value, unparsable numbers become
    /// NaN and are dealt with by [super::build]. The darkness role is applied before the
    /// animation kind, so the kind is checked against the options of the submitted role.
    pub fn apply_form(
        &mut self,
        submitted: &BTreeMap<String, String>,
        catalog: &AnimationCatalog,
        l10n: &dyn Localization,
    ) {
        let field = |key: &str| submitted.get(key).map(String::as_str);

        if let Some(value) = field("enabled") {
            self.enabled = form::parse_bool(value);
        }
        if let Some(value) = field("color") {
            self.color = value.to_owned();
        }
        if let Some(value) = field("alpha") {
            self.color_intensity = form::parse_number(value);
        }
        if let Some(value) = field("vision") {
            self.provides_vision = form::parse_bool(value);
        }
        if let Some(value) = field("darkness") {
            let is_darkness_source = form::parse_bool(value);
            if is_darkness_source != self.is_darkness_source {
                self.set_darkness_source(is_darkness_source, catalog, l10n);
            }
        }
        if let Some(value) = field("animation.type") {
            self.set_animation_kind(value.trim());
        }
        if let Some(value) = field("animation.speed") {
            self.animation_speed = form::parse_number(value);
        }
        if let Some(value) = field("animation.intensity") {
            self.animation_intensity = form::parse_number(value);
        }
        if let Some(value) = field("animation.reverse") {
            self.animation_reverse = form::parse_bool(value);
        }

        for key in submitted.keys() {
            if !form::FIELDS.contains(&key.as_str()) {
                warn!(key = %key, "ignoring unknown form field");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        group::{index, index::tests::*},
        l10n::NoTranslations,
        models::LightEntity,
    };

    fn group_of(lights: Vec<LightEntity>) -> Group {
        index(lights, &DefaultLabels)
            .into_iter()
            .next()
            .expect("no group")
    }

    #[test]
    fn defaults_for_absent_values() {
        let group = group_of(vec![light("a", Some("torches"))]);
        let state = project(&group, &AnimationCatalog::default(), &NoTranslations);

        assert!(state.enabled);
        assert_eq!(state.color, "#ffffff");
        assert_eq!(state.color_intensity, 0.5);
        assert!(!state.is_darkness_source);
        assert!(!state.provides_vision);
        assert_eq!(state.animation_kind, "");
        assert_eq!(state.animation_speed, 5.0);
        assert_eq!(state.animation_intensity, 5.0);
        assert!(!state.animation_reverse);
        assert!(state.animation_options[0].selected);
    }

    #[test]
    fn lead_wins() {
        let mut a = light("a", Some("torches"));
        a.hidden = true;
        a.config.color = Some("#ff0000".to_owned());
        a.config.alpha = Some(0.8);
        a.config.vision = Some(true);
        a.config.animation.kind = Some("pulse".to_owned());
        a.config.animation.speed = Some(3.0);
        a.config.animation.intensity = Some(7.0);
        a.config.animation.reverse = Some(true);

        let mut b = light("b", Some("torches"));
        b.config.color = Some("#00ff00".to_owned());

        let state = project(
            &group_of(vec![a, b]),
            &AnimationCatalog::default(),
            &NoTranslations,
        );

        // Not an aggregate: b is visible, but the lead is hidden
        assert!(!state.enabled);
        assert_eq!(state.color, "#ff0000");
        assert_eq!(state.color_intensity, 0.8);
        assert!(state.provides_vision);
        assert_eq!(state.animation_kind, "pulse");
        assert_eq!(state.animation_speed, 3.0);
        assert_eq!(state.animation_intensity, 7.0);
        assert!(state.animation_reverse);

        let selected: Vec<_> = state
            .animation_options
            .iter()
            .filter(|option| option.selected)
            .collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "pulse");
    }

    #[test]
    fn invalid_lead_color() {
        let mut a = light("a", Some("torches"));
        a.config.color = Some("orange".to_owned());

        let state = project(
            &group_of(vec![a]),
            &AnimationCatalog::default(),
            &NoTranslations,
        );
        assert_eq!(state.color, "#ffffff");
    }

    #[test]
    fn darkness_lead_uses_darkness_catalog() {
        let mut a = light("a", Some("gloom"));
        a.config.negative = Some(true);
        a.config.animation.kind = Some("flame".to_owned());

        let catalog = AnimationCatalog::default();
        let state = project(&group_of(vec![a]), &catalog, &NoTranslations);

        assert!(state.is_darkness_source);
        assert_eq!(state.animation_kind, "");
        assert_eq!(state.animation_options[0].value, "");
        assert!(state.animation_options[0].selected);
        assert_eq!(
            state.animation_options.len(),
            catalog.darkness.as_ref().unwrap().len() + 1
        );
    }

    #[test]
    fn toggle_darkness_mid_edit() {
        let mut a = light("a", Some("torches"));
        a.config.animation.kind = Some("flame".to_owned());

        let catalog = AnimationCatalog::default();
        let mut state = project(&group_of(vec![a]), &catalog, &NoTranslations);
        assert_eq!(state.animation_kind, "flame");

        state.set_darkness_source(true, &catalog, &NoTranslations);
        assert!(state.is_darkness_source);
        assert_eq!(state.animation_kind, "");
        assert_eq!(state.animation_options[0].value, "");
        assert!(state.animation_options[0].selected);

        state.set_animation_kind("roiling");
        state.set_darkness_source(false, &catalog, &NoTranslations);
        assert_eq!(state.animation_kind, "");

        // Without a darkness catalog, both roles share the light catalog
        let light_only = AnimationCatalog {
            darkness: None,
            ..Default::default()
        };
        state.set_animation_kind("flame");
        state.set_darkness_source(true, &light_only, &NoTranslations);
        assert_eq!(state.animation_kind, "flame");
    }

    #[test]
    fn apply_submitted_form() {
        let catalog = AnimationCatalog::default();
        let mut state = project(
            &group_of(vec![light("a", Some("torches"))]),
            &catalog,
            &NoTranslations,
        );

        let form: BTreeMap<String, String> = vec![
            ("enabled", "off"),
            ("color", "#123456"),
            ("alpha", "abc"),
            ("darkness", "true"),
            ("animation.type", "hole"),
            ("animation.speed", "7.4"),
            ("animation.reverse", "on"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        state.apply_form(&form, &catalog, &NoTranslations);

        assert!(!state.enabled);
        assert_eq!(state.color, "#123456");
        assert!(state.color_intensity.is_nan());
        assert!(state.is_darkness_source);
        assert_eq!(state.animation_kind, "hole");
        assert_eq!(state.animation_speed, 7.4);
        assert_eq!(state.animation_intensity, 5.0);
        assert!(state.animation_reverse);
    }
}
