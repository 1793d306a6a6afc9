use parse_display::{Display, FromStr};

use super::{Group, GroupEditState};
use crate::{
    color,
    models::{AnimationPatch, ConfigPatch, EntityId, GroupLabel, LightPatch},
};

/// Bound `value` to `[lo, hi]`. NaN maps to `lo`.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.max(lo).min(hi)
    }
}

/// Patches making every member of `group` match the edited state
///
/// Every patch carries the same values: this is not a diff against the current members.
pub fn build(group: &Group, edited: &GroupEditState) -> Vec<LightPatch> {
    let config = ConfigPatch {
        color: Some(color::normalize(&edited.color)),
        alpha: Some(clamp(edited.color_intensity, 0., 1.)),
        darkness: Some(edited.is_darkness_source),
        negative: Some(edited.is_darkness_source),
        vision: Some(edited.provides_vision),
        animation: Some(AnimationPatch {
            kind: Some(edited.animation_kind.trim())
                .filter(|kind| !kind.is_empty())
                .map(str::to_owned),
            speed: clamp(edited.animation_speed.round(), 1., 10.),
            intensity: clamp(edited.animation_intensity, 1., 10.),
            reverse: edited.animation_reverse,
        }),
        ..Default::default()
    };

    group
        .member_ids()
        .map(|id| LightPatch {
            hidden: Some(!edited.enabled),
            config: Some(config.clone()),
            ..LightPatch::new(id.clone())
        })
        .collect()
}

/// Patches enabling or disabling every member, leaving all other fields untouched
pub fn toggle(group: &Group, enabled: bool) -> Vec<LightPatch> {
    group
        .member_ids()
        .map(|id| LightPatch {
            hidden: Some(!enabled),
            ..LightPatch::new(id.clone())
        })
        .collect()
}

/// Patches inverting the lead member's visibility on every member
pub fn flip(group: &Group) -> Vec<LightPatch> {
    toggle(group, group.lead().hidden)
}

/// Patches setting the color of every member, leaving all other fields untouched
///
/// The color is normalized first, so an invalid token sets [color::FALLBACK_COLOR].
pub fn recolor(group: &Group, color: &str) -> Vec<LightPatch> {
    let color = color::normalize(color);

    group
        .member_ids()
        .map(|id| LightPatch {
            config: Some(ConfigPatch {
                color: Some(color.clone()),
                ..Default::default()
            }),
            ..LightPatch::new(id.clone())
        })
        .collect()
}

/// Light radius that can be scaled on a whole group
#[derive(Display, FromStr, Debug, Clone, Copy, PartialEq, Eq)]
#[display(style = "lowercase")]
pub enum Radius {
    Bright,
    Dim,
}

/// Patches multiplying a radius of every member by `multiplier`
///
/// Each member is scaled from its own current radius, missing radii count as zero and results
/// never go below zero. A NaN multiplier yields zero.
pub fn scale(group: &Group, radius: Radius, multiplier: f64) -> Vec<LightPatch> {
    group
        .members()
        .iter()
        .map(|member| {
            let current = match radius {
                Radius::Bright => member.config.bright,
                Radius::Dim => member.config.dim,
            }
            .unwrap_or(0.);

            let scaled = clamp(current * multiplier, 0., f64::INFINITY);

            let config = match radius {
                Radius::Bright => ConfigPatch {
                    bright: Some(scaled),
                    ..Default::default()
                },
                Radius::Dim => ConfigPatch {
                    dim: Some(scaled),
                    ..Default::default()
                },
            };

            LightPatch {
                config: Some(config),
                ..LightPatch::new(member.id.clone())
            }
        })
        .collect()
}

/// Patches moving the given lights into the group `label`
///
/// A blank label removes the lights from their group.
pub fn assign<'a>(ids: impl IntoIterator<Item = &'a EntityId>, label: &str) -> Vec<LightPatch> {
    let label = GroupLabel::from(label).name().map(str::to_owned);

    ids.into_iter()
        .map(|id| LightPatch {
            group_label: Some(label.clone()),
            ..LightPatch::new(id.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::AnimationCatalog,
        group::{index, index::tests::*, project},
        l10n::NoTranslations,
        models::LightEntity,
    };

    fn torches() -> Group {
        let mut a = light("a", Some("torches"));
        a.config.color = Some("#ff0000".to_owned());
        a.config.bright = Some(10.);
        a.config.dim = Some(20.);
        let mut b = light("b", Some("torches"));
        b.hidden = true;
        b.config.bright = Some(4.);
        let c = light("c", Some(""));

        index(vec![a, b, c], &DefaultLabels)
            .into_iter()
            .next()
            .expect("no group")
    }

    fn edited(group: &Group) -> GroupEditState {
        project(group, &AnimationCatalog::default(), &NoTranslations)
    }

    fn ids(patches: &[LightPatch]) -> Vec<&str> {
        patches.iter().map(|patch| patch.id.0.as_str()).collect()
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(f64::NAN, 1., 10.), 1.);
        assert_eq!(clamp(15., 1., 10.), 10.);
        assert_eq!(clamp(0.3, 0., 1.), 0.3);
        assert_eq!(clamp(-2., 0., 1.), 0.);
        assert_eq!(clamp(f64::INFINITY, 1., 10.), 10.);
    }

    #[test]
    fn build_same_values_for_all_members() {
        let group = torches();
        let mut state = edited(&group);
        state.enabled = false;
        state.color = " #00FF00 ".to_owned();
        state.color_intensity = 1.5;
        state.is_darkness_source = true;
        state.provides_vision = true;
        state.animation_kind = "pulse".to_owned();
        state.animation_speed = 7.6;
        state.animation_intensity = f64::NAN;
        state.animation_reverse = true;

        let patches = build(&group, &state);
        assert_eq!(ids(&patches), vec!["a", "b"]);

        for patch in &patches {
            assert_eq!(patch.hidden, Some(true));
            assert_eq!(patch.group_label, None);

            let config = patch.config.as_ref().expect("missing config patch");
            assert_eq!(config.color.as_deref(), Some("#00FF00"));
            assert_eq!(config.alpha, Some(1.));
            assert_eq!(config.darkness, Some(true));
            assert_eq!(config.negative, Some(true));
            assert_eq!(config.vision, Some(true));
            assert_eq!(config.bright, None);
            assert_eq!(config.dim, None);

            let animation = config.animation.as_ref().expect("missing animation patch");
            assert_eq!(animation.kind.as_deref(), Some("pulse"));
            assert_eq!(animation.speed, 8.);
            assert_eq!(animation.intensity, 1.);
            assert!(animation.reverse);
        }

        assert_eq!(patches[0].config, patches[1].config);
    }

    #[test]
    fn build_falls_back_on_invalid_values() {
        let group = torches();
        let mut state = edited(&group);
        state.color = "red".to_owned();
        state.color_intensity = f64::NAN;
        state.animation_kind = String::new();
        state.animation_speed = f64::NAN;
        state.animation_intensity = 42.;

        let patches = build(&group, &state);
        let config = patches[0].config.as_ref().unwrap();
        assert_eq!(config.color.as_deref(), Some("#ffffff"));
        assert_eq!(config.alpha, Some(0.));

        let animation = config.animation.as_ref().unwrap();
        assert_eq!(animation.kind, None);
        assert_eq!(animation.speed, 1.);
        assert_eq!(animation.intensity, 10.);
    }

    #[test]
    fn build_is_idempotent() {
        let group = torches();
        let mut state = edited(&group);
        state.color_intensity = f64::NAN;

        assert_eq!(build(&group, &state), build(&group, &state));
    }

    #[test]
    fn toggle_only_hidden() {
        let group = torches();
        let patches = toggle(&group, false);

        assert_eq!(ids(&patches), vec!["a", "b"]);
        for patch in &patches {
            assert_eq!(
                serde_json::to_value(patch).unwrap(),
                serde_json::json!({ "_id": patch.id.0, "hidden": true })
            );
        }

        assert!(toggle(&group, true)
            .iter()
            .all(|patch| patch.hidden == Some(false) && patch.config.is_none()));
    }

    #[test]
    fn flip_follows_lead() {
        // Lead "a" is visible, "b" is hidden: both end up hidden
        let patches = flip(&torches());
        assert!(patches.iter().all(|patch| patch.hidden == Some(true)));
    }

    #[test]
    fn recolor_only_color() {
        let group = torches();

        let patches = recolor(&group, " #0000ff ");
        assert_eq!(ids(&patches), vec!["a", "b"]);
        for patch in &patches {
            assert_eq!(
                serde_json::to_value(patch).unwrap(),
                serde_json::json!({ "_id": patch.id.0, "config": { "color": "#0000ff" } })
            );
        }

        let patches = recolor(&group, "blue");
        assert_eq!(
            patches[0].config.as_ref().unwrap().color.as_deref(),
            Some(color::FALLBACK_COLOR)
        );
    }

    #[test]
    fn scale_each_member() {
        let group = torches();

        let patches = scale(&group, Radius::Bright, 1.5);
        assert_eq!(ids(&patches), vec!["a", "b"]);
        assert_eq!(patches[0].config.as_ref().unwrap().bright, Some(15.));
        assert_eq!(patches[1].config.as_ref().unwrap().bright, Some(6.));
        assert_eq!(patches[0].config.as_ref().unwrap().dim, None);
        assert_eq!(patches[0].hidden, None);

        let patches = scale(&group, Radius::Dim, 0.5);
        assert_eq!(patches[0].config.as_ref().unwrap().dim, Some(10.));
        assert_eq!(patches[1].config.as_ref().unwrap().dim, Some(0.));

        let patches = scale(&group, Radius::Bright, -1.);
        assert_eq!(patches[0].config.as_ref().unwrap().bright, Some(0.));

        let patches = scale(&group, Radius::Bright, f64::NAN);
        assert_eq!(patches[0].config.as_ref().unwrap().bright, Some(0.));
    }

    #[test]
    fn parse_radius() {
        assert_eq!("bright".parse::<Radius>().unwrap(), Radius::Bright);
        assert_eq!("dim".parse::<Radius>().unwrap(), Radius::Dim);
        assert!("wide".parse::<Radius>().is_err());
    }

    #[test]
    fn assign_labels() {
        let lights = vec![LightEntity::new("x"), LightEntity::new("y")];
        let ids: Vec<_> = lights.iter().map(|light| &light.id).collect();

        let patches = assign(ids.iter().copied(), "  street ");
        assert_eq!(patches.len(), 2);
        assert!(patches
            .iter()
            .all(|patch| patch.group_label == Some(Some("street".to_owned()))
                && patch.hidden.is_none()
                && patch.config.is_none()));

        let patches = assign(ids.iter().copied(), "   ");
        assert!(patches
            .iter()
            .all(|patch| patch.group_label == Some(None)));
    }
}
