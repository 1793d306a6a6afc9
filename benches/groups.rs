use criterion::{criterion_group, criterion_main, Criterion};

use light_groups::{
    config::{Settings, DEFAULT_FLAG_KEY, DEFAULT_FLAG_NAMESPACE},
    group,
    l10n::NoTranslations,
    models::{LightEntity, Scene},
    store::{FlagLabels, MemoryStore},
};

const KINDS: &[&str] = &["flame", "pulse", "chroma", "fog", "wave"];

fn scene(lights: usize, groups: usize) -> Scene {
    let lights = (0..lights)
        .map(|i| {
            let mut light = LightEntity::new(format!("light-{:05}", i));
            light.config.color = Some(format!("#{:06x}", (i * 7919) % 0x100_0000));
            light.config.bright = Some((i % 20) as f64);
            light.config.animation.kind = Some(KINDS[i % KINDS.len()].to_owned());

            // Leave some lights out of any group
            if i % 10 != 0 {
                light.flags.set(
                    DEFAULT_FLAG_NAMESPACE,
                    DEFAULT_FLAG_KEY,
                    serde_json::Value::String(format!("Group {}", i % groups)),
                );
            }

            light
        })
        .collect();

    Scene {
        id: "bench".to_owned(),
        lights,
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let settings = Settings::default();
    let (lights, groups) = (5000, 50);
    let scene = scene(lights, groups);
    let store = MemoryStore::new(scene.clone());
    let labels = FlagLabels::new(&store, settings.label_flag());

    c.bench_function(&format!("index {} lights {} groups", lights, groups), |b| {
        b.iter(|| group::index(scene.lights.iter().cloned(), &labels))
    });

    let index = group::index(scene.lights.iter().cloned(), &labels);

    c.bench_function(&format!("project and build {} groups", groups), |b| {
        b.iter(|| {
            index
                .iter()
                .map(|group| {
                    let state = group::project(group, &settings.animations, &NoTranslations);
                    group::build(group, &state).len()
                })
                .sum::<usize>()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
