#[macro_use]
extern crate tracing;

use std::{collections::BTreeMap, fmt::Write, path::PathBuf, sync::Arc};

use color_eyre::eyre::{self, WrapErr};
use structopt::StructOpt;
use tokio::runtime::Builder;

use light_groups::{
    color,
    config::Settings,
    group::Radius,
    l10n::{self, Localization, NoTranslations, Translations},
    manager::{GroupManager, Outcome},
    models::EntityId,
    store::{FileStore, TracingRenderer},
};

#[derive(Debug, StructOpt)]
struct Opts {
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u32,
    /// Settings file, defaults to the user's configuration directory
    #[structopt(short, long = "config")]
    config_path: Option<PathBuf>,
    /// Scene document holding the lights
    #[structopt(short, long, default_value = "scene.toml")]
    scene: PathBuf,
    /// JSON language file, overrides the settings
    #[structopt(long)]
    lang: Option<PathBuf>,
    #[structopt(long)]
    dump_config: bool,
    #[structopt(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// List light groups (default)
    List {
        #[structopt(long)]
        json: bool,
    },
    /// Enable every light of a group, or disable them with --off
    Toggle {
        group: String,
        #[structopt(long)]
        off: bool,
    },
    /// Invert the state of a group
    Flip { group: String },
    /// Edit the configuration of a group with key=value fields
    Edit {
        group: String,
        #[structopt(parse(try_from_str = parse_field), required = true)]
        fields: Vec<(String, String)>,
    },
    /// Set the color of every light of a group, as `#rrggbb`
    Recolor { group: String, color: String },
    /// Multiply the bright or dim radius of a group
    Scale {
        group: String,
        radius: Radius,
        multiplier: f64,
    },
    /// Move lights to a group, or out of their group with an empty label
    Assign {
        label: String,
        #[structopt(required = true)]
        ids: Vec<String>,
    },
}

fn parse_field(field: &str) -> Result<(String, String), String> {
    let (key, value) = field
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", field))?;

    Ok((key.trim().to_owned(), value.to_owned()))
}

async fn load_settings(opts: &Opts) -> eyre::Result<Settings> {
    let path = match &opts.config_path {
        Some(path) => Some(path.clone()),
        None => Settings::default_path().filter(|path| path.exists()),
    };

    match path {
        Some(path) => Settings::load_file(&path)
            .await
            .wrap_err_with(|| format!("failed to load settings from {}", path.display())),
        None => {
            debug!("no settings file, using defaults");
            Ok(Settings::default())
        }
    }
}

async fn list(manager: &GroupManager, json: bool) -> eyre::Result<()> {
    let groups = manager.groups().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    for view in &groups {
        let mut line = String::new();

        if let Some(rgb) = color::parse(&view.state.color) {
            color::write_swatch(rgb, &mut line)?;
            line.push(' ');
        }

        write!(
            line,
            "{} ({} lights, {})",
            view.name,
            view.member_ids.len(),
            if view.state.enabled { "on" } else { "off" }
        )?;

        if !view.state.animation_kind.is_empty() {
            write!(line, ", {}", view.state.animation_kind)?;
        }

        println!("{}", line);
    }

    Ok(())
}

async fn run(opts: Opts) -> eyre::Result<()> {
    let settings = load_settings(&opts).await?;

    // Dump configuration if this was asked
    if opts.dump_config {
        print!("{}", settings.to_string()?);
        return Ok(());
    }

    let l10n: Arc<dyn Localization> = match opts.lang.as_ref().or(settings.language.as_ref()) {
        Some(path) => Arc::new(
            Translations::load_file(path)
                .await
                .wrap_err_with(|| format!("failed to load translations from {}", path.display()))?,
        ),
        None => Arc::new(NoTranslations),
    };

    let store = FileStore::load(&opts.scene, settings.label_flag())
        .await
        .wrap_err_with(|| format!("failed to load scene from {}", opts.scene.display()))?;
    let scene_id = store.scene().await.id;

    let settings = Arc::new(settings);
    let manager = GroupManager::new(
        scene_id,
        Arc::new(store),
        Arc::new(TracingRenderer),
        l10n.clone(),
        settings.clone(),
    );

    let outcome = match opts.command.unwrap_or(Command::List { json: false }) {
        Command::List { json } => return list(&manager, json).await,
        Command::Toggle { group, off } => manager.toggle(&group, !off).await?,
        Command::Flip { group } => manager.flip(&group).await?,
        Command::Edit { group, fields } => {
            let view = manager
                .groups()
                .await?
                .into_iter()
                .find(|view| view.name == group.trim());

            match view {
                Some(view) => {
                    let mut state = view.state;
                    let fields: BTreeMap<_, _> = fields.into_iter().collect();
                    state.apply_form(&fields, &settings.animations, &*l10n);

                    manager.submit(&group, &state).await?
                }
                None => Outcome::Unchanged { group },
            }
        }
        Command::Recolor { group, color } => manager.recolor(&group, &color).await?,
        Command::Scale {
            group,
            radius,
            multiplier,
        } => manager.scale(&group, radius, multiplier).await?,
        Command::Assign { label, ids } => {
            let ids: Vec<_> = ids.into_iter().map(EntityId::from).collect();
            manager.assign(&ids, &label).await?
        }
    };

    match outcome {
        Outcome::Applied { notice, .. } => println!("{}", notice),
        Outcome::Unchanged { group } => println!(
            "{}",
            l10n::format(
                &*l10n,
                "LIGHTGROUPS.NoticeEmpty",
                "{group}: no lights in this group",
                &[("group", &group)],
            )
        ),
    }

    Ok(())
}

fn install_tracing(opts: &Opts) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let fmt_layer = fmt::layer().with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_env("LIGHT_GROUPS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match opts.verbose {
            0 => "light_groups=warn,light_groupsd=warn",
            1 => "light_groups=info,light_groupsd=info",
            2 => "light_groups=debug,light_groupsd=debug",
            _ => "light_groups=trace,light_groupsd=trace",
        })
    });

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
}

#[paw::main]
fn main(opts: Opts) -> eyre::Result<()> {
    color_eyre::install()?;
    install_tracing(&opts)?;

    let thd_count = match num_cpus::get() {
        1 => 2,
        other => other.min(4),
    };

    let rt = Builder::new_multi_thread()
        .worker_threads(thd_count)
        .enable_all()
        .build()?;
    rt.block_on(run(opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_form_fields() {
        assert_eq!(
            parse_field("animation.type=pulse"),
            Ok(("animation.type".to_owned(), "pulse".to_owned()))
        );
        assert_eq!(
            parse_field("color=#ff0000"),
            Ok(("color".to_owned(), "#ff0000".to_owned()))
        );
        assert_eq!(parse_field("color = "), Ok(("color".to_owned(), " ".to_owned())));
        assert!(parse_field("color").is_err());
    }

    #[test]
    fn parse_commands() {
        let opts = Opts::from_iter(&["light-groupsd", "-vv", "scale", "torches", "dim", "1.5"]);
        assert_eq!(opts.verbose, 2);
        assert!(matches!(
            opts.command,
            Some(Command::Scale { radius: Radius::Dim, multiplier, .. }) if (multiplier - 1.5).abs() < f64::EPSILON
        ));

        let opts = Opts::from_iter(&["light-groupsd", "recolor", "torches", "#00ff00"]);
        assert!(matches!(
            opts.command,
            Some(Command::Recolor { ref group, ref color }) if group == "torches" && color == "#00ff00"
        ));

        let opts = Opts::from_iter(&["light-groupsd", "edit", "torches", "alpha=0.2", "vision=on"]);
        match opts.command {
            Some(Command::Edit { group, fields }) => {
                assert_eq!(group, "torches");
                assert_eq!(fields.len(), 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
