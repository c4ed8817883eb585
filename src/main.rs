// Inherit lint configuration from lib.rs for consistency
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value
)]

use clap::Parser;
use rayon::prelude::*;

use testdoc::cli::commands::{Cli, Command, ProjectArgs};
use testdoc::cli::output::{self, ClassReport, InitReport, LocateReport};
use testdoc::config::Config;
use testdoc::discovery::Discovery;
use testdoc::error::TestDocError;
use testdoc::markers::TestMarkers;
use testdoc::reflect::{ClassPath, Runtime};
use testdoc::source::SourceLocator;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries the JSON result.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::fmt::Display>> {
    match cli.command {
        Command::Discover {
            classes,
            project,
            markers,
            lenient,
        } => cmd_discover(&classes, &project, markers, lenient),
        Command::Locate { class, project } => cmd_locate(&class, &project),
        Command::Markers { root } => cmd_markers(root.as_deref()),
        Command::Init { path } => cmd_init(&path),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

fn get_config(root: Option<&str>) -> Result<Config, Box<dyn std::fmt::Display>> {
    match root {
        Some(root) => Ok(Config::new(root)),
        None => Config::from_cwd().map_err(map_err),
    }
}

fn project_config(project: &ProjectArgs) -> Result<Config, Box<dyn std::fmt::Display>> {
    let mut config = get_config(project.root.as_deref())?;
    if !project.classpath.is_empty() {
        config.settings.discovery.classpath = project.classpath.clone();
    }
    Ok(config)
}

fn cmd_discover(
    classes: &[String],
    project: &ProjectArgs,
    markers: Vec<String>,
    lenient: bool,
) -> CmdResult {
    let mut config = project_config(project)?;
    if lenient {
        config.settings.parse.strict = false;
    }

    let markers = markers
        .into_iter()
        .fold(config.markers(), TestMarkers::with_marker);
    let discovery = Discovery::from_config(ClassPath::new(config.classpath_roots()), &config)
        .with_markers(markers);
    let reports = classes
        .par_iter()
        .map(|class| {
            discovery.discover_name(class).map(|methods| ClassReport {
                class: class.clone(),
                methods,
            })
        })
        .collect::<testdoc::error::Result<Vec<_>>>()
        .map_err(map_err)?;

    println!("{}", output::format_json(&reports));
    Ok(())
}

fn cmd_locate(class: &str, project: &ProjectArgs) -> CmdResult {
    let config = project_config(project)?;
    let runtime = ClassPath::new(config.classpath_roots());
    let identity = runtime
        .load_class(class)
        .map_err(map_err)?
        .ok_or_else(|| {
            map_err(TestDocError::ClassNotFound {
                name: class.to_string(),
            })
        })?;

    let report = LocateReport {
        class: class.to_string(),
        source: SourceLocator::from_config(&config).locate(&runtime, &identity),
    };
    println!("{}", output::format_json(&report));
    Ok(())
}

fn cmd_markers(root: Option<&str>) -> CmdResult {
    let config = get_config(root)?;
    let markers: Vec<String> = config.markers().iter().map(str::to_string).collect();
    println!("{}", output::format_json(&markers));
    Ok(())
}

fn cmd_init(path: &str) -> CmdResult {
    let config = Config::new(path);
    let created = !config.config_path.exists();
    if created {
        config.save_settings().map_err(map_err)?;
    }
    let report = InitReport {
        config_path: config.config_path.clone(),
        created,
    };
    println!("{}", output::format_json(&report));
    Ok(())
}
