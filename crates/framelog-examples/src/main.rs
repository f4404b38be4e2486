use std::io;

use facet::Facet;
use figue as args;
use framelog::{
    Console, IntervalFrames, ProfilerConfig, SnapshotSchema, TextConsole, TracingConsole,
    profile_frame,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod canvas;
mod scenarios;

use canvas::Canvas2d;
use scenarios::Draw;

type AnyResult<T> = Result<T, String>;

#[derive(Facet, Debug)]
struct Cli {
    #[facet(flatten)]
    builtins: args::FigueBuiltins,
    /// Print the reconstructed plan as JSON on stdout.
    #[facet(args::named, default)]
    json: bool,
    /// Color the text trace.
    #[facet(args::named, default)]
    ansi: bool,
    /// Send the trace through `tracing` instead of printing it.
    #[facet(args::named, default)]
    via_tracing: bool,
    #[facet(args::named, default)]
    scale: Option<f64>,
    #[facet(args::named, default)]
    scope_open: Option<String>,
    #[facet(args::named, default)]
    scope_close: Option<String>,
    /// Comma-separated property names to track.
    #[facet(args::named, default)]
    fields: Option<String>,
    #[facet(args::named, default)]
    width: Option<u32>,
    #[facet(args::named, default)]
    height: Option<u32>,
    #[facet(args::subcommand)]
    command: CommandKind,
}

#[derive(Facet, Debug)]
#[repr(u8)]
enum CommandKind {
    NestedScopes,
    StyleChurn,
    UnbalancedScopes,
    DashedText,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> AnyResult<()> {
    let cli = parse_cli()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = config_from_cli(&cli);
    let mut canvas = Canvas2d::new(cli.width.unwrap_or(64), cli.height.unwrap_or(48));
    let mut frames = IntervalFrames::sixty_hz();

    let mut console: Box<dyn Console> = if cli.via_tracing {
        Box::new(TracingConsole::new())
    } else if cli.json {
        Box::new(TextConsole::new(io::stderr()).with_ansi(cli.ansi))
    } else {
        Box::new(TextConsole::new(io::stdout()).with_ansi(cli.ansi))
    };

    let draw = dispatch_command(&cli.command);
    let report = profile_frame(&mut canvas, &config, &mut frames, &mut *console, draw)
        .await
        .map_err(|e| format!("{:?} failed: {e}", cli.command))?;

    info!(
        frame = report.frame,
        calls = report.plan.stats.calls,
        changed_fields = report.plan.stats.changed_fields,
        anomalies = report.plan.anomalies.len(),
        elapsed_us = report.elapsed.as_micros() as u64,
        "frame profiled"
    );

    if cli.json {
        let json = facet_json::to_string(&report.plan)
            .map_err(|e| format!("failed to encode plan: {e}"))?;
        println!("{json}");
    }

    Ok(())
}

fn parse_cli() -> AnyResult<Cli> {
    let figue_config = args::builder::<Cli>()
        .map_err(|e| format!("failed to build CLI schema: {e}"))?
        .cli(|cli| cli.strict())
        .help(|h| {
            h.program_name("framelog-examples")
                .description("Profile one frame of a drawing scenario and print its trace")
                .version(option_env!("CARGO_PKG_VERSION").unwrap_or("dev"))
        })
        .build();

    args::Driver::new(figue_config)
        .run()
        .into_result()
        .map(|v| v.value)
        .map_err(|e| e.to_string())
}

/// Flags win over `FRAMELOG_*` variables, which win over defaults.
fn config_from_cli(cli: &Cli) -> ProfilerConfig {
    apply_flags(
        ProfilerConfig::from_env(),
        cli.scale,
        cli.scope_open.as_deref(),
        cli.scope_close.as_deref(),
        cli.fields.as_deref(),
    )
}

fn apply_flags(
    mut config: ProfilerConfig,
    scale: Option<f64>,
    scope_open: Option<&str>,
    scope_close: Option<&str>,
    fields: Option<&str>,
) -> ProfilerConfig {
    if let Some(scale) = scale.filter(|s| s.is_finite() && *s > 0.0) {
        config.image_scale = scale;
    }
    if let Some(name) = scope_open.filter(|v| !v.is_empty()) {
        config.reconstruct.scope_open = name.to_owned();
    }
    if let Some(name) = scope_close.filter(|v| !v.is_empty()) {
        config.reconstruct.scope_close = name.to_owned();
    }
    if let Some(schema) = fields.and_then(SnapshotSchema::from_list) {
        config.schema = schema;
    }

    config
}

fn dispatch_command(command: &CommandKind) -> Draw {
    match command {
        CommandKind::NestedScopes => scenarios::nested_scopes::draw,
        CommandKind::StyleChurn => scenarios::style_churn::draw,
        CommandKind::UnbalancedScopes => scenarios::unbalanced_scopes::draw,
        CommandKind::DashedText => scenarios::dashed_text::draw,
    }
}
