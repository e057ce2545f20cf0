//! Slide Plan CLI
//!
//! Usage:
//!   slide-plan [OPTIONS] --context <FILE> [PLAN]
//!
//! Options:
//!   -c, --context <FILE>      Slide context snapshot (JSON)
//!       --config <FILE>       Engine configuration (TOML format)
//!       --disable <CAP>       Simulate a host without a capability (repeatable)
//!       --lint                Report overlaps and off-slide shapes after applying
//!       --emit-canvas         Print the resulting canvas
//!       --check               Validate plan and context without applying
//!   -v, --verbose             Log engine events at debug level
//!   -h, --help                Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::json;

use slide_plan::model::{validate_context, validate_plan};
use slide_plan::{
    lint, Capability, CanvasHost, EngineConfig, ExecutionPlan, MemoryCanvas, PlanApplier, SlideContext, TracingSink,
};

#[derive(Parser)]
#[command(name = "slide-plan")]
#[command(about = "Apply an execution plan to a simulated slide")]
struct Cli {
    /// Execution plan file (reads from stdin if not provided)
    plan: Option<PathBuf>,

    /// Slide context snapshot (JSON)
    #[arg(short, long)]
    context: PathBuf,

    /// Engine configuration file (TOML format)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulate a host without this capability, e.g. add-chart
    #[arg(long, value_name = "CAPABILITY")]
    disable: Vec<Capability>,

    /// Report overlaps and off-slide shapes after applying
    #[arg(long)]
    lint: bool,

    /// Print the resulting canvas
    #[arg(long)]
    emit_canvas: bool,

    /// Validate plan and context without applying
    #[arg(long)]
    check: bool,

    /// Log engine events at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "slide_plan=debug" } else { "slide_plan=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(message) = run(cli) {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .map_err(|e| format!("loading config '{}': {}", path.display(), e))?,
        None => EngineConfig::default(),
    };
    let config = cli.disable.iter().fold(config, |config, cap| config.disable(*cap));

    let context_source = fs::read_to_string(&cli.context)
        .map_err(|e| format!("reading context '{}': {}", cli.context.display(), e))?;
    let context = SlideContext::from_json(&context_source).map_err(|e| format!("malformed slide context: {}", e))?;

    let plan_source = match &cli.plan {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("reading plan '{}': {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("reading from stdin: {}", e))?;
            buffer
        }
    };
    let plan = ExecutionPlan::from_json(&plan_source).map_err(|e| format!("malformed execution plan: {}", e))?;

    if cli.check {
        return check(&plan, &context);
    }

    let mut canvas = MemoryCanvas::from_context(&context);
    let applier = PlanApplier::new(config).with_sink(Arc::new(TracingSink));
    let report = applier
        .apply_detailed(&plan, &context, &mut canvas)
        .map_err(|e| e.to_string())?;

    let mut output = json!({
        "appliedCount": report.result.applied_count,
        "warnings": report.result.warnings,
    });
    if cli.verbose {
        output["outcomes"] = json!(report.outcomes);
    }
    if cli.emit_canvas {
        output["canvas"] = json!(canvas);
    }
    if cli.lint {
        let margin = applier.config().layout.margin;
        output["lint"] = json!(lint::check(&canvas.shapes(), context.slide_size(), margin));
    }

    let rendered = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
    println!("{}", rendered);
    Ok(())
}

/// Print validation findings; fail when the plan or context has errors
fn check(plan: &ExecutionPlan, context: &SlideContext) -> Result<(), String> {
    let plan_report = validate_plan(plan);
    let context_report = validate_context(context);
    let valid = plan_report.is_valid() && context_report.is_valid();

    let output = json!({
        "valid": valid,
        "errors": plan_report.errors.iter().chain(&context_report.errors).collect::<Vec<_>>(),
        "warnings": plan_report.warnings.iter().chain(&context_report.warnings).collect::<Vec<_>>(),
    });
    let rendered = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
    println!("{}", rendered);

    if valid {
        Ok(())
    } else {
        Err("validation failed".to_string())
    }
}
