//! Ferry CLI
//!
//! Loads a symbol model exported by a front end, resolves the binding of
//! every member and reports the emission plans and diagnostics.

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser};
use ferry_plan::{CallSite, PlanBuilder, UnitReport, compile_unit};
use ferry_symbols::{Diagnostic, Severity, SymbolModel};
use ferry_template::Expr;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

mod args;
mod config;
mod render;

use args::{Cli, Command};
use config::FerryConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.as_str())),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut config = FerryConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);
    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    }
    debug!(?config, "configuration loaded");

    match &cli.command {
        Command::Plan { model } => {
            let model = load_model(model)?;
            let report = compile_unit(&model, &config.resolve);
            print!("{}", report.pretty_print(&model));
            finish(&report)
        }
        Command::Check { model } => {
            let model = load_model(model)?;
            let report = compile_unit(&model, &config.resolve);
            finish(&report)
        }
        Command::Expand {
            model,
            member,
            receiver,
            args,
        } => {
            let model = load_model(model)?;
            expand(&model, &config, member, receiver.as_deref(), args)
        }
        Command::PrintDefaultConfig => {
            println!("# Default ferry configuration");
            println!("# Save this as {} or pass it with --config", config::DEFAULT_CONFIG);
            print!("{}", serde_yaml::to_string(&FerryConfig::default())?);
            Ok(())
        }
        Command::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "ferry", &mut io::stdout());
            Ok(())
        }
    }
}

fn load_model(path: &Path) -> anyhow::Result<SymbolModel> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let model: SymbolModel = serde_json::from_str(&text)
        .with_context(|| format!("invalid symbol model in {}", path.display()))?;
    info!(
        assembly = %model.assembly.name,
        types = model.types().len(),
        members = model.members().len(),
        "symbol model loaded"
    );
    Ok(model)
}

/// Render every diagnostic; fail when any of them is an error
fn finish(report: &UnitReport) -> anyhow::Result<()> {
    for diagnostic in report.diagnostics() {
        render::render(diagnostic)?;
    }
    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    if errors > 0 {
        bail!("binding resolution failed with {} error(s) and {} warning(s)", errors, warnings);
    }
    eprintln!("ok: {} plan(s), {} warning(s)", report.plans().count(), warnings);
    Ok(())
}

fn expand(
    model: &SymbolModel,
    config: &FerryConfig,
    path: &str,
    receiver: Option<&str>,
    args: &[String],
) -> anyhow::Result<()> {
    let member = model
        .find_member(path)
        .with_context(|| format!("no member `{}` in the symbol model", path))?;
    let builder = PlanBuilder::new(model, &config.resolve);
    let plan = match builder.build_plan(member.id) {
        Ok(plan) => plan,
        Err(error) => {
            render::render(&Diagnostic::error(error))?;
            bail!("cannot expand {}", model.display_member(member.id));
        }
    };

    let receiver = receiver.map(Expr::new);
    let args: Vec<Expr> = args.iter().map(|a| Expr::new(a.as_str())).collect();
    match plan.expand(receiver.as_ref(), &args)? {
        CallSite::Expression(expr) => println!("{}", expr),
        CallSite::Name { name, is_static, accessor_kind, namespace } => {
            let scope = if is_static { "static" } else { "instance" };
            match namespace {
                Some(ns) => println!("{} ({} {} access in {})", name, scope, accessor_kind, ns),
                None => println!("{} ({} {} access)", name, scope, accessor_kind),
            }
        }
    }
    Ok(())
}
