//! Application orchestrator.
//! Loads/merges config, initializes logging, validates the root, and runs the
//! rename and prune phases selected by the run mode.

use anyhow::{Context, Result};
use tracing::{error, info};

use sia_reshard::cli::{Args, RunMode};
use sia_reshard::output as out;
use sia_reshard::platform::open_append_with_mode;
use sia_reshard::{default_config_path, delete_empty_dirs, load_config, Renamer, ReshardError};

use crate::logging::init_tracing;

const DIR_LOG_PERM: u32 = 0o666;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location(&args);
        return Ok(());
    }

    let (mut cfg, cfg_path) = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut cfg)?;

    let guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e:#}"));
    })?;

    if let Some(p) = &cfg_path {
        info!(path = %p.display(), "Loaded config");
    }

    let mode = args.run_mode();
    let result = (|| -> Result<()> {
        cfg.validate()?;

        if mode == RunMode::Full {
            out::print_info("Executing Rename and Delete");
            let mut dir_log = open_append_with_mode(&cfg.dir_log, DIR_LOG_PERM)
                .with_context(|| format!("open dir log '{}'", cfg.dir_log.display()))?;
            let summary = Renamer::new(cfg.shape).rename_all(&mut dir_log, &cfg.root)?;
            out::print_rename_summary(&summary);
        } else {
            out::print_info("Executing Delete Only");
        }

        let summary = delete_empty_dirs(&cfg.root)?;
        out::print_prune_summary(&summary);
        Ok(())
    })();

    if let Err(e) = &result {
        report_failure(e);
    }

    // flush the file appender before exit
    drop(guard);
    result
}

fn print_config_location(args: &Args) {
    if let Some(p) = &args.config {
        out::print_info(&format!("Using --config (explicit):\n  {}", p.display()));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("sia_reshard config path:\n  {}", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there; built-in defaults are used.");
            }
        }
        None => out::print_error("Could not determine a config path"),
    }
}

fn report_failure(e: &anyhow::Error) {
    let msg = format!("{e:#}");
    if let Some(re) = e.downcast_ref::<ReshardError>() {
        let path = re.path().map(|p| p.display().to_string()).unwrap_or_default();
        error!(code = re.code(), kind = re.kind(), path = %path, error = %msg, "Reshard failed");
    } else {
        error!(error = %msg, "Reshard failed");
    }
    out::print_error(&msg);
}
