mod args;
mod context;
mod error;
mod manifest;
mod result;
mod tpl;
mod utils;
mod xpi;

use args::Args;
use context::Context;
use manifest::Manifest;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    let Args {
        verbose,
        sorted,
        path,
        manifest: xpi_manifest,
    } = Args::parse();

    let base_dir = utils::resolve_base_dir(path.as_deref())?;
    let ctx = Context::new(base_dir, verbose);

    cliclack::intro("build-xpi")?;

    let mut manifest = {
        let spinner = cliclack::spinner();
        spinner.start("Loading packaging configuration...");
        let result = if let Some(config_path) = xpi_manifest {
            Manifest::load_with_config(&ctx, &config_path)
        } else {
            Manifest::load(&ctx)
        };
        match result {
            Ok(m) => {
                spinner.stop(format!("Packaging {}", m.title));
                m
            }
            Err(e) => {
                spinner.error("Failed to load packaging configuration");
                return Err(e);
            }
        }
    };
    manifest.sort |= sorted;

    let report = xpi::build(&ctx, &manifest)?;

    let summary = format!(
        "{} ready ({} entries, {} bytes)",
        manifest.output,
        report.entries.len(),
        report.size
    );
    if report.missing.is_empty() {
        cliclack::outro(summary)?;
    } else {
        cliclack::outro(format!("{summary}, {} root files missing", report.missing.len()))?;
    }
    Ok(())
}
