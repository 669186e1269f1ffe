use crate::config::config::SourceboxConfig;
use crate::config::types::HarnessError;
use crate::figure::{FigureEmitter, FigureRegistry};
use crate::harness::report::Report;
use crate::harness::runner::JsonTestRunner;
use crate::manifest::load_tests_module;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Printed when `tester` is started without a project directory
pub const NO_PROJECT_MESSAGE: &str = "No project path supplied for the tester";
/// Printed when the project's `tests` module cannot be loaded
pub const NO_TESTS_MESSAGE: &str = "No tests were created.";
/// Printed when the `tests` module does not define exactly one test case
pub const INVALID_TESTS_MESSAGE: &str = "Invalid tests.";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CliMode {
    /// Grade a project and emit the JSON report
    Tester,
    /// Push image files through the figure channel
    Show,
}

#[derive(Parser)]
#[command(name = "tester", version, about = "Run a project's tests and emit a JSON grading report")]
struct TesterCli {
    /// Project directory containing tests.json
    project_path: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "sb-show", version, about = "Send images to the browser over the image descriptor")]
struct ShowCli {
    /// Image files, sent in order
    images: Vec<PathBuf>,
}

pub fn run(mode: CliMode) -> Result<()> {
    env_logger::init();

    match mode {
        CliMode::Tester => run_tester(TesterCli::parse()),
        CliMode::Show => run_show(ShowCli::parse()),
    }
}

fn run_tester(cli: TesterCli) -> Result<()> {
    let config = SourceboxConfig::load().context("Failed to load configuration")?;
    tester_main(cli.project_path.as_deref(), &config)?;
    Ok(())
}

/// Enter the project directory and grade it
///
/// A missing path prints its fixed message and yields `None`.
pub fn tester_main(project: Option<&Path>, config: &SourceboxConfig) -> Result<Option<Report>> {
    let Some(project) = project else {
        println!("{}", NO_PROJECT_MESSAGE);
        return Ok(None);
    };

    std::env::set_current_dir(project)
        .with_context(|| format!("Failed to enter project directory {}", project.display()))?;
    let project_dir = std::env::current_dir()?;
    log::debug!("Grading project in {}", project_dir.display());

    grade(&project_dir, config)
}

/// Grade the project in `project_dir`
///
/// User errors print their fixed message and yield `None`; only a failing
/// report sink or another unexpected error is returned.
pub fn grade(project_dir: &Path, config: &SourceboxConfig) -> Result<Option<Report>> {
    let module = match load_tests_module(project_dir, &config.harness.output_limits) {
        Ok(module) => module,
        Err(HarnessError::TestsModule(reason)) => {
            log::warn!("Cannot load tests module: {}", reason);
            println!("{}", NO_TESTS_MESSAGE);
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let case = match module.single_case() {
        Ok(case) => case,
        Err(e @ HarnessError::InvalidTests { .. }) => {
            log::warn!("{}", e);
            println!("{}", INVALID_TESTS_MESSAGE);
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    log::info!(
        "Running {} tests of {}.{}",
        case.methods().len(),
        case.module(),
        case.name()
    );
    let report = JsonTestRunner::new(&config.harness)
        .run(case)
        .with_context(|| format!("Failed to write report to {}", config.harness.report_sink))?;
    Ok(Some(report))
}

fn run_show(cli: ShowCli) -> Result<()> {
    let config = SourceboxConfig::load().context("Failed to load configuration")?;

    let mut registry = FigureRegistry::new();
    for path in &cli.images {
        let image = image::open(path)
            .with_context(|| format!("Failed to load image {}", path.display()))?;
        registry.add_image(image);
    }

    let summary = FigureEmitter::new(&config.figure).show(&mut registry);
    log::info!("Sent {} figures, dropped {}", summary.sent, summary.dropped);
    Ok(())
}
