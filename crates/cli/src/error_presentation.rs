use std::{io, path::PathBuf};

use miette::Report;

const FIXTURE_CONTEXT: &str = "while loading fixture";
const SCOPES_CONTEXT: &str = "while resolving expectation scopes";
const FILE_READ_CONTEXT: &str = "while reading";

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Fixture,
    Scopes,
}

#[derive(Debug)]
pub(crate) enum CliError {
    ReadFile { path: PathBuf, source: io::Error },
    Core {
        stage: Stage,
        source: dbexpect_core::Error,
    },
}

impl CliError {
    pub(crate) fn core(stage: Stage) -> impl FnOnce(dbexpect_core::Error) -> Self {
        move |source| Self::Core { stage, source }
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::ReadFile { path, source } => {
            let context = format!("{FILE_READ_CONTEXT} `{}`", path.display());
            let report = report_with_context(source, context);
            format!("[io] {report}")
        }
        CliError::Core { stage, source } => {
            let category = core_category(&source);
            let context = match stage {
                Stage::Fixture => FIXTURE_CONTEXT,
                Stage::Scopes => SCOPES_CONTEXT,
            };
            let report = report_with_context(source, context);
            format!("[{category}] {report}")
        }
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let anyhow_error = anyhow::Error::new(source).context(context.into());
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &dbexpect_core::Error) -> &'static str {
    match error {
        dbexpect_core::Error::Lookup(_) => "lookup",
        dbexpect_core::Error::Config(_) => "config",
        dbexpect_core::Error::Modifier(_) => "modifier",
    }
}
