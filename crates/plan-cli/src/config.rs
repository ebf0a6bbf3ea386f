use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::Args;
use plan_doc::{DEFAULT_FILE_NAME_TEMPLATE, FileNamer};

use crate::CliResult;

pub const OUTPUT_DIR_ENV: &str = "LEARNING_PLAN_OUTPUT_DIR";
pub const LOGO_ENV: &str = "LEARNING_PLAN_LOGO";
pub const FILE_NAME_TEMPLATE_ENV: &str = "LEARNING_PLAN_FILE_NAME_TEMPLATE";
pub const ALLOWED_ROOTS_ENV: &str = "LEARNING_PLAN_ALLOWED_ROOTS";
pub const DEFAULT_LOGO: &str = "assets/amal-logo.png";

/// Flags shared by every command that can export.
#[derive(Debug, Clone, Default, Args)]
pub struct ExportArgs {
    /// Directory receiving exported documents (defaults to LEARNING_PLAN_OUTPUT_DIR or the current directory).
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
    /// Logo image placed at the top of the document (defaults to LEARNING_PLAN_LOGO or assets/amal-logo.png).
    #[arg(long, value_name = "PATH")]
    pub logo: Option<PathBuf>,
    /// Handlebars template for the file name; variables: prefix, student, date.
    #[arg(long, value_name = "TEMPLATE")]
    pub file_name_template: Option<String>,
}

/// Export settings after applying flags, environment and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub logo_path: PathBuf,
    pub file_name_template: String,
}

impl ExportConfig {
    pub fn resolve(args: &ExportArgs) -> CliResult<Self> {
        let output_dir = resolve_output_root(args.out.clone())?;
        let logo_path = args
            .logo
            .clone()
            .or_else(|| env::var_os(LOGO_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGO));
        let file_name_template = args
            .file_name_template
            .clone()
            .or_else(|| env::var(FILE_NAME_TEMPLATE_ENV).ok())
            .filter(|template| !template.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_NAME_TEMPLATE.to_string());
        tracing::debug!(
            output_dir = %output_dir.display(),
            logo = %logo_path.display(),
            template = %file_name_template,
            "export configuration resolved"
        );
        Ok(Self {
            output_dir,
            logo_path,
            file_name_template,
        })
    }

    pub fn file_namer(&self) -> CliResult<FileNamer> {
        Ok(FileNamer::new(&self.file_name_template)?)
    }
}

fn resolve_output_root(out: Option<PathBuf>) -> CliResult<PathBuf> {
    let candidate = match out {
        Some(path) => path,
        None => env::var_os(OUTPUT_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    if candidate.as_os_str().is_empty() {
        return Err("output directory cannot be empty".into());
    }
    ensure_allowed_root(&candidate)?;
    Ok(candidate)
}

pub fn ensure_allowed_root(target: &Path) -> CliResult<()> {
    let target = canonicalize_target(target)?;
    let roots = allowed_roots()?;
    if roots.iter().any(|root| target.starts_with(root)) || path_is_writable(&target) {
        Ok(())
    } else {
        Err(format!(
            "path '{}' is outside allowed roots {:?}",
            target.display(),
            roots
        )
        .into())
    }
}

fn allowed_roots() -> CliResult<Vec<PathBuf>> {
    let roots = env::var(ALLOWED_ROOTS_ENV)
        .ok()
        .map(|value| {
            value
                .split(':')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(PathBuf::from)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let mut canonical_roots = roots
        .into_iter()
        .map(|root| root.canonicalize().unwrap_or(root))
        .collect::<Vec<_>>();

    if canonical_roots.is_empty() {
        let cwd = env::current_dir()?;
        canonical_roots.push(cwd.canonicalize().unwrap_or(cwd));
    }

    Ok(canonical_roots)
}

fn path_is_writable(target: &Path) -> bool {
    let mut candidate = Some(target);
    while let Some(path) = candidate {
        if path.exists() {
            return fs::metadata(path)
                .map(|metadata| !metadata.permissions().readonly())
                .unwrap_or(false);
        }
        candidate = path.parent();
    }
    false
}

fn canonicalize_target(path: &Path) -> CliResult<PathBuf> {
    if path.exists() {
        return Ok(path.canonicalize()?);
    }

    if let Some(parent) = path.parent()
        && let Ok(parent_canon) = parent.canonicalize()
    {
        return Ok(match path.file_name() {
            Some(file_name) => parent_canon.join(file_name),
            None => parent_canon,
        });
    }

    let cwd = env::current_dir()?;
    Ok(cwd.join(path))
}
