mod config;
mod wizard;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use config::{ExportArgs, ExportConfig};
use plan_doc::{
    DirectorySaveTarget, DocxWriter, ExportError, ExportOutcome, Exporter, FsAssetSource,
    FsExporter, preview,
};
use plan_spec::{
    CheckReport, FieldId, FormState, RenderPayload, RenderStatus, build_render_payload, check,
    render_card, render_json_ui, render_text,
};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wizard::{
    ABORT_INPUT, FieldInput, PromptContext, Verbosity, WizardPresenter, parse_field_input,
};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const DEFAULT_LOG_FILTER: &str = "learning_plan=info,plan_doc=info,plan_spec=warn";
const VERBOSE_LOG_FILTER: &str = "learning_plan=debug,plan_doc=debug,plan_spec=debug";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Personal learning plan form and Word export",
    long_about = "Fills in the personal learning plan form in a text shell and exports it as a right-to-left .docx document"
)]
struct Cli {
    /// Show verbose output (option codes, debug logging).
    #[arg(long, global = true, alias = "debug")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum RenderMode {
    Text,
    Card,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Fill in the form interactively, then preview or export it.
    Wizard {
        /// Optional JSON file containing initial answers.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        #[command(flatten)]
        export: ExportArgs,
        /// Render output mode for the form display.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Export an answers file to a .docx document.
    Export {
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        #[command(flatten)]
        export: ExportArgs,
        /// Date printed in the document and file name (YYYY-MM-DD, defaults to today).
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },
    /// Print a plain-text preview of the document an answers file would export to.
    Preview {
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        /// Date printed in the preview (YYYY-MM-DD, defaults to today).
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },
    /// Render the form for an answers file as text, JSON UI or Adaptive Card.
    Render {
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Check an answers file for unknown keys, wrong types and unknown option codes.
    Validate {
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Print the JSON Schema of the answers file.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Wizard {
            answers,
            export,
            format,
        } => run_wizard(answers, export, format, cli.verbose),
        Command::Export {
            answers,
            export,
            date,
        } => run_export(answers, export, date),
        Command::Preview { answers, date } => run_preview(answers, date),
        Command::Render { answers, format } => run_render(answers, format),
        Command::Validate { answers } => run_validate(answers),
        Command::Schema => run_schema(),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_wizard(
    answers_path: Option<PathBuf>,
    args: ExportArgs,
    format: RenderMode,
    verbose: bool,
) -> CliResult<()> {
    let mut state = match answers_path {
        Some(path) => load_answers(&path)?,
        None => FormState::new(),
    };
    let config = ExportConfig::resolve(&args)?;
    let exporter = build_exporter(&config)?;
    let runtime = runtime()?;
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose));
    let mut status = RenderStatus::Draft;

    presenter.show_header(&build_render_payload(&state, &status));
    state = prompt_fields(&state, &presenter)?;

    loop {
        let payload = build_render_payload(&state, &status);
        print_render_output(format, &payload)?;
        presenter.show_actions(&payload);
        let Some(action) = read_input()? else {
            break;
        };
        match action.to_lowercase().as_str() {
            "" => continue,
            "preview" => println!("{}", preview(&state.snapshot(today()))),
            "export" => {
                let result = runtime.block_on(exporter.export(&state.snapshot(today())));
                status = export_status(&result);
                presenter.show_export_status(&status);
            }
            "edit" => state = prompt_fields(&state, &presenter)?,
            "exit" | "quit" => break,
            other => eprintln!(
                "Unknown action '{}'; choose preview, export, edit or exit.",
                other
            ),
        }
    }

    Ok(())
}

/// Prompts for every field in display order and returns the updated state.
fn prompt_fields(state: &FormState, presenter: &WizardPresenter) -> CliResult<FormState> {
    let mut next = state.clone();
    let total = FieldId::ALL.len();
    for position in 0..total {
        let command = loop {
            let fields = next.fields();
            let field = &fields[position];
            presenter.show_prompt(&PromptContext::new(field, position + 1, total));
            let raw = read_input()?.ok_or("input closed before the form was complete")?;
            if raw == ABORT_INPUT {
                return Err("wizard aborted by user".into());
            }
            match parse_field_input(field, &raw) {
                Ok(FieldInput::Keep) => break None,
                Ok(FieldInput::Set(value)) => break Some(field.on_change(value)),
                Err(err) => presenter.show_parse_error(&err),
            }
        };
        if let Some(command) = command {
            next = next.apply(command);
        }
    }
    Ok(next)
}

/// Reads one trimmed line from stdin; `None` once stdin is closed.
fn read_input() -> CliResult<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn run_export(answers_path: PathBuf, args: ExportArgs, date: Option<NaiveDate>) -> CliResult<()> {
    let state = load_answers(&answers_path)?;
    let config = ExportConfig::resolve(&args)?;
    let exporter = build_exporter(&config)?;
    let result = runtime()?.block_on(exporter.export(&state.snapshot(export_date(date))));
    let status = export_status(&result);
    match result {
        Ok(outcome) => {
            if let Some(message) = status.message() {
                println!("{}", message);
            }
            println!("Saved to {}", outcome.path.display());
            Ok(())
        }
        Err(_) => {
            if let Some(message) = status.message() {
                eprintln!("{}", message);
            }
            Err("export failed".into())
        }
    }
}

fn run_preview(answers_path: PathBuf, date: Option<NaiveDate>) -> CliResult<()> {
    let state = load_answers(&answers_path)?;
    println!("{}", preview(&state.snapshot(export_date(date))));
    Ok(())
}

fn run_render(answers_path: PathBuf, format: RenderMode) -> CliResult<()> {
    let state = load_answers(&answers_path)?;
    let payload = build_render_payload(&state, &RenderStatus::Draft);
    println!("{}", render_output(format, &payload)?);
    Ok(())
}

fn run_validate(answers_path: PathBuf) -> CliResult<()> {
    let answers_json = fs::read_to_string(answers_path)?;
    let answers: Value = serde_json::from_str(&answers_json)?;

    let report = check(&answers);
    println!(
        "Validation result: {}",
        if report.valid { "valid" } else { "invalid" }
    );
    describe_report(&report);

    if report.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_report(report: &CheckReport) {
    if !report.errors.is_empty() {
        println!("Errors:");
        for error in &report.errors {
            println!("  {} - {}", error.path, error.message);
        }
    }
    if !report.unresolved_codes.is_empty() {
        println!("Unknown option codes:");
        for issue in &report.unresolved_codes {
            println!("  {} - {}", issue.path, issue.message);
        }
    }
    if !report.unknown_fields.is_empty() {
        println!(
            "Unknown answer fields: {}",
            report.unknown_fields.join(", ")
        );
    }
}

fn run_schema() -> CliResult<()> {
    let schema = schemars::schema_for!(FormState);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Reads an answers file. Check findings are logged, never fatal.
fn load_answers(path: &Path) -> CliResult<FormState> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read answers '{}': {}", path.display(), err))?;
    let value: Value = serde_json::from_str(&contents)?;
    let report = check(&value);
    for issue in report.errors.iter().chain(&report.unresolved_codes) {
        tracing::warn!(path = %issue.path, code = %issue.code, "{}", issue.message);
    }
    if !report.unknown_fields.is_empty() {
        tracing::warn!(
            fields = %report.unknown_fields.join(", "),
            "ignoring unknown answer fields"
        );
    }
    Ok(serde_json::from_value(value)?)
}

fn build_exporter(config: &ExportConfig) -> CliResult<FsExporter> {
    Ok(Exporter::new(
        FsAssetSource::default(),
        DocxWriter,
        DirectorySaveTarget::new(config.output_dir.clone()),
        config.logo_path.clone(),
    )
    .with_file_namer(config.file_namer()?))
}

fn runtime() -> CliResult<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn export_status(result: &Result<ExportOutcome, ExportError>) -> RenderStatus {
    match result {
        Ok(outcome) => RenderStatus::Exported {
            file_name: outcome.file_name.clone(),
        },
        Err(err) => RenderStatus::ExportFailed {
            reason: err.to_string(),
        },
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn export_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(today)
}

fn render_output(mode: RenderMode, payload: &RenderPayload) -> CliResult<String> {
    Ok(match mode {
        RenderMode::Text => render_text(payload),
        RenderMode::Card => serde_json::to_string_pretty(&render_card(payload))?,
        RenderMode::Json => serde_json::to_string_pretty(&render_json_ui(payload))?,
    })
}

fn print_render_output(mode: RenderMode, payload: &RenderPayload) -> CliResult<()> {
    let output = render_output(mode, payload)?;
    match mode {
        RenderMode::Text => println!("{}", output),
        RenderMode::Card => println!("Adaptive card:\n{}", output),
        RenderMode::Json => println!("JSON UI:\n{}", output),
    }
    Ok(())
}
