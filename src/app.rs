use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::data::DataSource;
use crate::filter::url::parse_location;
use crate::filter::FilterState;
use crate::output::{self, OutputFormat};
use crate::prober::{self, DocumentCategory};
use crate::render::{self, ViewBindings};
use crate::runner::{Options, Runner, RunnerError};

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn summarize_state(state: &FilterState) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(role) = state.role.as_deref() {
        parts.push(format!("role={role}"));
    }
    if !state.contributions.is_empty() {
        parts.push(format!("contrib={}", state.contributions.join(",")));
    }
    if !state.customers.is_empty() {
        parts.push(format!("cust={}", state.customers.join(",")));
    }
    if !state.query.trim().is_empty() {
        parts.push(format!("q={}", state.query.trim()));
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(" ")
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    data: String,
    docs: String,
    docs_href: Option<String>,
    location: String,
    expanded: bool,
    title: String,
    categories: Vec<DocumentCategory>,
    concurrency: u32,
    rate: Option<u32>,
    timeout: usize,
    workers: usize,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
    verbose: u8,
    quiet: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let data = args
        .data
        .or(cfg.data)
        .unwrap_or_else(|| "./Data.json".to_string());
    let docs = args.docs.or(cfg.docs).unwrap_or_else(|| ".".to_string());
    let docs_href = args.docs_href.or(cfg.docs_href);
    let location = args.url.unwrap_or_default();
    parse_location(&location)?;
    let expanded = args.expanded || cfg.expanded.unwrap_or(false);
    let title = args
        .title
        .or(cfg.title)
        .unwrap_or_else(|| "Employee Directory".to_string());

    let categories = cfg
        .categories
        .unwrap_or_else(prober::default_categories);
    if categories.iter().any(|c| c.folder.trim().is_empty()) {
        return Err("invalid categories: folder must not be empty".to_string());
    }

    let concurrency = args.concurrency.or(cfg.concurrency).unwrap_or(16);
    if concurrency == 0 {
        return Err("invalid concurrency, expected positive integer".to_string());
    }
    let rate = args.rate.or(cfg.rate).filter(|r| *r > 0);
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    let workers = args.workers.or(cfg.workers).unwrap_or(4).max(1);

    let output = args.output.or(cfg.output);
    let format_raw = args.format.or(cfg.output_format);
    let output_format = match format_raw.as_deref() {
        Some(raw) => OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected html, json or text"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Html),
    };

    Ok(RunConfig {
        data,
        docs,
        docs_href,
        location,
        expanded,
        title,
        categories,
        concurrency,
        rate,
        timeout,
        workers,
        output,
        output_format,
        no_color,
        verbose: args.verbose,
        quiet: args.quiet,
    })
}

fn init_logging(run: &RunConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if run.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if run.verbose == 1 {
        builder.filter_level(log::LevelFilter::Debug);
    } else if run.verbose > 1 {
        builder.filter_level(log::LevelFilter::Trace);
    }
    builder.filter_module("reqwest", log::LevelFilter::Warn);
    builder.filter_module("hyper", log::LevelFilter::Warn);
    builder.target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}

async fn write_output(path: Option<&str>, bytes: &[u8]) -> Result<(), String> {
    match path {
        Some(path) => {
            let path = config::expand_tilde_string(path);
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(bytes)
                .await
                .map_err(|e| format!("failed to write output file: {e}"))?;
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(bytes)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
    }
    Ok(())
}

fn build_progress_bar(run: &RunConfig) -> Result<ProgressBar, String> {
    if run.quiet || run.output.is_none() {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(0);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(200));
    pb.set_style(
        ProgressStyle::with_template(
            ":: Probing: [{pos}/{len}] :: {per_sec} :: Duration: [{elapsed_precise}] :: {msg}",
        )
        .map_err(|e| format!("failed to build progress bar style: {e}"))?
        .progress_chars(r#"#>-"#),
    );
    Ok(pb)
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    if !run.quiet {
        format_kv_line("Data", &run.data);
        format_kv_line("Documents", &run.docs);
        format_kv_line(
            "Categories",
            &run.categories
                .iter()
                .map(|c| c.folder.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        );
        format_kv_line(
            "Filters",
            &summarize_state(&FilterState::from_url(&parse_location(&run.location)?)),
        );
        format_kv_line("Expanded", format_bool(run.expanded));
        format_kv_line(
            "Output",
            run.output.as_deref().unwrap_or("stdout"),
        );
        eprintln!();
    }

    let options = Options {
        data: DataSource::parse(&run.data),
        docs: run.docs.clone(),
        docs_href: run.docs_href.clone(),
        location: run.location.clone(),
        expanded: run.expanded,
        categories: run.categories.clone(),
        concurrency: run.concurrency as usize,
        rate: run.rate,
        timeout_seconds: run.timeout,
        title: run.title.clone(),
        bindings: ViewBindings::default(),
    };
    let runner = Runner::new(options).map_err(|e| e.to_string())?;

    let pb = build_progress_bar(&run)?;
    let result = runner.run_with_progress(Some(&pb)).await;
    pb.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(RunnerError::Load(e)) => {
            let message = e.to_string();
            log::error!("{message}");
            if run.output_format == OutputFormat::Html {
                let page = render::render_error_page(&run.title, &ViewBindings::default(), &message);
                write_output(run.output.as_deref(), page.as_bytes()).await?;
            }
            eprintln!(
                "{} {}",
                "[ERR]".bold().red(),
                "the directory could not be rendered"
            );
            return Err(message);
        }
        Err(e) => return Err(e.to_string()),
    };

    let rendered = match run.output_format {
        OutputFormat::Html => result.page.clone().into_bytes(),
        OutputFormat::Json => output::render_json(&output::build_report(&result.view)),
        OutputFormat::Text => output::render_text(&output::build_report(&result.view)),
    };
    write_output(run.output.as_deref(), &rendered).await?;

    if !run.quiet {
        let documents: usize = result.view.cards.iter().map(|c| c.documents.len()).sum();
        eprintln!();
        eprintln!(
            "{} {} of {} employees, {} documents found",
            "[OK]".bold().green(),
            result.view.visible(),
            result.view.total,
            documents
        );
        eprintln!(
            ":: Completed :: render took {}ms ::",
            result.elapsed.as_millis()
        );
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", CliArgs::command().render_long_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine config path".to_string())?;
        config::ensure_default_config_file(&path)?;
        println!("config: {}", path.display());
        return Ok(());
    }
    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    init_logging(&run);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(run.workers)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
