//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::{write_csv, write_json, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::drawdown::{bucket_drawdowns, compute_drawdown_series, max_drawdown_pct};
use crate::domain::analysis::period::Period;
use crate::domain::analysis::summary::compute_trade_period_summary_rows;
use crate::domain::analysis::trades::compute_closed_trade_analysis_rows;
use crate::domain::dsl::catalog::{build_catalog, filter_catalog, CatalogKind, CustomIndicator, OperandKind};
use crate::domain::dsl::completion::{CompletionItem, CompletionProvider};
use crate::domain::dsl::registry::LanguageRegistry;
use crate::domain::dsl::tokenizer::tokenize;
use crate::domain::error::SigmaError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_LANGUAGE_ID: &str = "sigma-dsl";
const INDICATOR_SECTION_PREFIX: &str = "indicator.";

#[derive(Parser, Debug)]
#[command(name = "sigmatrader", about = "SigmaTrader DSL tooling and backtest analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List DSL catalog items
    Catalog {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        kind: Option<CatalogKind>,
        #[arg(long)]
        json: bool,
    },
    /// Completion suggestions for a cursor position in one DSL line
    Complete {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        line: String,
        /// 0-based character column of the cursor
        #[arg(long)]
        column: usize,
    },
    /// Tokenize DSL text
    Tokenize {
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// List backtest runs in the data directory
    Runs {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Equity P&L per week or month
    EquityPnl(AnalysisArgs),
    /// Closed-trade analysis rows
    Trades(AnalysisArgs),
    /// Trade statistics per week or month
    TradeSummary(AnalysisArgs),
    /// Drawdown series, or depth buckets with --buckets
    Drawdown {
        #[command(flatten)]
        args: AnalysisArgs,
        #[arg(long)]
        buckets: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(short, long)]
    pub run: String,
    #[arg(short, long)]
    pub period: Option<Period>,
    #[arg(short, long)]
    pub symbol: Option<String>,
    #[arg(long)]
    pub json: bool,
}

/// What an editor needs to install and query completion for one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionOutput {
    pub language_id: String,
    pub trigger_characters: Vec<char>,
    pub suggestions: Vec<CompletionItem>,
}

/// Operands and custom indicators read from the `[dsl]` and `[indicator.*]` sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogInputs {
    pub operands: Vec<String>,
    pub custom_indicators: Vec<CustomIndicator>,
    pub operand_kind: OperandKind,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Catalog {
            config,
            query,
            kind,
            json,
        } => run_catalog(&config, query.as_deref(), kind, json),
        Command::Complete {
            config,
            line,
            column,
        } => run_complete(&config, &line, column),
        Command::Tokenize { text, json } => run_tokenize(&text, json),
        Command::Runs { config, data_dir } => run_list_runs(config.as_deref(), data_dir),
        Command::EquityPnl(args) => run_equity_pnl(&args),
        Command::Trades(args) => run_trades(&args),
        Command::TradeSummary(args) => run_trade_summary(&args),
        Command::Drawdown { args, buckets } => run_drawdown(&args, buckets),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SigmaError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| SigmaError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_optional_config(path: Option<&Path>) -> Result<Option<FileConfigAdapter>, SigmaError> {
    path.map(load_config).transpose()
}

/// Split a comma-separated config value, trimming items and dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn build_catalog_inputs(config: &dyn ConfigPort) -> Result<CatalogInputs, SigmaError> {
    let operands = config
        .get_string("dsl", "operands")
        .map(|s| split_list(&s))
        .unwrap_or_default();

    let operand_kind = match config
        .get_string("dsl", "operand_kind")
        .filter(|s| !s.trim().is_empty())
    {
        Some(s) => s.parse::<OperandKind>().map_err(|reason| SigmaError::ConfigInvalid {
            section: "dsl".into(),
            key: "operand_kind".into(),
            reason,
        })?,
        None => OperandKind::default(),
    };

    let mut custom_indicators = Vec::new();
    for section in config.sections() {
        let Some(name) = section.strip_prefix(INDICATOR_SECTION_PREFIX) else {
            continue;
        };
        if name.trim().is_empty() {
            warn!(section = %section, "skipping indicator section without a name");
            continue;
        }
        let params = config
            .get_string(&section, "params")
            .map(|s| split_list(&s))
            .unwrap_or_default();
        let mut indicator = CustomIndicator::new(name.trim(), params);
        if let Some(desc) = config
            .get_string(&section, "description")
            .filter(|s| !s.trim().is_empty())
        {
            indicator = indicator.with_description(desc.trim());
        }
        custom_indicators.push(indicator);
    }

    Ok(CatalogInputs {
        operands,
        custom_indicators,
        operand_kind,
    })
}

/// Register the configured language and ask it for suggestions at `column`.
pub fn complete_line(
    config: &dyn ConfigPort,
    line: &str,
    column: usize,
) -> Result<CompletionOutput, SigmaError> {
    let inputs = build_catalog_inputs(config)?;
    let id = language_id(config);

    let mut registry = LanguageRegistry::new();
    registry.register(
        &id,
        CompletionProvider::new(
            &inputs.operands,
            &inputs.custom_indicators,
            inputs.operand_kind,
        ),
    );

    Ok(CompletionOutput {
        trigger_characters: registry.trigger_characters(&id).to_vec(),
        suggestions: registry.suggestions(&id, line, column),
        language_id: id,
    })
}

pub fn language_id(config: &dyn ConfigPort) -> String {
    config
        .get_string("dsl", "language_id")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE_ID.to_string())
}

/// Command-line period, then `[analysis] period`, then monthly.
pub fn resolve_period(
    period_override: Option<Period>,
    config: Option<&dyn ConfigPort>,
) -> Result<Period, SigmaError> {
    if let Some(p) = period_override {
        return Ok(p);
    }
    match config.and_then(|c| c.get_string("analysis", "period")) {
        Some(s) if !s.trim().is_empty() => s.parse::<Period>().map_err(|reason| SigmaError::ConfigInvalid {
            section: "analysis".into(),
            key: "period".into(),
            reason,
        }),
        _ => Ok(Period::default()),
    }
}

/// Command-line directory, then `[data] dir`, then the working directory.
pub fn resolve_data_dir(dir_override: Option<PathBuf>, config: Option<&dyn ConfigPort>) -> PathBuf {
    dir_override
        .or_else(|| {
            config
                .and_then(|c| c.get_string("data", "dir"))
                .filter(|s| !s.trim().is_empty())
                .map(|s| PathBuf::from(s.trim()))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_symbol(symbol_override: Option<&str>, config: Option<&dyn ConfigPort>) -> Option<String> {
    symbol_override
        .map(String::from)
        .or_else(|| config.and_then(|c| c.get_string("analysis", "default_symbol")))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn emit<T: Serialize>(rows: &[T], json: bool) -> Result<(), SigmaError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        write_json(&mut out, rows)?;
    } else {
        write_csv(&mut out, rows)?;
    }
    out.flush()?;
    Ok(())
}

fn run_catalog(
    config_path: &Path,
    query: Option<&str>,
    kind: Option<CatalogKind>,
    json: bool,
) -> Result<(), SigmaError> {
    let config = load_config(config_path)?;
    let inputs = build_catalog_inputs(&config)?;
    let items = build_catalog(
        &inputs.operands,
        &inputs.custom_indicators,
        inputs.operand_kind,
    );
    let filtered = filter_catalog(&items, query.unwrap_or(""), kind);
    info!(total = items.len(), shown = filtered.len(), "built catalog");
    emit(&filtered, json)
}

fn run_complete(config_path: &Path, line: &str, column: usize) -> Result<(), SigmaError> {
    let config = load_config(config_path)?;
    let output = complete_line(&config, line, column)?;
    info!(language_id = %output.language_id, count = output.suggestions.len(), "computed suggestions");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json(&mut out, &output)?;
    out.flush()?;
    Ok(())
}

fn run_tokenize(text: &str, json: bool) -> Result<(), SigmaError> {
    let tokens = tokenize(text);
    emit(&tokens, json)
}

fn run_list_runs(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<(), SigmaError> {
    let config = load_optional_config(config_path)?;
    let dir = resolve_data_dir(data_dir, config.as_ref().map(|c| c as &dyn ConfigPort));
    let runs = CsvAdapter::new(dir).list_runs()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for run in runs {
        writeln!(out, "{}", run)?;
    }
    Ok(())
}

struct AnalysisContext {
    adapter: CsvAdapter,
    period: Period,
    symbol: Option<String>,
}

fn analysis_context(args: &AnalysisArgs) -> Result<AnalysisContext, SigmaError> {
    let config = load_optional_config(args.config.as_deref())?;
    let config_ref = config.as_ref().map(|c| c as &dyn ConfigPort);
    let dir = resolve_data_dir(args.data_dir.clone(), config_ref);
    info!(dir = %dir.display(), run = %args.run, "reading backtest data");
    Ok(AnalysisContext {
        adapter: CsvAdapter::new(dir),
        period: resolve_period(args.period, config_ref)?,
        symbol: resolve_symbol(args.symbol.as_deref(), config_ref),
    })
}

fn run_equity_pnl(args: &AnalysisArgs) -> Result<(), SigmaError> {
    let ctx = analysis_context(args)?;
    let series = ctx.adapter.fetch_equity(&args.run)?;
    let rows = series.period_rows(ctx.period);
    info!(points = series.len(), rows = rows.len(), period = %ctx.period, "computed equity period P&L");
    emit(&rows, args.json)
}

fn run_trades(args: &AnalysisArgs) -> Result<(), SigmaError> {
    let ctx = analysis_context(args)?;
    let trades = ctx.adapter.fetch_trades(&args.run)?;
    let rows = compute_closed_trade_analysis_rows(&trades, ctx.symbol.as_deref());
    if rows.len() < trades.len() {
        warn!(dropped = trades.len() - rows.len(), "dropped trades without entry or exit time");
    }
    emit(&rows, args.json)
}

fn run_trade_summary(args: &AnalysisArgs) -> Result<(), SigmaError> {
    let ctx = analysis_context(args)?;
    let trades = ctx.adapter.fetch_trades(&args.run)?;
    let rows = compute_closed_trade_analysis_rows(&trades, ctx.symbol.as_deref());
    let summary = compute_trade_period_summary_rows(&rows, ctx.period);
    info!(trades = rows.len(), buckets = summary.len(), period = %ctx.period, "summarized trades");
    emit(&summary, args.json)
}

fn run_drawdown(args: &AnalysisArgs, buckets: bool) -> Result<(), SigmaError> {
    let ctx = analysis_context(args)?;
    let series = ctx.adapter.fetch_equity(&args.run)?;
    let points = compute_drawdown_series(&series.timestamps, &series.equity);
    info!(
        points = points.len(),
        max_drawdown_pct = max_drawdown_pct(&points),
        "computed drawdown"
    );
    if buckets {
        emit(&bucket_drawdowns(&points), args.json)
    } else {
        emit(&points, args.json)
    }
}
