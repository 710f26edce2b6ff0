// Command implementations

use std::path::{Path, PathBuf};

use serde::Serialize;
use tabmatch_config::Settings;
use tabmatch_engine::report::{Report, ReportKind};
use tabmatch_engine::{analyze, MatchConfig, MatchProfile};
use tabmatch_io::write_report;

use crate::inputs::{self, FailureInfo, Loaded, SourceInfo};
use crate::util::render_table;
use crate::{CliError, InputArgs};

/// Widest column in human-readable tables.
const MAX_COLUMN_WIDTH: usize = 40;

// ============================================================================
// inspect
// ============================================================================

#[derive(Serialize)]
struct InspectOutput {
    sources: Vec<SourceInfo>,
    fields: Vec<String>,
    rows: usize,
    failures: Vec<FailureInfo>,
}

pub fn cmd_inspect(input: &InputArgs, json: bool) -> Result<(), CliError> {
    let loaded = inputs::load(&input.files, input.strict)?;
    let output = InspectOutput {
        failures: loaded.failure_info(),
        fields: loaded.table.fields().to_vec(),
        rows: loaded.table.len(),
        sources: loaded.sources,
    };

    if json {
        return print_json(&output);
    }

    println!("Sources:");
    if output.sources.is_empty() {
        println!("  (none)");
    }
    let headers = vec!["provenance".to_string(), "rows".to_string()];
    let rows: Vec<Vec<String>> = output
        .sources
        .iter()
        .map(|s| vec![s.provenance.clone(), s.rows.to_string()])
        .collect();
    if !rows.is_empty() {
        for line in render_table(&headers, &rows, 60).lines() {
            println!("  {}", line);
        }
    }
    println!();
    println!("Fields ({}): {}", output.fields.len(), output.fields.join(", "));
    println!("Rows: {}", output.rows);
    if !output.failures.is_empty() {
        println!();
        println!("Failed ({}):", output.failures.len());
        for failure in &output.failures {
            println!("  {}", failure.error);
        }
    }
    Ok(())
}

// ============================================================================
// search
// ============================================================================

pub fn cmd_search(
    input: &InputArgs,
    settings: &Settings,
    query: String,
    no_system_fields: bool,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let loaded = inputs::load(&input.files, input.strict)?;
    let config = MatchConfig {
        selected_fields: Vec::new(),
        ignore_case: settings.ignore_case,
        ignore_symbols: settings.ignore_symbols,
        search_query: query,
        search_system_fields: settings.search_system_fields && !no_system_fields,
    };

    let analysis = analyze(&loaded.table, &config).map_err(CliError::engine)?;
    let report = Report::search(&loaded.table, &config, &analysis.search_hits);
    emit(&report, output.as_deref(), json)
}

// ============================================================================
// dupes
// ============================================================================

pub struct DupesOptions {
    pub fields: Vec<String>,
    pub case_sensitive: bool,
    pub keep_symbols: bool,
    pub all_fields: bool,
}

pub fn cmd_dupes(
    input: &InputArgs,
    settings: &Settings,
    options: DupesOptions,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    // Names are matched verbatim; a blank entry next to real ones is left
    // for the selection check to reject.
    if options.fields.iter().all(|f| f.trim().is_empty()) {
        return Err(CliError::usage("--fields needs at least one field name")
            .with_hint("e.g. --fields Phone or --fields 'Last name,First name'"));
    }
    let fields = options.fields;

    let loaded = inputs::load(&input.files, input.strict)?;
    let config = MatchConfig {
        selected_fields: fields,
        ignore_case: settings.ignore_case && !options.case_sensitive,
        ignore_symbols: settings.ignore_symbols && !options.keep_symbols,
        search_query: String::new(),
        search_system_fields: settings.search_system_fields,
    };

    let analysis = analyze(&loaded.table, &config).map_err(CliError::engine)?;
    let duplicates = analysis
        .duplicates
        .as_ref()
        .ok_or_else(|| CliError::general("no fields selected"))?;
    let report = Report::duplicates(
        &loaded.table,
        &config,
        &analysis.selection,
        duplicates,
        options.all_fields || settings.all_fields,
    );
    emit(&report, output.as_deref(), json)
}

// ============================================================================
// run
// ============================================================================

#[derive(Serialize)]
struct RunOutput {
    profile: String,
    sources: Vec<SourceInfo>,
    failures: Vec<FailureInfo>,
    search: Report,
    duplicates: Option<Report>,
}

pub fn cmd_run(
    profile_path: &Path,
    output: Option<PathBuf>,
    strict: bool,
    json: bool,
) -> Result<(), CliError> {
    let text = std::fs::read_to_string(profile_path).map_err(|e| {
        CliError::usage(format!("cannot read profile {}: {}", profile_path.display(), e))
    })?;
    let profile = MatchProfile::from_toml(&text).map_err(CliError::engine)?;
    let base = profile_path.parent().unwrap_or_else(|| Path::new(""));
    let files: Vec<PathBuf> = profile.files.iter().map(|f| base.join(f)).collect();

    let Loaded {
        table,
        sources,
        failures,
    } = inputs::load(&files, strict)?;

    let config = profile.match_config();
    let analysis = analyze(&table, &config).map_err(CliError::engine)?;
    let search = Report::search(&table, &config, &analysis.search_hits);
    let duplicates = analysis.duplicates.as_ref().map(|dupes| {
        Report::duplicates(&table, &config, &analysis.selection, dupes, profile.all_fields)
    });

    let output = output.or_else(|| profile.output.as_ref().map(|o| base.join(o)));
    let primary = duplicates.as_ref().unwrap_or(&search);
    if let Some(path) = &output {
        write_output(primary, path)?;
    }

    if json {
        return print_json(&RunOutput {
            profile: profile_path.display().to_string(),
            sources,
            failures: failures.iter().map(FailureInfo::from).collect(),
            search,
            duplicates,
        });
    }

    println!(
        "Loaded {} rows from {} sources ({} inputs failed)",
        table.len(),
        sources.len(),
        failures.len()
    );
    if !config.search_query.is_empty() {
        println!(
            "Search '{}': {} of {} rows match",
            config.search_query, search.summary.rows, search.summary.total_rows
        );
    }
    if output.is_none() {
        println!();
        print_human(primary);
    }
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn emit(report: &Report, output: Option<&Path>, json: bool) -> Result<(), CliError> {
    if let Some(path) = output {
        write_output(report, path)?;
    }
    if json {
        print_json(report)
    } else if output.is_none() {
        print_human(report);
        Ok(())
    } else {
        println!("{}", summary_line(report));
        Ok(())
    }
}

fn write_output(report: &Report, path: &Path) -> Result<(), CliError> {
    let format = write_report(report, path).map_err(CliError::export)?;
    eprintln!(
        "Wrote {} rows to {} ({})",
        report.records.len(),
        path.display(),
        format
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("failed to encode JSON: {}", e)))?;
    println!("{}", text);
    Ok(())
}

fn print_human(report: &Report) {
    if !report.is_empty() {
        print!("{}", render_table(&report.headers(), &report.rows(), MAX_COLUMN_WIDTH));
        println!();
    }
    println!("{}", summary_line(report));
}

fn summary_line(report: &Report) -> String {
    let summary = &report.summary;
    match report.kind {
        ReportKind::Search if report.meta.query.is_empty() => {
            format!("{} rows", summary.rows)
        }
        ReportKind::Search => {
            format!("{} of {} rows match '{}'", summary.rows, summary.total_rows, report.meta.query)
        }
        ReportKind::Duplicates if report.is_empty() => {
            format!("No duplicates found ({} rows checked)", summary.total_rows)
        }
        ReportKind::Duplicates => format!(
            "{} duplicate groups, {} rows (of {} checked)",
            summary.groups.unwrap_or(0),
            summary.rows,
            summary.total_rows
        ),
    }
}
