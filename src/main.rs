//! Entry point for the review labeling pipeline.

use std::path::PathBuf;

use reviewtag::config::{FileConfig, RunConfig, load_file};
use reviewtag::logging;
use reviewtag::pipeline;
use reviewtag::summary::{HtmlFileSink, ReportSink, render_report};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;

    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let file = match &options.config {
        Some(path) => load_file(path).map_err(|err| err.to_string())?,
        None => FileConfig::default(),
    };
    let input = options
        .input
        .clone()
        .or_else(|| file.input.clone())
        .ok_or_else(help_text)?;
    let mut config = RunConfig::from_parts(input, file);
    if let Some(sheet) = options.sheet {
        config.sheet = Some(sheet);
    }
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    if let Some(report) = options.report {
        config.report = Some(report);
    }

    let report = pipeline::run(&config).map_err(|err| err.to_string())?;

    let html = render_report(&report.themes, &report.subthemes, &report.sentiments);
    let summary_path = config
        .report
        .clone()
        .unwrap_or_else(|| report.output.with_extension("summary.html"));
    let mut sink = HtmlFileSink::new(summary_path);
    sink.present(&html)
        .map_err(|err| format!("Failed to write summary {}: {err}", sink.path().display()))?;

    println!("Saved: {}", report.output.display());
    println!(
        "Filled -> Theme:{} | Subtheme:{} | Sentiment:{}",
        report.counts.theme, report.counts.subtheme, report.counts.sentiment
    );
    println!("Summary: {}", sink.path().display());
    Ok(())
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    sheet: Option<String>,
    seed: Option<u64>,
    report: Option<PathBuf>,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                options.config = Some(PathBuf::from(value));
            }
            "--sheet" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--sheet requires a value".to_string())?;
                options.sheet = Some(value.clone());
            }
            "--seed" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                options.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            "--report" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--report requires a value".to_string())?;
                options.report = Some(PathBuf::from(value));
            }
            unknown if unknown.starts_with('-') => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
            positional => {
                if options.input.is_some() {
                    return Err(format!("Unexpected extra argument: {positional}"));
                }
                options.input = Some(PathBuf::from(positional));
            }
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "reviewtag",
        "",
        "Labels bilingual customer reviews with Theme / Subtheme / Sentiment,",
        "training few-shot classifiers on ground-truth rows and filling only",
        "empty cells of a copy of the input workbook.",
        "",
        "Usage:",
        "  reviewtag <input.xlsx> [options]",
        "",
        "Options:",
        "  --config <file>   TOML config file (input, sheet, seed, limits, report).",
        "  --sheet <name>    Worksheet name (default: first sheet).",
        "  --seed <u64>      RNG seed for sampling and training (default: 13).",
        "  --report <file>   HTML summary path (default: next to the output).",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_input_and_flags() {
        let options = parse_args(vec![
            "Reviews_Arabic.xlsx".to_string(),
            "--seed".to_string(),
            "7".to_string(),
            "--sheet".to_string(),
            "Merged".to_string(),
        ])
        .unwrap();
        assert_eq!(options.input, Some(PathBuf::from("Reviews_Arabic.xlsx")));
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.sheet.as_deref(), Some("Merged"));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(parse_args(vec!["--frobnicate".to_string()]).is_err());
    }

    #[test]
    fn rejects_duplicate_positionals() {
        let result = parse_args(vec!["a.xlsx".to_string(), "b.xlsx".to_string()]);
        assert!(result.is_err());
    }
}
