//! End-to-end labeling pipeline orchestration.
//!
//! Single-threaded, single-pass: load the table once, build the two few-shot
//! sets, fit both classifiers, predict over the full table, resolve sentiment
//! fallbacks, then fill and save the output copy. Only the input-file checks
//! are fatal; everything downstream degrades to empty/absent.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::ml::{FewShotClassifier, predict_or_empty};
use crate::output::{FillCounts, RowLabels, derive_output_path, write_predictions};
use crate::sampler::{TrainingSet, build_training_set};
use crate::sentiment;
use crate::summary::{LabelTally, tally};
use crate::table::columns::{
    LANGUAGE_CANDIDATES, RATING_CANDIDATES, SENTIMENT_GT_CANDIDATES, SUBTHEME_GT_CANDIDATES,
    TEXT_CANDIDATES,
};
use crate::table::{InputError, Table, load_table, validate_input};
use crate::taxonomy::derive_theme;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input validation or loading failed.
    #[error(transparent)]
    Input(#[from] InputError),
    /// Writing the output workbook failed.
    #[error(transparent)]
    Output(#[from] crate::output::OutputError),
    /// No text column could be resolved; nothing can be classified.
    #[error("No review text column found among candidates: {candidates:?}")]
    MissingTextColumn {
        /// Candidate headers that were tried.
        candidates: Vec<String>,
    },
    /// Classifier training failed on internally inconsistent data.
    #[error("Training failed: {0}")]
    Training(String),
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// Path of the saved output workbook.
    pub output: PathBuf,
    /// Few-shot sample size for the subtheme target.
    pub subtheme_samples: usize,
    /// Few-shot sample size for the sentiment target.
    pub sentiment_samples: usize,
    /// Cells filled per output column.
    pub counts: FillCounts,
    /// Frequency tallies of predicted themes.
    pub themes: Vec<LabelTally>,
    /// Frequency tallies of predicted subthemes.
    pub subthemes: Vec<LabelTally>,
    /// Frequency tallies of fallback-resolved sentiments.
    pub sentiments: Vec<LabelTally>,
}

/// Run the whole labeling pipeline for one input workbook.
pub fn run(config: &RunConfig) -> Result<RunReport, PipelineError> {
    validate_input(&config.input)?;
    let output = derive_output_path(&config.input);
    let table = load_table(&config.input, config.sheet.as_deref())?;
    info!(
        rows = table.n_rows(),
        columns = table.headers().len(),
        "Loaded input table from {}",
        config.input.display()
    );

    let text_col =
        table
            .resolve(TEXT_CANDIDATES)
            .ok_or_else(|| PipelineError::MissingTextColumn {
                candidates: TEXT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
            })?;
    let subtheme_gt_col = resolve_optional(&table, SUBTHEME_GT_CANDIDATES, "subtheme ground truth");
    let sentiment_gt_col =
        resolve_optional(&table, SENTIMENT_GT_CANDIDATES, "sentiment ground truth");
    let rating_col = resolve_optional(&table, RATING_CANDIDATES, "rating");
    let language_col = resolve_optional(&table, LANGUAGE_CANDIDATES, "language");

    let sample_for = |label_col: Option<usize>| -> Option<TrainingSet> {
        label_col.map(|col| {
            build_training_set(
                &table,
                text_col,
                col,
                language_col,
                &config.limits,
                config.seed,
            )
        })
    };
    let subtheme_set = sample_for(subtheme_gt_col);
    let sentiment_set = sample_for(sentiment_gt_col);
    let subtheme_samples = subtheme_set.as_ref().map_or(0, TrainingSet::len);
    let sentiment_samples = sentiment_set.as_ref().map_or(0, TrainingSet::len);
    info!(
        subtheme = subtheme_samples,
        sentiment = sentiment_samples,
        "Few-shot sample sizes"
    );

    let subtheme_model = fit_model(subtheme_set.as_ref(), config.seed, Target::Subtheme)?;
    let sentiment_model = fit_model(sentiment_set.as_ref(), config.seed, Target::Sentiment)?;

    let texts: Vec<String> = table
        .column(text_col)
        .iter()
        .map(|cell| cell.to_display())
        .collect();
    let subtheme_pred = predict_or_empty(subtheme_model.as_ref(), &texts);
    let sentiment_base = predict_or_empty(sentiment_model.as_ref(), &texts);
    let sentiment_pred: Vec<String> = texts
        .iter()
        .zip(sentiment_base.iter())
        .enumerate()
        .map(|(row, (text, base))| {
            let rating = rating_col.and_then(|col| table.cell(row, col).as_number());
            sentiment::resolve(text, base, rating)
        })
        .collect();

    let subtheme_gt = ground_truth(&table, subtheme_gt_col);
    let sentiment_gt = ground_truth(&table, sentiment_gt_col);

    let labels = RowLabels {
        subtheme_gt: &subtheme_gt,
        sentiment_gt: &sentiment_gt,
        subtheme_pred: &subtheme_pred,
        sentiment_pred: &sentiment_pred,
    };
    let counts = write_predictions(
        &config.input,
        &output,
        config.sheet.as_deref(),
        table.n_rows(),
        &labels,
    )?;
    info!("Saved: {}", output.display());
    info!(
        theme = counts.theme,
        subtheme = counts.subtheme,
        sentiment = counts.sentiment,
        "Filled previously-empty cells"
    );

    let predicted_themes: Vec<String> = subtheme_pred
        .iter()
        .filter(|prediction| !prediction.trim().is_empty())
        .map(|prediction| derive_theme(prediction).unwrap_or_default().to_string())
        .collect();

    Ok(RunReport {
        output,
        subtheme_samples,
        sentiment_samples,
        counts,
        themes: tally(predicted_themes.iter().map(String::as_str)),
        subthemes: tally(subtheme_pred.iter().map(String::as_str)),
        sentiments: tally(sentiment_pred.iter().map(String::as_str)),
    })
}

enum Target {
    Subtheme,
    Sentiment,
}

fn fit_model(
    set: Option<&TrainingSet>,
    seed: u64,
    target: Target,
) -> Result<Option<FewShotClassifier>, PipelineError> {
    let Some(set) = set else {
        return Ok(None);
    };
    if set.is_empty() {
        return Ok(None);
    }
    let name = match target {
        Target::Subtheme => "subtheme",
        Target::Sentiment => "sentiment",
    };
    let model = match target {
        Target::Subtheme => FewShotClassifier::fit_max_margin(&set.texts, &set.labels, seed),
        Target::Sentiment => FewShotClassifier::fit_logistic(&set.texts, &set.labels, seed),
    }
    .map_err(PipelineError::Training)?;
    if model.is_none() {
        warn!("Fewer than two {name} classes in the sample; predictions stay empty");
    }
    Ok(model)
}

fn resolve_optional(table: &Table, candidates: &[&str], what: &str) -> Option<usize> {
    let resolved = table.resolve(candidates);
    match resolved {
        Some(index) => info!("Resolved {what} column: {}", table.headers()[index]),
        None => warn!("No {what} column found; dependent behavior degrades"),
    }
    resolved
}

fn ground_truth(table: &Table, column: Option<usize>) -> Vec<Option<String>> {
    (0..table.n_rows())
        .map(|row| column.and_then(|col| table.cell(row, col).as_trimmed()))
        .collect()
}
