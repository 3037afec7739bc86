//! Library exports for reuse in tests and developer tools.
/// Run configuration loaded from TOML and CLI flags.
pub mod config;
/// Logging setup for the pipeline binary.
pub mod logging;
/// Text vectorization and few-shot classifiers.
pub mod ml;
/// Output workbook copy, cell filling and path derivation.
pub mod output;
/// End-to-end labeling pipeline orchestration.
pub mod pipeline;
/// Capped, language-stratified few-shot sampling.
pub mod sampler;
/// Sentiment fallback rules based on review ratings.
pub mod sentiment;
/// Label frequency tallies and HTML summary cards.
pub mod summary;
/// In-memory review table and column resolution.
pub mod table;
/// Static theme/subtheme taxonomy.
pub mod taxonomy;
/// Bilingual text normalization and tokenization.
pub mod text;
