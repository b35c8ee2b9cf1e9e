//! 翻訳ジョブと処理結果

use crate::config::{Language, Service};
use crate::error::{Result, TranslatorError};
use std::path::{Path, PathBuf};

/// バッチ全体に適用する翻訳パラメータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationOptions {
    pub lang_in: Language,
    pub lang_out: Language,
    pub service: Service,
    /// pdf2zh にそのまま渡すスレッド数
    pub threads: usize,
}

impl TranslationOptions {
    /// 処理開始前に組み合わせを検証して作成
    pub fn new(lang_in: Language, lang_out: Language, service: Service, threads: usize) -> Result<Self> {
        if lang_in == lang_out {
            return Err(TranslatorError::Config(format!(
                "翻訳元と翻訳先が同じ言語です: {}",
                lang_in.label()
            )));
        }
        if threads == 0 {
            return Err(TranslatorError::Config("スレッド数は1以上にしてください".to_string()));
        }
        Ok(Self {
            lang_in,
            lang_out,
            service,
            threads,
        })
    }
}

/// 1ファイル分の翻訳ジョブ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub source_path: PathBuf,
    pub output_directory: PathBuf,
    pub options: TranslationOptions,
}

impl TranslationJob {
    pub fn new(source_path: impl Into<PathBuf>, output_directory: impl Into<PathBuf>, options: TranslationOptions) -> Self {
        Self {
            source_path: source_path.into(),
            output_directory: output_directory.into(),
            options,
        }
    }

    /// 出力先: `<出力ディレクトリ>/<元ファイル名>_translated.pdf`
    pub fn output_path(&self) -> PathBuf {
        self.output_directory.join(translated_file_name(&self.source_path))
    }

    /// 表示用のファイル名
    pub fn file_name(&self) -> String {
        display_name(&self.source_path)
    }
}

/// 翻訳後のファイル名
pub fn translated_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());
    format!("{}_translated.pdf", stem)
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 1ファイルの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Success { output_path: PathBuf },
    Failure { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub source_path: PathBuf,
    pub outcome: JobOutcome,
}

impl JobResult {
    pub fn success(source_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            outcome: JobOutcome::Success {
                output_path: output_path.into(),
            },
        }
    }

    pub fn failure(source_path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            outcome: JobOutcome::Failure {
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, JobOutcome::Success { .. })
    }

    pub fn output_path(&self) -> Option<&Path> {
        match self.outcome {
            JobOutcome::Success { ref output_path } => Some(output_path),
            JobOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self.outcome {
            JobOutcome::Success { .. } => None,
            JobOutcome::Failure { ref reason } => Some(reason),
        }
    }

    pub fn file_name(&self) -> String {
        display_name(&self.source_path)
    }
}

/// ディレクトリ1回分の処理結果（探索順）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchRun {
    results: Vec<JobResult>,
}

impl BatchRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, result: JobResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[JobResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }
}

impl IntoIterator for BatchRun {
    type Item = JobResult;
    type IntoIter = std::vec::IntoIter<JobResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchRun {
    type Item = &'a JobResult;
    type IntoIter = std::slice::Iter<'a, JobResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
