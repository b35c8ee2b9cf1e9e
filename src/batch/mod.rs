//! バッチ翻訳 - 単一ファイル/ディレクトリ単位で翻訳エンジンを呼び出す
//!
//! ファイルは探索順に1つずつ処理する。1ファイルの失敗（読み込み・翻訳・書き込み）は
//! 結果に記録するだけで、残りのファイルの処理は続ける。

mod observer;

pub use observer::{BatchEvent, BatchObserver, ChannelObserver, LogObserver, progress_line};

use crate::backend::TranslationBackend;
use crate::discovery::FileDiscovery;
use crate::error::{Result, TranslatorError};
use crate::job::{BatchRun, JobResult, TranslationJob, TranslationOptions, display_name};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// バッチ翻訳の実行役
pub struct BatchOrchestrator<B> {
    backend: B,
    observer: Arc<dyn BatchObserver>,
}

impl<B: TranslationBackend> BatchOrchestrator<B> {
    /// ログ出力のみの通知先で作成
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            observer: Arc::new(LogObserver),
        }
    }

    /// 進捗の通知先を差し替える
    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 単一ファイルを翻訳
    ///
    /// 入力が存在しなければ出力ディレクトリを作らずに `NotFound` を返す。
    /// 翻訳自体の失敗は `Ok(JobResult)` の失敗として返る。
    pub async fn translate_single(
        &self,
        input_path: &Path,
        output_dir: &Path,
        options: &TranslationOptions,
    ) -> Result<JobResult> {
        if !input_path.exists() {
            error!("ファイルが存在しません: {}", input_path.display());
            return Err(TranslatorError::NotFound(input_path.to_path_buf()));
        }

        ensure_output_dir(output_dir)?;

        let job = TranslationJob::new(input_path, output_dir, *options);
        Ok(self.run_job(&job).await)
    }

    /// ディレクトリ配下のPDFをすべて翻訳
    pub async fn translate_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        options: &TranslationOptions,
    ) -> Result<BatchRun> {
        let discovery = FileDiscovery::new(input_dir).inspect_err(|_| {
            error!("ディレクトリが存在しません: {}", input_dir.display());
        })?;
        let files: Vec<PathBuf> = discovery.files().collect();

        if files.is_empty() {
            self.observer.on_no_files(input_dir);
            return Ok(BatchRun::new());
        }

        let total = files.len();
        info!("{} 個のPDFファイルが見つかりました", total);

        ensure_output_dir(output_dir)?;

        let mut run = BatchRun::new();
        for (i, path) in files.into_iter().enumerate() {
            let index = i + 1;
            let file_name = display_name(&path);

            self.observer.on_file_started(index, total, &file_name);
            let job = TranslationJob::new(path, output_dir, *options);
            run.push(self.run_job(&job).await);
            self.observer.on_progress(index, total, &file_name);
        }

        let success_count = run.success_count();
        info!("===== すべてのファイルの処理が完了 =====");
        info!("出力ディレクトリ: {}", output_dir.display());
        self.observer.on_batch_complete(success_count, total);

        Ok(run)
    }

    /// 1ファイルを処理し、失敗は結果に変換する
    async fn run_job(&self, job: &TranslationJob) -> JobResult {
        let file_name = job.file_name();
        info!("===== 翻訳開始: {} =====", file_name);

        match self.translate_file(job).await {
            Ok(output_path) => {
                info!("===== {} の翻訳が完了 =====", file_name);
                JobResult::success(&job.source_path, output_path)
            }
            Err(e) => {
                // ログ出力は通知先に任せる
                let reason = e.to_string();
                self.observer.on_file_failure(&file_name, &reason);
                JobResult::failure(&job.source_path, reason)
            }
        }
    }

    async fn translate_file(&self, job: &TranslationJob) -> Result<PathBuf> {
        info!("ファイルを読み込み中: {}", job.source_path.display());
        let pdf = fs::read(&job.source_path).map_err(|e| TranslatorError::io(&job.source_path, e))?;
        info!("ファイルサイズ: {:.2}MB", megabytes(pdf.len()));

        info!("翻訳中...");
        let translated = self.backend.translate(pdf, &job.options).await?;
        info!("翻訳完了、出力サイズ: {:.2}MB", megabytes(translated.mono.len()));

        // 同名ファイルは上書き
        let output_path = job.output_path();
        info!("翻訳結果を保存: {}", output_path.display());
        fs::write(&output_path, &translated.mono).map_err(|e| TranslatorError::io(&output_path, e))?;

        Ok(output_path)
    }
}

fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|e| TranslatorError::io(output_dir, e))
}

fn megabytes(len: usize) -> f64 {
    len as f64 / (1024.0 * 1024.0)
}
