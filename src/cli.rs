//! コマンドライン モード

use crate::backend::AnyBackend;
use crate::batch::BatchOrchestrator;
use crate::config::{Language, Service, Settings};
use crate::job::TranslationOptions;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// PDFファイル翻訳ツール（引数なしで起動するとGUIを表示）
#[derive(Debug, Parser)]
#[command(name = "pdf_batch_translator", version, about)]
pub struct Args {
    /// 入力フォルダのパス（`--single` と同時に指定した場合は `--single` を優先）
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// 出力フォルダのパス
    #[arg(short, long, default_value = "./output")]
    pub output: PathBuf,

    /// 単一PDFファイルのパス
    #[arg(short, long)]
    pub single: Option<PathBuf>,

    /// 翻訳元の言語コード
    #[arg(long, default_value = "en")]
    pub lang_in: String,

    /// 翻訳先の言語コード
    #[arg(long, default_value = "zh")]
    pub lang_out: String,

    /// 翻訳サービス（省略時は設定の既定値）
    #[arg(long)]
    pub service: Option<String>,

    /// pdf2zh のスレッド数（省略時は設定の既定値）
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// 起動時のネットワーク確認を省略
    #[arg(long)]
    pub skip_network_check: bool,
}

impl Args {
    /// コマンドライン モードで実行するか
    pub fn is_batch(&self) -> bool {
        self.input.is_some() || self.single.is_some()
    }

    /// 引数と設定から翻訳パラメータを組み立てる
    pub fn options(&self, settings: &Settings) -> Result<TranslationOptions> {
        let lang_in: Language = self.lang_in.parse()?;
        let lang_out: Language = self.lang_out.parse()?;
        let service: Service = match self.service {
            Some(ref s) => s.parse()?,
            None => settings.default_service,
        };
        let threads = self.threads.unwrap_or(settings.default_threads);
        Ok(TranslationOptions::new(lang_in, lang_out, service, threads)?)
    }
}

/// コマンドライン モードを実行
///
/// 個々のファイルの失敗は終了コードに影響しない。
pub fn run(args: &Args, settings: &Settings) -> Result<()> {
    let options = args.options(settings)?;
    let backend = AnyBackend::from_settings(settings).context("翻訳エンジンの初期化に失敗")?;
    let orchestrator = BatchOrchestrator::new(backend);

    let runtime = tokio::runtime::Runtime::new().context("Tokioランタイムの作成に失敗")?;
    runtime.block_on(async {
        if let Some(ref single) = args.single {
            run_single(&orchestrator, single, &args.output, &options).await
        } else if let Some(ref input) = args.input {
            run_directory(&orchestrator, input, &args.output, &options).await
        } else {
            Ok(())
        }
    })
}

async fn run_single(
    orchestrator: &BatchOrchestrator<AnyBackend>,
    input: &Path,
    output: &Path,
    options: &TranslationOptions,
) -> Result<()> {
    let result = orchestrator
        .translate_single(input, output, options)
        .await
        .with_context(|| format!("{} を翻訳できません", input.display()))?;

    // 失敗は通知先がログに出している
    if let Some(output_path) = result.output_path() {
        info!("出力ファイル: {}", output_path.display());
    }
    Ok(())
}

async fn run_directory(
    orchestrator: &BatchOrchestrator<AnyBackend>,
    input: &Path,
    output: &Path,
    options: &TranslationOptions,
) -> Result<()> {
    let run = orchestrator
        .translate_directory(input, output, options)
        .await
        .with_context(|| format!("{} を処理できません", input.display()))?;

    if run.failure_count() > 0 {
        warn!("{} 件のファイルが翻訳できませんでした", run.failure_count());
    }
    Ok(())
}
