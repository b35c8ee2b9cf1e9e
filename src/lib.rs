//! PDF一括翻訳ツール - pdf2zh を使ったPDF翻訳のフロントエンド
//!
//! # 機能
//! - 単一PDF、またはフォルダ配下のPDFを順番に翻訳
//! - 1ファイルの失敗で全体を止めない一括処理と進捗通知
//! - プロキシ設定を明示的に渡す翻訳エンジン（pdf2zh コマンド / タスクサーバー）
//! - コマンドラインとGUIの両方に対応

pub mod backend;
pub mod batch;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod gui;
pub mod job;
pub mod network;

pub use backend::{AnyBackend, TranslatedDocument, TranslationBackend};
pub use batch::{BatchEvent, BatchObserver, BatchOrchestrator};
pub use config::Settings;
pub use error::{BackendError, TranslatorError};
pub use job::{BatchRun, JobOutcome, JobResult, TranslationJob, TranslationOptions};
