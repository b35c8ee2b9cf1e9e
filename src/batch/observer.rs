//! 進捗通知

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use tracing::{error, info, warn};

/// バッチ処理の進捗を受け取る側
///
/// すべてのメソッドは既定で何もしない。`index` は1始まり。
pub trait BatchObserver: Send + Sync {
    /// ファイルの処理を開始する直前
    fn on_file_started(&self, _index: usize, _total: usize, _file_name: &str) {}

    /// ファイルの処理が終わった直後（成功・失敗を問わない）
    fn on_progress(&self, _index: usize, _total: usize, _file_name: &str) {}

    /// ファイルの翻訳に失敗した
    fn on_file_failure(&self, _file_name: &str, _reason: &str) {}

    /// ディレクトリ内のすべてのファイルを処理した
    fn on_batch_complete(&self, _success_count: usize, _total_count: usize) {}

    /// 対象ファイルが1つも見つからなかった
    fn on_no_files(&self, _input_dir: &Path) {}
}

/// ログに出力するだけの通知先
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl BatchObserver for LogObserver {
    fn on_file_started(&self, index: usize, total: usize, file_name: &str) {
        info!("{}/{} 個目のファイルを処理中: {}", index, total, file_name);
    }

    fn on_progress(&self, index: usize, total: usize, file_name: &str) {
        info!("{}", progress_line(index, total, file_name));
    }

    fn on_file_failure(&self, file_name: &str, reason: &str) {
        error!("{} の翻訳に失敗: {}", file_name, reason);
    }

    fn on_batch_complete(&self, success_count: usize, total_count: usize) {
        info!("完了: {}/{} 件成功", success_count, total_count);
    }

    fn on_no_files(&self, input_dir: &Path) {
        warn!("{} にPDFファイルが見つかりません", input_dir.display());
    }
}

/// 全体の進捗を表す1行（例: `進捗: [#####-----] 1/2 完了 (a.pdf)`）
pub fn progress_line(index: usize, total: usize, file_name: &str) -> String {
    const WIDTH: usize = 20;
    let filled = (index * WIDTH).checked_div(total).unwrap_or(WIDTH).min(WIDTH);
    format!(
        "進捗: [{}{}] {}/{} 完了 ({})",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        index,
        total,
        file_name
    )
}

/// チャンネルで送られる進捗イベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    FileStarted {
        index: usize,
        total: usize,
        file_name: String,
    },
    Progress {
        index: usize,
        total: usize,
        file_name: String,
    },
    FileFailed {
        file_name: String,
        reason: String,
    },
    BatchComplete {
        success_count: usize,
        total_count: usize,
    },
    NoFiles {
        input_dir: PathBuf,
    },
}

/// イベントをチャンネルへ転送する通知先（GUI用）
///
/// 受信側が先に破棄されていても送信エラーは無視する。
#[derive(Debug)]
pub struct ChannelObserver<T> {
    tx: Sender<T>,
}

impl<T> ChannelObserver<T> {
    pub fn new(tx: Sender<T>) -> Self {
        Self { tx }
    }
}

impl<T: From<BatchEvent>> ChannelObserver<T> {
    fn send(&self, event: BatchEvent) {
        let _ = self.tx.send(T::from(event));
    }
}

impl<T: From<BatchEvent> + Send> BatchObserver for ChannelObserver<T> {
    fn on_file_started(&self, index: usize, total: usize, file_name: &str) {
        self.send(BatchEvent::FileStarted {
            index,
            total,
            file_name: file_name.to_string(),
        });
    }

    fn on_progress(&self, index: usize, total: usize, file_name: &str) {
        self.send(BatchEvent::Progress {
            index,
            total,
            file_name: file_name.to_string(),
        });
    }

    fn on_file_failure(&self, file_name: &str, reason: &str) {
        self.send(BatchEvent::FileFailed {
            file_name: file_name.to_string(),
            reason: reason.to_string(),
        });
    }

    fn on_batch_complete(&self, success_count: usize, total_count: usize) {
        self.send(BatchEvent::BatchComplete {
            success_count,
            total_count,
        });
    }

    fn on_no_files(&self, input_dir: &Path) {
        self.send(BatchEvent::NoFiles {
            input_dir: input_dir.to_path_buf(),
        });
    }
}
