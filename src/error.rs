//! エラー型

use std::path::PathBuf;
use thiserror::Error;

/// 翻訳処理全体のエラー
#[derive(Debug, Error)]
pub enum TranslatorError {
    /// 入力ファイル/ディレクトリが存在しない
    #[error("パスが存在しません: {}", .0.display())]
    NotFound(PathBuf),

    /// 翻訳エンジンの呼び出しに失敗
    #[error("翻訳エンジンエラー: {0}")]
    Backend(#[from] BackendError),

    /// ファイルの読み書きに失敗
    #[error("ファイル操作に失敗 ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 言語・サービス・環境変数などの設定が不正
    #[error("設定エラー: {0}")]
    Config(String),
}

impl TranslatorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// 翻訳エンジン（pdf2zh）側のエラー
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("pdf2zh の起動に失敗 ({program}): {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pdf2zh が異常終了 (code: {code:?}): {stderr}")]
    Exit { code: Option<i32>, stderr: String },

    #[error("翻訳結果ファイルが見つかりません: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("翻訳サーバーとの通信に失敗: {0}")]
    Http(#[from] reqwest::Error),

    #[error("翻訳タスクが失敗 (state: {state})")]
    TaskFailed { state: String },

    #[error("一時ファイルの操作に失敗: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TranslatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_converts_into_translator_error() {
        let err: TranslatorError = BackendError::TaskFailed {
            state: "FAILURE".to_string(),
        }
        .into();
        assert!(matches!(err, TranslatorError::Backend(_)));
        assert!(err.to_string().contains("FAILURE"));
    }

    #[test]
    fn not_found_message_names_the_path() {
        let err = TranslatorError::NotFound(PathBuf::from("missing/a.pdf"));
        assert!(err.to_string().contains("missing/a.pdf"));
    }
}
