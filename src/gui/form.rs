//! 入力フォームの検証

use crate::discovery::PDF_EXTENSION;
use std::path::PathBuf;

/// 入力パスの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Directory,
}

/// 検証済みの翻訳依頼
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: InputKind,
}

/// 入力・出力パスを検証（エラー時は表示用メッセージ）
pub fn validate_paths(input: &str, output: &str) -> Result<TranslationRequest, String> {
    let input = input.trim();
    let output = output.trim();

    if input.is_empty() {
        return Err("入力ファイルまたはフォルダを選択してください".to_string());
    }
    if output.is_empty() {
        return Err("出力フォルダを選択してください".to_string());
    }

    let input = PathBuf::from(input);
    let kind = if input.is_file() {
        let is_pdf = input
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(PDF_EXTENSION));
        if !is_pdf {
            return Err("入力ファイルはPDF形式である必要があります".to_string());
        }
        InputKind::File
    } else if input.is_dir() {
        InputKind::Directory
    } else {
        return Err(format!("入力パスが存在しません: {}", input.display()));
    };

    Ok(TranslationRequest {
        input,
        output: PathBuf::from(output),
        kind,
    })
}
