//! GUIモジュール - フォーム形式の翻訳画面

mod app;
mod form;
mod theme;

pub use app::{PdfTranslatorApp, WorkerMessage, run};
pub use form::{InputKind, TranslationRequest, validate_paths};
