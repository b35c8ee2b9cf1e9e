//! メインアプリケーションウィンドウ

use super::form::{InputKind, TranslationRequest, validate_paths};
use super::theme::{Colors, light_theme};
use crate::backend::AnyBackend;
use crate::batch::{BatchEvent, BatchOrchestrator, ChannelObserver};
use crate::config::{Language, Settings};
use crate::job::{BatchRun, JobOutcome, JobResult, TranslationOptions};
use anyhow::{Context, Result};
use eframe::egui;
use egui::{CentralPanel, ComboBox, RichText, Vec2};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use tokio::runtime::Runtime;
use tracing::warn;

const DEFAULT_OUTPUT_DIR: &str = "./output";

/// バックグラウンド処理からの通知
#[derive(Debug)]
pub enum WorkerMessage {
    Event(BatchEvent),
    SingleDone(JobResult),
    DirectoryDone(BatchRun),
    Failed(String),
}

impl From<BatchEvent> for WorkerMessage {
    fn from(event: BatchEvent) -> Self {
        WorkerMessage::Event(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

struct LogLine {
    time: String,
    level: LogLevel,
    text: String,
}

/// アプリケーション状態
pub struct PdfTranslatorApp {
    settings: Settings,
    /// Tokioランタイム
    runtime: Runtime,
    /// 起動時に検出した翻訳エンジンの設定エラー
    backend_error: Option<String>,
    lang_in: Language,
    lang_out: Language,
    input_path: String,
    output_path: String,
    /// 翻訳状態のログ
    log: Vec<LogLine>,
    is_processing: bool,
    progress: f32,
    status: String,
    msg_rx: Receiver<WorkerMessage>,
    msg_tx: Sender<WorkerMessage>,
}

impl PdfTranslatorApp {
    pub fn new(settings: Settings) -> Result<Self> {
        let (msg_tx, msg_rx) = channel();
        let backend_error = AnyBackend::from_settings(&settings).err().map(|e| e.to_string());

        Ok(Self {
            settings,
            runtime: Runtime::new().context("Tokioランタイムの作成に失敗")?,
            backend_error,
            lang_in: Language::English,
            lang_out: Language::Chinese,
            input_path: String::new(),
            output_path: DEFAULT_OUTPUT_DIR.to_string(),
            log: Vec::new(),
            is_processing: false,
            progress: 0.0,
            status: "入力ファイルまたはフォルダを選択してください".to_string(),
            msg_rx,
            msg_tx,
        })
    }

    fn push_log(&mut self, level: LogLevel, text: impl Into<String>) {
        self.log.push(LogLine {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            text: text.into(),
        });
    }

    fn switch_languages(&mut self) {
        std::mem::swap(&mut self.lang_in, &mut self.lang_out);
    }

    /// 翻訳を開始
    fn start_translation(&mut self) {
        let request = match validate_paths(&self.input_path, &self.output_path) {
            Ok(request) => request,
            Err(message) => {
                show_error(&message);
                return;
            }
        };

        let options = match TranslationOptions::new(
            self.lang_in,
            self.lang_out,
            self.settings.default_service,
            self.settings.default_threads,
        ) {
            Ok(options) => options,
            Err(e) => {
                show_error(&e.to_string());
                return;
            }
        };

        let backend = match AnyBackend::from_settings(&self.settings) {
            Ok(backend) => backend,
            Err(e) => {
                show_error(&format!("翻訳エンジンの初期化に失敗: {}", e));
                return;
            }
        };

        self.log.clear();
        match request.kind {
            InputKind::File => {
                self.push_log(LogLevel::Info, "===== 翻訳開始 =====");
                self.push_log(LogLevel::Info, format!("入力ファイル: {}", request.input.display()));
            }
            InputKind::Directory => {
                self.push_log(LogLevel::Info, "===== 一括翻訳開始 =====");
                self.push_log(LogLevel::Info, format!("入力フォルダ: {}", request.input.display()));
            }
        }
        self.push_log(LogLevel::Info, format!("出力フォルダ: {}", request.output.display()));
        self.push_log(
            LogLevel::Info,
            format!(
                "{} → {} ({}, {} threads)",
                options.lang_in.label(),
                options.lang_out.label(),
                options.service,
                options.threads
            ),
        );

        self.is_processing = true;
        self.progress = 0.0;
        self.status = "翻訳中...".to_string();

        let tx = self.msg_tx.clone();
        let orchestrator =
            BatchOrchestrator::new(backend).with_observer(Arc::new(ChannelObserver::new(tx.clone())));

        // バックグラウンドで処理
        spawn_worker(&self.runtime, tx, async move {
            run_request(&orchestrator, &request, &options).await
        });
    }

    /// 結果を受信
    fn receive_messages(&mut self) {
        while let Ok(message) = self.msg_rx.try_recv() {
            match message {
                WorkerMessage::Event(event) => self.apply_event(event),
                WorkerMessage::SingleDone(result) => {
                    self.is_processing = false;
                    self.progress = 1.0;
                    match result.outcome {
                        JobOutcome::Success { ref output_path } => {
                            self.push_log(LogLevel::Success, format!("保存先: {}", output_path.display()));
                            self.push_log(LogLevel::Success, "===== 翻訳完了 =====");
                            self.status = "翻訳完了".to_string();
                        }
                        JobOutcome::Failure { .. } => {
                            self.push_log(LogLevel::Error, "===== 翻訳失敗 =====");
                            self.status = "翻訳に失敗しました".to_string();
                        }
                    }
                }
                WorkerMessage::DirectoryDone(run) => {
                    self.is_processing = false;
                    self.progress = 1.0;
                    self.status = if run.is_empty() {
                        "PDFファイルが見つかりません".to_string()
                    } else {
                        format!("完了: {} 件成功, {} 件失敗", run.success_count(), run.failure_count())
                    };
                }
                WorkerMessage::Failed(reason) => {
                    self.is_processing = false;
                    self.push_log(LogLevel::Error, format!("翻訳中にエラーが発生: {}", reason));
                    self.status = "エラー".to_string();
                    show_error(&format!("翻訳に失敗: {}", reason));
                }
            }
        }
    }

    fn apply_event(&mut self, event: BatchEvent) {
        match event {
            BatchEvent::FileStarted {
                index,
                total,
                file_name,
            } => {
                self.status = format!("{}/{} 個目を翻訳中: {}", index, total, file_name);
                self.push_log(
                    LogLevel::Info,
                    format!("{}/{} 個目のファイルを翻訳中: {}", index, total, file_name),
                );
            }
            BatchEvent::Progress { index, total, .. } => {
                self.progress = index as f32 / total.max(1) as f32;
            }
            BatchEvent::FileFailed { file_name, reason } => {
                self.push_log(LogLevel::Error, format!("{} の翻訳に失敗: {}", file_name, reason));
            }
            BatchEvent::BatchComplete {
                success_count,
                total_count,
            } => {
                self.push_log(LogLevel::Success, "===== 一括翻訳完了 =====");
                self.push_log(
                    LogLevel::Success,
                    format!("{}/{} 件のファイルを翻訳しました", success_count, total_count),
                );
            }
            BatchEvent::NoFiles { input_dir } => {
                self.push_log(
                    LogLevel::Warning,
                    format!("{} にPDFファイルが見つかりません", input_dir.display()),
                );
            }
        }
    }

    fn language_picker(ui: &mut egui::Ui, id: &str, value: &mut Language) {
        ComboBox::from_id_salt(id)
            .selected_text(value.label())
            .width(120.0)
            .show_ui(ui, |ui| {
                for lang in Language::ALL {
                    ui.selectable_value(value, lang, lang.label());
                }
            });
    }
}

impl eframe::App for PdfTranslatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_messages();

        // 処理中は再描画を要求
        if self.is_processing {
            ctx.request_repaint();
        }

        CentralPanel::default().show(ctx, |ui| {
            ui.spacing_mut().item_spacing = Vec2::new(8.0, 10.0);

            ui.heading(RichText::new("PDF Translator").size(24.0).color(Colors::TEXT_PRIMARY));

            if let Some(ref error) = self.backend_error {
                ui.label(RichText::new(format!("⚠ 翻訳エンジンの設定が不正です: {}", error)).color(Colors::ERROR));
            }

            // 言語設定
            ui.group(|ui| {
                ui.label(RichText::new("言語設定").color(Colors::TEXT_MUTED));
                ui.horizontal(|ui| {
                    ui.label("翻訳元:");
                    Self::language_picker(ui, "lang_in", &mut self.lang_in);
                    if ui.button("⇄").on_hover_text("言語を入れ替え").clicked() {
                        self.switch_languages();
                    }
                    ui.label("翻訳先:");
                    Self::language_picker(ui, "lang_out", &mut self.lang_out);
                });
            });

            // ファイル設定
            ui.add_enabled_ui(!self.is_processing, |ui| {
                ui.group(|ui| {
                    ui.label(RichText::new("ファイル設定").color(Colors::TEXT_MUTED));
                    ui.horizontal(|ui| {
                        ui.label("入力パス:");
                        ui.add(egui::TextEdit::singleline(&mut self.input_path).desired_width(300.0));
                        if ui.button("ファイルを選択").clicked() {
                            if let Some(file) = rfd::FileDialog::new()
                                .set_title("PDFファイルを選択")
                                .add_filter("PDF files", &["pdf"])
                                .add_filter("All files", &["*"])
                                .pick_file()
                            {
                                self.input_path = file.display().to_string();
                            }
                        }
                        if ui.button("フォルダを選択").clicked() {
                            if let Some(dir) = rfd::FileDialog::new().set_title("入力フォルダを選択").pick_folder() {
                                self.input_path = dir.display().to_string();
                            }
                        }
                    });
                    ui.horizontal(|ui| {
                        ui.label("出力先:");
                        ui.add(egui::TextEdit::singleline(&mut self.output_path).desired_width(300.0));
                        if ui.button("フォルダを選択").clicked() {
                            if let Some(dir) = rfd::FileDialog::new().set_title("出力フォルダを選択").pick_folder() {
                                self.output_path = dir.display().to_string();
                            }
                        }
                    });
                });
            });

            // 操作ボタン
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!self.is_processing, egui::Button::new("翻訳開始"))
                    .clicked()
                {
                    self.start_translation();
                }
                if ui.button("ログをクリア").clicked() {
                    self.log.clear();
                }
                let output_dir = PathBuf::from(self.output_path.trim());
                if ui
                    .add_enabled(output_dir.is_dir(), egui::Button::new("📁 出力フォルダを開く"))
                    .clicked()
                {
                    open_folder(&output_dir);
                }
            });

            // 進捗
            ui.horizontal(|ui| {
                if self.is_processing {
                    ui.spinner();
                }
                ui.label(RichText::new(&self.status).color(Colors::ACCENT));
            });
            if self.is_processing || self.progress > 0.0 {
                ui.add(egui::ProgressBar::new(self.progress).fill(Colors::ACCENT).show_percentage());
            }

            // 翻訳状態
            egui::Frame::new()
                .fill(Colors::BG_LOG)
                .corner_radius(6.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for line in &self.log {
                                let color = match line.level {
                                    LogLevel::Info => Colors::TEXT_PRIMARY,
                                    LogLevel::Success => Colors::SUCCESS,
                                    LogLevel::Warning => Colors::WARNING,
                                    LogLevel::Error => Colors::ERROR,
                                };
                                ui.horizontal(|ui| {
                                    ui.label(RichText::new(&line.time).monospace().color(Colors::TEXT_MUTED));
                                    ui.label(RichText::new(&line.text).color(color));
                                });
                            }
                        });
                });
        });
    }
}

/// 処理タスクを起動し、終了時に必ず1通の完了通知を送る
///
/// タスクがパニックした場合も `Failed` を送り、フォームがロックされたままにならないようにする。
fn spawn_worker<F>(runtime: &Runtime, tx: Sender<WorkerMessage>, task: F)
where
    F: Future<Output = WorkerMessage> + Send + 'static,
{
    let handle = runtime.spawn(task);
    runtime.spawn(async move {
        let message = match handle.await {
            Ok(message) => message,
            Err(e) => WorkerMessage::Failed(format!("処理が異常終了しました: {}", e)),
        };
        let _ = tx.send(message);
    });
}

/// 依頼内容に応じて単一ファイル/フォルダの翻訳を実行
async fn run_request(
    orchestrator: &BatchOrchestrator<AnyBackend>,
    request: &TranslationRequest,
    options: &TranslationOptions,
) -> WorkerMessage {
    match request.kind {
        InputKind::File => match orchestrator
            .translate_single(&request.input, &request.output, options)
            .await
        {
            Ok(result) => WorkerMessage::SingleDone(result),
            Err(e) => WorkerMessage::Failed(e.to_string()),
        },
        InputKind::Directory => match orchestrator
            .translate_directory(&request.input, &request.output, options)
            .await
        {
            Ok(run) => WorkerMessage::DirectoryDone(run),
            Err(e) => WorkerMessage::Failed(e.to_string()),
        },
    }
}

fn show_error(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("エラー")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn open_folder(path: &Path) {
    if let Err(e) = open::that(path) {
        warn!("フォルダを開けません ({}): {}", path.display(), e);
    }
}

/// CJK表示用のシステムフォント候補
const CJK_FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\YuGothM.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
];

fn install_cjk_font(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    let Some(font_data) = CJK_FONT_CANDIDATES.iter().find_map(|path| std::fs::read(path).ok()) else {
        warn!("CJKフォントが見つからないため既定のフォントを使用します");
        return;
    };

    fonts
        .font_data
        .insert("cjk".to_owned(), egui::FontData::from_owned(font_data).into());
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, "cjk".to_owned());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .push("cjk".to_owned());

    ctx.set_fonts(fonts);
}

/// アプリケーションを起動
pub fn run(settings: Settings) -> Result<()> {
    let size = settings.window_size;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([size.width, size.height])
            .with_min_inner_size([520.0, 420.0])
            .with_title("PDF Translator"),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Translator",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_style(light_theme());
            install_cjk_font(&cc.egui_ctx);
            Ok(Box::new(PdfTranslatorApp::new(settings)?))
        }),
    )
    .map_err(|e| anyhow::anyhow!("アプリケーションエラー: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> PdfTranslatorApp {
        PdfTranslatorApp::new(Settings::default()).unwrap()
    }

    #[test]
    fn switch_languages_swaps_pair() {
        let mut app = app();
        app.switch_languages();
        assert_eq!(app.lang_in, Language::Chinese);
        assert_eq!(app.lang_out, Language::English);
    }

    #[test]
    fn batch_events_update_progress_and_log() {
        let mut app = app();
        app.is_processing = true;
        let tx = app.msg_tx.clone();
        for message in [
            WorkerMessage::from(BatchEvent::FileStarted {
                index: 1,
                total: 2,
                file_name: "a.pdf".to_string(),
            }),
            WorkerMessage::from(BatchEvent::Progress {
                index: 1,
                total: 2,
                file_name: "a.pdf".to_string(),
            }),
            WorkerMessage::from(BatchEvent::FileFailed {
                file_name: "b.pdf".to_string(),
                reason: "boom".to_string(),
            }),
        ] {
            tx.send(message).unwrap();
        }

        app.receive_messages();

        assert!(app.is_processing);
        assert_eq!(app.progress, 0.5);
        assert_eq!(app.log.len(), 2);
        assert_eq!(app.log[1].level, LogLevel::Error);
        assert!(app.log[1].text.contains("boom"));
    }

    #[test]
    fn directory_done_finishes_processing() {
        let mut app = app();
        app.is_processing = true;
        app.msg_tx.send(WorkerMessage::DirectoryDone(BatchRun::new())).unwrap();

        app.receive_messages();

        assert!(!app.is_processing);
        assert_eq!(app.progress, 1.0);
        assert_eq!(app.status, "PDFファイルが見つかりません");
    }

    #[test]
    fn panicking_worker_still_reports_failure() {
        let app = app();
        spawn_worker(&app.runtime, app.msg_tx.clone(), async {
            panic!("worker crashed");
        });

        let message = app.msg_rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert!(matches!(message, WorkerMessage::Failed(ref reason) if reason.contains("異常終了")));
    }

    #[test]
    fn single_success_logs_output_path() {
        let mut app = app();
        app.is_processing = true;
        app.msg_tx
            .send(WorkerMessage::SingleDone(JobResult::success("a.pdf", "out/a_translated.pdf")))
            .unwrap();

        app.receive_messages();

        assert!(!app.is_processing);
        assert!(app.log.iter().any(|l| l.text.contains("a_translated.pdf")));
    }
}
