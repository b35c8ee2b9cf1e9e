//! pdf2zh 実行ファイルを子プロセスとして起動するエンジン

use super::{TranslatedDocument, TranslationBackend};
use crate::config::ProxyConfig;
use crate::error::BackendError;
use crate::job::TranslationOptions;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// 作業ディレクトリに置く入力ファイル名
const INPUT_NAME: &str = "input.pdf";
/// pdf2zh が出力する翻訳のみのPDF
const MONO_NAME: &str = "input-mono.pdf";
/// pdf2zh が出力する対訳PDF
const DUAL_NAME: &str = "input-dual.pdf";
/// エラーに含める標準エラー出力の行数
const STDERR_TAIL_LINES: usize = 20;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// `pdf2zh` コマンドによる翻訳
#[derive(Debug, Clone)]
pub struct Pdf2zhProcess {
    program: PathBuf,
    proxy: ProxyConfig,
}

impl Pdf2zhProcess {
    pub fn new(program: impl Into<PathBuf>, proxy: ProxyConfig) -> Self {
        Self {
            program: program.into(),
            proxy,
        }
    }

    fn command(&self, work_dir: &Path, input: &Path, options: &TranslationOptions) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(input)
            .args(["-li", options.lang_in.code()])
            .args(["-lo", options.lang_out.code()])
            .args(["-s", options.service.id()])
            .arg("-t")
            .arg(options.threads.to_string())
            .arg("-o")
            .arg(work_dir)
            .current_dir(work_dir)
            // プロキシは子プロセスにのみ渡す
            .envs(self.proxy.env_pairs())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        command
    }
}

impl TranslationBackend for Pdf2zhProcess {
    async fn translate(
        &self,
        pdf: Vec<u8>,
        options: &TranslationOptions,
    ) -> Result<TranslatedDocument, BackendError> {
        let work_dir = tempfile::Builder::new()
            .prefix("pdf_translator_")
            .tempdir()?;
        let input = work_dir.path().join(INPUT_NAME);
        std::fs::write(&input, &pdf)?;

        debug!(
            "pdf2zh を起動: {} ({} -> {}, {}, {} threads)",
            self.program.display(),
            options.lang_in,
            options.lang_out,
            options.service,
            options.threads
        );

        let output = self
            .command(work_dir.path(), &input, options)
            .output()
            .await
            .map_err(|source| BackendError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(BackendError::Exit {
                code: output.status.code(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        let mono_path = work_dir.path().join(MONO_NAME);
        if !mono_path.is_file() {
            return Err(BackendError::MissingOutput(mono_path));
        }
        let mono = std::fs::read(&mono_path)?;
        let dual = std::fs::read(work_dir.path().join(DUAL_NAME)).ok();

        Ok(TranslatedDocument { mono, dual })
    }
}

/// 標準エラー出力の末尾だけを取り出す（進捗バーの出力が長いため）
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
