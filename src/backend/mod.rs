//! 翻訳エンジン（pdf2zh）の呼び出し

mod process;
mod server;

pub use process::Pdf2zhProcess;
pub use server::Pdf2zhServer;

use crate::config::{BackendSettings, ProxyConfig, Settings};
use crate::error::BackendError;
use crate::job::TranslationOptions;
use std::future::Future;

/// 翻訳済みPDF
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedDocument {
    /// 翻訳のみのPDF
    pub mono: Vec<u8>,
    /// 原文と訳文を並べたPDF（呼び出し側では使わない）
    pub dual: Option<Vec<u8>>,
}

/// PDFのバイト列を翻訳するエンジン
///
/// 1ファイルにつき1回だけ呼ばれ、リトライはしない。
pub trait TranslationBackend: Send + Sync {
    fn translate(
        &self,
        pdf: Vec<u8>,
        options: &TranslationOptions,
    ) -> impl Future<Output = Result<TranslatedDocument, BackendError>> + Send;
}

/// 設定で選択されたエンジン
#[derive(Debug)]
pub enum AnyBackend {
    Process(Pdf2zhProcess),
    Server(Pdf2zhServer),
}

impl AnyBackend {
    pub fn from_settings(settings: &Settings) -> Result<Self, BackendError> {
        Self::build(&settings.backend, &settings.proxy)
    }

    pub fn build(backend: &BackendSettings, proxy: &ProxyConfig) -> Result<Self, BackendError> {
        Ok(match backend {
            BackendSettings::Process { program } => {
                AnyBackend::Process(Pdf2zhProcess::new(program.clone(), proxy.clone()))
            }
            BackendSettings::Server {
                base_url,
                poll_interval,
            } => AnyBackend::Server(Pdf2zhServer::new(base_url.clone(), *poll_interval, proxy)?),
        })
    }
}

impl TranslationBackend for AnyBackend {
    async fn translate(
        &self,
        pdf: Vec<u8>,
        options: &TranslationOptions,
    ) -> Result<TranslatedDocument, BackendError> {
        match self {
            AnyBackend::Process(backend) => backend.translate(pdf, options).await,
            AnyBackend::Server(backend) => backend.translate(pdf, options).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn builds_backend_from_settings() {
        let process = AnyBackend::build(
            &BackendSettings::Process {
                program: PathBuf::from("pdf2zh"),
            },
            &ProxyConfig::none(),
        )
        .unwrap();
        assert!(matches!(process, AnyBackend::Process(_)));

        let server = AnyBackend::build(
            &BackendSettings::Server {
                base_url: "http://127.0.0.1:11008".parse().unwrap(),
                poll_interval: Duration::from_millis(10),
            },
            &ProxyConfig::none(),
        )
        .unwrap();
        assert!(matches!(server, AnyBackend::Server(_)));
    }
}
