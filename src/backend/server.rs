//! pdf2zh タスクサーバー クライアント

use super::{TranslatedDocument, TranslationBackend};
use crate::config::ProxyConfig;
use crate::error::BackendError;
use crate::job::TranslationOptions;
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// pdf2zh サーバーへHTTPで翻訳を依頼するエンジン
#[derive(Debug, Clone)]
pub struct Pdf2zhServer {
    base_url: String,
    poll_interval: Duration,
    http_client: reqwest::Client,
}

impl Pdf2zhServer {
    /// 新しいクライアントを作成（システムのプロキシ設定は使わない）
    pub fn new(base_url: Url, poll_interval: Duration, proxy: &ProxyConfig) -> Result<Self, BackendError> {
        let builder = proxy.apply(reqwest::Client::builder().no_proxy())?;
        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            poll_interval,
            http_client: builder.build()?,
        })
    }

    fn tasks_url(&self) -> String {
        format!("{}/v1/translate", self.base_url)
    }

    fn task_url(&self, id: &str) -> String {
        format!("{}/v1/translate/{}", self.base_url, id)
    }

    /// タスクを登録
    async fn submit(&self, pdf: Vec<u8>, options: &TranslationOptions) -> Result<String, BackendError> {
        let data = TaskArgs {
            lang_in: options.lang_in.code(),
            lang_out: options.lang_out.code(),
            service: options.service.id(),
            thread: options.threads,
        };
        let data = serde_json::to_string(&data)
            .map_err(|e| BackendError::Io(std::io::Error::other(e)))?;

        let form = Form::new()
            .part(
                "file",
                Part::bytes(pdf)
                    .file_name("input.pdf")
                    .mime_str("application/pdf")?,
            )
            .text("data", data);

        let created: CreatedTask = self
            .http_client
            .post(self.tasks_url())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(created.id)
    }

    /// 完了するまで状態を確認
    async fn wait(&self, id: &str) -> Result<(), BackendError> {
        loop {
            let status: TaskStatus = self
                .http_client
                .get(self.task_url(id))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match status.state.as_str() {
                "SUCCESS" => return Ok(()),
                "FAILURE" | "REVOKED" => {
                    return Err(BackendError::TaskFailed { state: status.state });
                }
                _ => {
                    if let Some(info) = status.info {
                        debug!("タスク {} 進捗: {}", id, info);
                    }
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    async fn download(&self, id: &str, format: &str) -> Result<Vec<u8>, BackendError> {
        let bytes = self
            .http_client
            .get(format!("{}/{}", self.task_url(id), format))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

impl TranslationBackend for Pdf2zhServer {
    async fn translate(
        &self,
        pdf: Vec<u8>,
        options: &TranslationOptions,
    ) -> Result<TranslatedDocument, BackendError> {
        let id = self.submit(pdf, options).await?;
        debug!("翻訳タスクを登録: {}", id);

        self.wait(&id).await?;

        let mono = self.download(&id, "mono").await?;
        let dual = match self.download(&id, "dual").await {
            Ok(dual) => Some(dual),
            Err(e) => {
                debug!("対訳PDFの取得に失敗: {}", e);
                None
            }
        };

        Ok(TranslatedDocument { mono, dual })
    }
}

// pdf2zh サーバー リクエスト/レスポンス構造体

#[derive(Serialize)]
struct TaskArgs<'a> {
    lang_in: &'a str,
    lang_out: &'a str,
    service: &'a str,
    thread: usize,
}

#[derive(Deserialize)]
struct CreatedTask {
    id: String,
}

#[derive(Deserialize)]
struct TaskStatus {
    state: String,
    #[serde(default)]
    info: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Language, Service};
    use axum::Router;
    use axum::body::Bytes;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeServer {
        polls: AtomicUsize,
        /// SUCCESS を返すまでに PROGRESS を返す回数
        progress_polls: usize,
        final_state: &'static str,
        submitted: Mutex<Option<(String, Vec<u8>)>>,
    }

    async fn create(State(server): State<Arc<FakeServer>>, headers: HeaderMap, body: Bytes) -> axum::Json<Value> {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        *server.submitted.lock().unwrap() = Some((content_type, body.to_vec()));
        axum::Json(json!({ "id": "task-1" }))
    }

    async fn status(State(server): State<Arc<FakeServer>>, Path(id): Path<String>) -> axum::Json<Value> {
        assert_eq!(id, "task-1");
        let n = server.polls.fetch_add(1, Ordering::SeqCst);
        if n < server.progress_polls {
            axum::Json(json!({ "state": "PROGRESS", "info": { "n": n, "total": 10 } }))
        } else {
            axum::Json(json!({ "state": server.final_state }))
        }
    }

    async fn result(Path((_id, format)): Path<(String, String)>) -> Result<Vec<u8>, StatusCode> {
        match format.as_str() {
            "mono" => Ok(b"translated".to_vec()),
            _ => Err(StatusCode::NOT_FOUND),
        }
    }

    async fn spawn(server: Arc<FakeServer>) -> Url {
        let app = Router::new()
            .route("/v1/translate", post(create))
            .route("/v1/translate/:id", get(status))
            .route("/v1/translate/:id/:format", get(result))
            .with_state(server);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr).parse().unwrap()
    }

    fn options() -> TranslationOptions {
        TranslationOptions::new(Language::English, Language::Chinese, Service::Bing, 3).unwrap()
    }

    #[tokio::test]
    async fn submits_polls_and_downloads_mono() {
        let server = Arc::new(FakeServer {
            progress_polls: 2,
            final_state: "SUCCESS",
            ..Default::default()
        });
        let url = spawn(server.clone()).await;
        let backend = Pdf2zhServer::new(url, Duration::from_millis(5), &ProxyConfig::none()).unwrap();

        let doc = backend.translate(b"%PDF-1.7".to_vec(), &options()).await.unwrap();
        assert_eq!(doc.mono, b"translated");
        // dual は取得できなくても失敗にしない
        assert_eq!(doc.dual, None);
        assert_eq!(server.polls.load(Ordering::SeqCst), 3);

        let (content_type, body) = server.submitted.lock().unwrap().clone().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("%PDF-1.7"));
        assert!(body.contains(r#""lang_in":"en""#));
        assert!(body.contains(r#""lang_out":"zh""#));
        assert!(body.contains(r#""service":"bing""#));
        assert!(body.contains(r#""thread":3"#));
    }

    #[tokio::test]
    async fn failed_task_is_backend_error() {
        let server = Arc::new(FakeServer {
            progress_polls: 0,
            final_state: "FAILURE",
            ..Default::default()
        });
        let url = spawn(server).await;
        let backend = Pdf2zhServer::new(url, Duration::from_millis(5), &ProxyConfig::none()).unwrap();

        let err = backend.translate(b"%PDF".to_vec(), &options()).await.unwrap_err();
        assert!(matches!(err, BackendError::TaskFailed { ref state } if state == "FAILURE"));
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        // 一度バインドして解放したポートに接続する
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url: Url = format!("http://{}", addr).parse().unwrap();
        let backend = Pdf2zhServer::new(url, Duration::from_millis(5), &ProxyConfig::none()).unwrap();
        let err = backend.translate(b"%PDF".to_vec(), &options()).await.unwrap_err();
        assert!(matches!(err, BackendError::Http(_)));
    }
}
