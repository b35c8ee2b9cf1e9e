//! 設定モジュール - 環境変数（.env 対応）から起動時の設定を読み込む

mod language;

pub use language::{Language, Service};

use crate::error::{Result, TranslatorError};
use regex::Regex;
use reqwest::Url;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

const ENV_PROXY_ENABLE: &str = "PDF_TRANSLATOR_PROXY_ENABLE";
const ENV_HTTP_PROXY: &str = "PDF_TRANSLATOR_HTTP_PROXY";
const ENV_HTTPS_PROXY: &str = "PDF_TRANSLATOR_HTTPS_PROXY";
const ENV_SERVICE: &str = "PDF_TRANSLATOR_SERVICE";
const ENV_THREADS: &str = "PDF_TRANSLATOR_THREADS";
const ENV_WINDOW_SIZE: &str = "PDF_TRANSLATOR_WINDOW_SIZE";
const ENV_BACKEND: &str = "PDF_TRANSLATOR_BACKEND";
const ENV_PDF2ZH: &str = "PDF_TRANSLATOR_PDF2ZH";
const ENV_SERVER_URL: &str = "PDF_TRANSLATOR_SERVER_URL";
const ENV_POLL_MS: &str = "PDF_TRANSLATOR_POLL_MS";
const ENV_CHECK_URL: &str = "PDF_TRANSLATOR_CHECK_URL";

const DEFAULT_THREADS: usize = 4;
const DEFAULT_WINDOW_SIZE: WindowSize = WindowSize {
    width: 600.0,
    height: 500.0,
};
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:11008";
const DEFAULT_CHECK_URL: &str = "https://huggingface.co";
const DEFAULT_POLL_MS: u64 = 1000;

static WINDOW_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{2,5})\s*[xX×]\s*(\d{2,5})\s*$").unwrap());

/// プロキシ設定（未設定なら直接接続）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    pub http: Option<Url>,
    pub https: Option<Url>,
}

impl ProxyConfig {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.http.is_some() || self.https.is_some()
    }

    /// 子プロセスに渡す環境変数の組
    pub fn env_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref http) = self.http {
            pairs.push(("HTTP_PROXY", http.to_string()));
            pairs.push(("http_proxy", http.to_string()));
        }
        if let Some(ref https) = self.https {
            pairs.push(("HTTPS_PROXY", https.to_string()));
            pairs.push(("https_proxy", https.to_string()));
        }
        pairs
    }

    /// reqwest クライアントにプロキシを設定
    pub fn apply(
        &self,
        mut builder: reqwest::ClientBuilder,
    ) -> std::result::Result<reqwest::ClientBuilder, reqwest::Error> {
        if let Some(ref http) = self.http {
            builder = builder.proxy(reqwest::Proxy::http(http.as_str())?);
        }
        if let Some(ref https) = self.https {
            builder = builder.proxy(reqwest::Proxy::https(https.as_str())?);
        }
        Ok(builder)
    }
}

/// 使用する翻訳エンジンの種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSettings {
    /// pdf2zh 実行ファイルを起動
    Process { program: PathBuf },
    /// pdf2zh のタスクサーバーへ送信
    Server { base_url: Url, poll_interval: Duration },
}

/// ウィンドウサイズ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
}

impl WindowSize {
    /// "600x500" 形式を解析
    pub fn parse(text: &str) -> Result<Self> {
        let caps = WINDOW_SIZE_RE
            .captures(text)
            .ok_or_else(|| TranslatorError::Config(format!("ウィンドウサイズの形式が不正です: {}", text)))?;
        let width: f32 = caps[1]
            .parse()
            .map_err(|_| TranslatorError::Config(format!("幅が不正です: {}", text)))?;
        let height: f32 = caps[2]
            .parse()
            .map_err(|_| TranslatorError::Config(format!("高さが不正です: {}", text)))?;
        Ok(Self { width, height })
    }
}

/// 起動時設定
#[derive(Debug, Clone)]
pub struct Settings {
    pub proxy: ProxyConfig,
    pub default_service: Service,
    pub default_threads: usize,
    pub window_size: WindowSize,
    pub backend: BackendSettings,
    pub check_url: Url,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            proxy: ProxyConfig::none(),
            default_service: Service::Google,
            default_threads: DEFAULT_THREADS,
            window_size: DEFAULT_WINDOW_SIZE,
            backend: BackendSettings::Process {
                program: PathBuf::from("pdf2zh"),
            },
            check_url: Url::parse(DEFAULT_CHECK_URL).expect("既定のURLは有効"),
        }
    }
}

impl Settings {
    /// プロセス環境変数から読み込む
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Settings::default();

        // プロキシ
        let proxy_enabled = match get(ENV_PROXY_ENABLE) {
            Some(v) => parse_bool(ENV_PROXY_ENABLE, &v)?,
            None => false,
        };
        let proxy = if proxy_enabled {
            let http = get(ENV_HTTP_PROXY)
                .map(|v| parse_url(ENV_HTTP_PROXY, &v))
                .transpose()?;
            let https = match get(ENV_HTTPS_PROXY) {
                Some(v) => Some(parse_url(ENV_HTTPS_PROXY, &v)?),
                None => http.clone(),
            };
            let proxy = ProxyConfig { http, https };
            if !proxy.is_enabled() {
                return Err(TranslatorError::Config(format!(
                    "{} が有効ですが {} / {} が設定されていません",
                    ENV_PROXY_ENABLE, ENV_HTTP_PROXY, ENV_HTTPS_PROXY
                )));
            }
            proxy
        } else {
            ProxyConfig::none()
        };

        let default_service = match get(ENV_SERVICE) {
            Some(v) => v.parse()?,
            None => defaults.default_service,
        };

        let default_threads = match get(ENV_THREADS) {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(TranslatorError::Config(format!(
                        "{} は1以上の整数で指定してください: {}",
                        ENV_THREADS, v
                    )));
                }
            },
            None => defaults.default_threads,
        };

        let window_size = match get(ENV_WINDOW_SIZE) {
            Some(v) => WindowSize::parse(&v)?,
            None => defaults.window_size,
        };

        let backend_kind = get(ENV_BACKEND).map(|v| v.to_ascii_lowercase());
        let backend = match backend_kind.as_deref() {
            None | Some("process") => BackendSettings::Process {
                program: get(ENV_PDF2ZH)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("pdf2zh")),
            },
            Some("server") => {
                let base_url = parse_url(
                    ENV_SERVER_URL,
                    &get(ENV_SERVER_URL).unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
                )?;
                let poll_ms = match get(ENV_POLL_MS) {
                    Some(v) => match v.parse::<u64>() {
                        Ok(n) if n > 0 => n,
                        _ => {
                            return Err(TranslatorError::Config(format!(
                                "{} は1以上の整数で指定してください: {}",
                                ENV_POLL_MS, v
                            )));
                        }
                    },
                    None => DEFAULT_POLL_MS,
                };
                BackendSettings::Server {
                    base_url,
                    poll_interval: Duration::from_millis(poll_ms),
                }
            }
            Some(other) => {
                return Err(TranslatorError::Config(format!(
                    "{} は process か server を指定してください: {}",
                    ENV_BACKEND, other
                )));
            }
        };

        let check_url = match get(ENV_CHECK_URL) {
            Some(v) => parse_url(ENV_CHECK_URL, &v)?,
            None => defaults.check_url,
        };

        Ok(Self {
            proxy,
            default_service,
            default_threads,
            window_size,
            backend,
            check_url,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(TranslatorError::Config(format!(
            "{} は true/false で指定してください: {}",
            key, value
        ))),
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| TranslatorError::Config(format!("{} のURLが不正です ({}): {}", key, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = settings_from(&[]).unwrap();
        assert!(!settings.proxy.is_enabled());
        assert_eq!(settings.default_service, Service::Google);
        assert_eq!(settings.default_threads, 4);
        assert_eq!(settings.window_size, WindowSize { width: 600.0, height: 500.0 });
        assert_eq!(
            settings.backend,
            BackendSettings::Process {
                program: PathBuf::from("pdf2zh")
            }
        );
        assert_eq!(settings.check_url.as_str(), "https://huggingface.co/");
    }

    #[test]
    fn enabled_proxy_without_url_is_rejected() {
        let err = settings_from(&[(ENV_PROXY_ENABLE, "true")]).unwrap_err();
        assert!(matches!(err, TranslatorError::Config(_)));
    }

    #[test]
    fn https_proxy_falls_back_to_http_proxy() {
        let settings = settings_from(&[
            (ENV_PROXY_ENABLE, "yes"),
            (ENV_HTTP_PROXY, "http://127.0.0.1:7890"),
        ])
        .unwrap();
        assert_eq!(settings.proxy.http, settings.proxy.https);
        let keys: Vec<_> = settings.proxy.env_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy"]);
    }

    #[test]
    fn proxy_urls_are_ignored_when_disabled() {
        let settings = settings_from(&[
            (ENV_PROXY_ENABLE, "false"),
            (ENV_HTTP_PROXY, "http://127.0.0.1:7890"),
        ])
        .unwrap();
        assert!(!settings.proxy.is_enabled());
        assert!(settings.proxy.env_pairs().is_empty());
    }

    #[test]
    fn server_backend_is_configurable() {
        let settings = settings_from(&[
            (ENV_BACKEND, "Server"),
            (ENV_SERVER_URL, "http://localhost:9000"),
            (ENV_POLL_MS, "250"),
        ])
        .unwrap();
        match settings.backend {
            BackendSettings::Server {
                base_url,
                poll_interval,
            } => {
                assert_eq!(base_url.as_str(), "http://localhost:9000/");
                assert_eq!(poll_interval, Duration::from_millis(250));
            }
            other => panic!("unexpected backend: {:?}", other),
        }
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for pairs in [
            vec![(ENV_THREADS, "0")],
            vec![(ENV_THREADS, "many")],
            vec![(ENV_SERVICE, "babelfish")],
            vec![(ENV_WINDOW_SIZE, "big")],
            vec![(ENV_BACKEND, "cloud")],
            vec![(ENV_PROXY_ENABLE, "maybe")],
        ] {
            let err = settings_from(&pairs).unwrap_err();
            assert!(matches!(err, TranslatorError::Config(_)), "{:?}", pairs);
        }
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        for poll in ["0", "-5", "soon"] {
            let err = settings_from(&[(ENV_BACKEND, "server"), (ENV_POLL_MS, poll)]).unwrap_err();
            assert!(matches!(err, TranslatorError::Config(ref m) if m.contains(ENV_POLL_MS)), "{}", poll);
        }
    }

    #[test]
    fn window_size_accepts_common_spellings() {
        assert_eq!(
            WindowSize::parse("800x600").unwrap(),
            WindowSize { width: 800.0, height: 600.0 }
        );
        assert_eq!(
            WindowSize::parse(" 1024 X 768 ").unwrap(),
            WindowSize { width: 1024.0, height: 768.0 }
        );
    }
}
