//! ネットワーク疎通確認

use crate::config::ProxyConfig;
use anyhow::{Context, Result};
use reqwest::Url;
use std::time::Duration;
use tracing::{info, warn};

const CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// 設定されたプロキシ経由で1回だけ接続を確認する
pub async fn check_network(url: &Url, proxy: &ProxyConfig) -> Result<()> {
    let client = proxy
        .apply(reqwest::Client::builder().no_proxy().timeout(CHECK_TIMEOUT))
        .context("プロキシ設定が不正です")?
        .build()
        .context("HTTPクライアントの作成に失敗")?;

    match client.get(url.clone()).send().await {
        Ok(response) => {
            info!(
                "ネットワーク接続を確認しました: {} ({}){}",
                url,
                response.status(),
                if proxy.is_enabled() { " [プロキシ経由]" } else { "" }
            );
            Ok(())
        }
        Err(e) => {
            warn!("接続確認に失敗: {}", e);
            Err(e).with_context(|| format!("ネットワークに接続できません: {}", url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_fails() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url: Url = format!("http://{}/", addr).parse().unwrap();
        assert!(check_network(&url, &ProxyConfig::none()).await.is_err());
    }

    #[tokio::test]
    async fn reachable_host_succeeds_regardless_of_status() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // ルート未定義なので 404 だが、接続自体はできている
        let url: Url = format!("http://{}/", addr).parse().unwrap();
        check_network(&url, &ProxyConfig::none()).await.unwrap();
    }
}
