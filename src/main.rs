//! PDF一括翻訳ツール - メインエントリポイント

use anyhow::{Context, Result};
use clap::Parser;
use pdf_batch_translator::cli::{self, Args};
use pdf_batch_translator::{Settings, gui, network};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // 環境変数の読み込み（RUST_LOG も .env から指定できるよう先に読む）
    dotenvy::dotenv().ok();

    // ロギング初期化
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let settings = Settings::from_env().context("設定の読み込みに失敗")?;

    // ネットワーク確認（失敗時は終了コード1）
    if !args.skip_network_check {
        tokio::runtime::Runtime::new()
            .context("Tokioランタイムの作成に失敗")?
            .block_on(network::check_network(&settings.check_url, &settings.proxy))
            .context("ネットワーク接続を確認してください")?;
    }

    if args.is_batch() {
        cli::run(&args, &settings)
    } else {
        // GUIアプリケーション起動
        gui::run(settings)
    }
}
