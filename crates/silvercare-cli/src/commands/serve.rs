use anyhow::{Context, Result};
use std::sync::Arc;

use silvercare_core::config::AppConfig;
use silvercare_interaction::ChatProxy;

pub async fn run(config: &AppConfig, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.proxy.bind.clone());
    let proxy = ChatProxy::from_config(&config.proxy);
    if !proxy.is_configured() {
        eprintln!("경고: Claude API 키가 없습니다. CLAUDE_API_KEY를 설정하세요.");
    }

    println!("Chat API listening on http://{}/api/chat (Ctrl-C to stop)", bind);
    silvercare_interaction::serve(&bind, Arc::new(proxy))
        .await
        .context("Chat proxy server failed")
}
