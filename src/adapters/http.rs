use crate::utils::error::Result;
use reqwest::{redirect, Client};
use std::time::Duration;

/// 所有外部呼叫共用的 client 建構方式：固定 User-Agent 與逾時
pub fn build_client(user_agent: &str, timeout_seconds: u64, max_redirects: usize) -> Result<Client> {
    let policy = if max_redirects == 0 {
        redirect::Policy::none()
    } else {
        redirect::Policy::limited(max_redirects)
    };

    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_seconds))
        .redirect(policy)
        .build()?;
    Ok(client)
}
