use anyhow::Context;

pub async fn handle(base_url: &str) -> anyhow::Result<()> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));

    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("failed to reach {url}"))?;

    let status = response.status();
    let body: serde_json::Value = response.json().await.unwrap_or_default();

    println!("{status}");
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
