//! Flight document loading from disk or over HTTP.

use anyhow::{Context, Result};

/// Fetch the document at `location`: an `http(s)://` URL or a file path.
pub async fn fetch_document(location: &str) -> Result<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let body = reqwest::get(location)
            .await
            .with_context(|| format!("failed to fetch {}", location))?
            .error_for_status()?
            .text()
            .await?;
        return Ok(body);
    }

    tokio::fs::read_to_string(location)
        .await
        .with_context(|| format!("failed to read {}", location))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_document_from_disk() {
        let path =
            std::env::temp_dir().join(format!("flightarc-source-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{"flights": []}"#).await.unwrap();

        let body = fetch_document(path.to_str().unwrap()).await.unwrap();
        assert_eq!(body, r#"{"flights": []}"#);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let err = fetch_document("/nonexistent/flightarc/flights.json")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
