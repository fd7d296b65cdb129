use crate::error::Result;
use crate::models::WideTable;
use crate::readers::HtmlTableReader;
use crate::settings::Settings;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([A-Za-z0-9_:.-]+)"#).unwrap()
});

/// Downloads the station table page.
pub struct SnapshotFetcher {
    client: Client,
    url: String,
}

impl SnapshotFetcher {
    pub fn new(url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.source_url,
            &settings.user_agent,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the page as text. Any transport error or non-2xx status fails.
    pub async fn fetch_html(&self) -> Result<String> {
        info!("Fetching {}", self.url);
        let response = self.client.get(&self.url).send().await?.error_for_status()?;

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_from_content_type);

        let bytes = response.bytes().await?;
        debug!("Received {} bytes", bytes.len());

        Ok(decode_html(&bytes, declared.as_deref()))
    }

    pub async fn fetch_table(&self) -> Result<WideTable> {
        let html = self.fetch_html().await?;
        HtmlTableReader::new().read_str(&html)
    }
}

/// Read a saved page from disk, honouring its declared charset
pub fn read_html_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_html(&bytes, None))
}

fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}

/// Decode page bytes: BOM first, then the declared charset, then a
/// `<meta charset>` in the head, then UTF-8.
pub fn decode_html(bytes: &[u8], declared: Option<&str>) -> String {
    let sniffed = || {
        let head = &bytes[..bytes.len().min(2048)];
        let head = String::from_utf8_lossy(head);
        META_CHARSET
            .captures(&head)
            .and_then(|c| Encoding::for_label(c[1].as_bytes()))
    };

    let encoding = declared
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(sniffed)
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("Page contained bytes invalid for {}", used.name());
    }
    text.into_owned()
}
