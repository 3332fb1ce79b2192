//! 来源拉取服务 - 业务能力层
//!
//! 只负责"把 URL 变成文本"，不关心题目

use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};
use url::{Host, Url};

use crate::error::EngineError;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)>")
        .expect("script regex is valid")
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex is valid"));
static META_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\s+(?:name|property)="(?:og:)?description"\s+content="([^"]*)""#)
        .expect("meta regex is valid")
});

/// 网页标题和简介
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PageMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// 拼成提示词中的一段说明
    pub fn to_context(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut lines = Vec::new();
        if let Some(title) = &self.title {
            lines.push(format!("Title: {}", title));
        }
        if let Some(description) = &self.description {
            lines.push(format!("Description: {}", description));
        }
        Some(lines.join("\n"))
    }
}

/// 来源拉取服务
#[derive(Clone)]
pub struct SourceFetcher {
    http: reqwest::Client,
    max_chars: usize,
}

impl SourceFetcher {
    /// 创建新的拉取服务
    ///
    /// # 参数
    /// - `timeout`: 单次请求超时
    /// - `max_chars`: 正文最多保留的字符数
    pub fn new(timeout: Duration, max_chars: usize) -> Result<Self, EngineError> {
        // 重定向到内网字面地址时中止
        let redirect = reqwest::redirect::Policy::custom(|attempt| {
            if attempt.previous().len() >= 5 {
                attempt.error("too many redirects")
            } else if is_literal_non_public(attempt.url()) {
                attempt.error("redirect to a non-public address")
            } else {
                attempt.follow()
            }
        });
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(redirect)
            .user_agent(concat!("question-studio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EngineError::malformed_source(e.to_string()))?;
        Ok(Self { http, max_chars })
    }

    async fn fetch_html(&self, url: &Url) -> Result<String, EngineError> {
        ensure_public(url).await?;
        debug!("🌐 拉取来源: {}", url);
        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::malformed_source(format!("timed out fetching {}", url))
            } else {
                EngineError::malformed_source(format!("could not fetch {}: {}", url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::malformed_source(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| EngineError::malformed_source(format!("unreadable body from {}: {}", url, e)))
    }

    /// 拉取网页并转成纯文本
    ///
    /// # 返回
    /// 返回截断后的正文；正文为空时返回错误
    pub async fn fetch_text(&self, url: &Url) -> Result<String, EngineError> {
        let html = self.fetch_html(url).await?;
        let text = html_to_text(&html);
        if text.is_empty() {
            return Err(EngineError::malformed_source(format!(
                "{} has no readable text",
                url
            )));
        }

        let text: String = text.chars().take(self.max_chars).collect();
        debug!("来源正文 {} 字符", text.chars().count());
        Ok(text)
    }

    /// 拉取网页的标题和简介
    pub async fn fetch_metadata(&self, url: &Url) -> Result<PageMetadata, EngineError> {
        let html = self.fetch_html(url).await?;
        Ok(extract_metadata(&html))
    }
}

/// 只允许拉取公网地址：域名解析出的每个地址都必须是公网地址
pub async fn ensure_public(url: &Url) -> Result<(), EngineError> {
    let rejected = || {
        warn!("⚠️ 拒绝拉取非公网地址: {}", url);
        EngineError::malformed_source(format!("{} points to a non-public address", url))
    };

    let addrs: Vec<IpAddr> = match url.host() {
        None => return Err(rejected()),
        Some(Host::Ipv4(ip)) => vec![IpAddr::V4(ip)],
        Some(Host::Ipv6(ip)) => vec![IpAddr::V6(ip)],
        Some(Host::Domain(domain)) => {
            if is_local_name(domain) {
                return Err(rejected());
            }
            let port = url.port_or_known_default().unwrap_or(80);
            tokio::net::lookup_host((domain, port))
                .await
                .map_err(|e| {
                    EngineError::malformed_source(format!("could not resolve {}: {}", domain, e))
                })?
                .map(|addr| addr.ip())
                .collect()
        }
    };

    if addrs.is_empty() || !addrs.iter().all(is_public_ip) {
        return Err(rejected());
    }
    Ok(())
}

fn is_local_name(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    domain == "localhost" || domain.ends_with(".localhost")
}

fn is_literal_non_public(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(ip)) => !is_public_ip(&IpAddr::V4(ip)),
        Some(Host::Ipv6(ip)) => !is_public_ip(&IpAddr::V6(ip)),
        Some(Host::Domain(domain)) => is_local_name(domain),
        None => true,
    }
}

/// 回环、私有、链路本地、CGNAT 等地址都不算公网
pub fn is_public_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || a == 0
                || (a == 100 && (b & 0xc0) == 64))
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public_ip(&IpAddr::V4(v4));
            }
            let first = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80)
        }
    }
}

/// 去掉脚本、样式和标签，合并空白
pub fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_OR_STYLE.replace_all(html, " ");
    let without_tags = TAG.replace_all(&without_scripts, " ");
    let decoded = decode_entities(&without_tags);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// 提取 `<title>` 和 description meta
pub fn extract_metadata(html: &str) -> PageMetadata {
    let clean = |s: &str| {
        let text = WHITESPACE
            .replace_all(&decode_entities(s), " ")
            .trim()
            .to_string();
        (!text.is_empty()).then_some(text)
    };

    PageMetadata {
        title: TITLE
            .captures(html)
            .and_then(|c| c.get(1))
            .and_then(|m| clean(m.as_str())),
        description: META_DESCRIPTION
            .captures(html)
            .and_then(|c| c.get(1))
            .and_then(|m| clean(m.as_str())),
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
