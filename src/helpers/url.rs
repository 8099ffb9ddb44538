//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::PathBuf;

use crate::config::SiteConfig;

/// Characters kept as-is in a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the base path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/repo/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.base_path.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/content/articles/") // -> "https://example.com/repo/content/articles/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// URL of the article listing
pub fn listing_url(config: &SiteConfig) -> String {
    url_for(config, &format!("{}/", config.articles_route.trim_matches('/')))
}

/// URL of one article page
pub fn article_url(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &article_path(config, slug))
}

/// Absolute URL of one article page, including the site domain
pub fn article_permalink(config: &SiteConfig, slug: &str) -> String {
    full_url_for(config, &article_path(config, slug))
}

fn article_path(config: &SiteConfig, slug: &str) -> String {
    let route = config.articles_route.trim_matches('/');
    let segment = encode_segment(slug);
    let page = if config.trailing_slash {
        format!("{}/", segment)
    } else {
        format!("{}.html", segment)
    };

    if route.is_empty() {
        page
    } else {
        format!("{}/{}", route, page)
    }
}

/// Output file of the listing, relative to the public directory
pub fn listing_output_path(config: &SiteConfig) -> PathBuf {
    route_dir(config).join("index.html")
}

/// Output file of one article, relative to the public directory
pub fn article_output_path(config: &SiteConfig, slug: &str) -> PathBuf {
    if config.trailing_slash {
        route_dir(config).join(slug).join("index.html")
    } else {
        route_dir(config).join(format!("{}.html", slug))
    }
}

fn route_dir(config: &SiteConfig) -> PathBuf {
    config
        .articles_route
        .split('/')
        .filter(|part| !part.is_empty())
        .collect()
}

/// Percent-encode one URL path segment
fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            base_path: "/repo".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/repo/css/style.css");
        assert_eq!(url_for(&config, ""), "/repo/");
        assert_eq!(url_for(&SiteConfig::default(), "about/"), "/about/");
    }

    #[test]
    fn test_full_url_for() {
        assert_eq!(
            full_url_for(&test_config(), "/content/articles/"),
            "https://example.com/repo/content/articles/"
        );
    }

    #[test]
    fn test_article_urls() {
        let mut config = test_config();
        assert_eq!(listing_url(&config), "/repo/content/articles/");
        assert_eq!(
            article_url(&config, "hello world"),
            "/repo/content/articles/hello%20world/"
        );

        config.trailing_slash = false;
        assert_eq!(
            article_url(&config, "v1.2"),
            "/repo/content/articles/v1.2.html"
        );
    }

    #[test]
    fn test_article_permalink() {
        let mut config = test_config();
        assert_eq!(
            article_permalink(&config, "post"),
            "https://example.com/repo/content/articles/post/"
        );

        config.articles_route = String::new();
        config.trailing_slash = false;
        assert_eq!(
            article_permalink(&config, "post"),
            "https://example.com/repo/post.html"
        );
        assert_eq!(article_url(&config, "post"), "/repo/post.html");
    }

    #[test]
    fn test_output_paths() {
        let mut config = SiteConfig::default();
        assert_eq!(
            article_output_path(&config, "post"),
            Path::new("content/articles/post/index.html")
        );
        assert_eq!(
            listing_output_path(&config),
            Path::new("content/articles/index.html")
        );

        config.trailing_slash = false;
        assert_eq!(
            article_output_path(&config, "post"),
            Path::new("content/articles/post.html")
        );
    }
}
