use fh_core::config::{AmazonConfig, RakutenConfig};
use fh_core::{AffiliateLink, Error, Platform, Result};
use url::Url;

fn parse_base(base: &str, platform: Platform) -> Result<Url> {
    Url::parse(base).map_err(|e| Error::Config(format!("invalid {} base url {:?}: {}", platform, base, e)))
}

/// Marketplace search URL carrying the associate tag.
pub fn amazon_search_url(query: &str, config: &AmazonConfig) -> Result<String> {
    let mut url = parse_base(&config.search_base_url, Platform::Amazon)?;
    url.query_pairs_mut()
        .append_pair("k", query)
        .append_pair("tag", &config.tag)
        .append_pair("linkCode", "ll2");
    Ok(url.into())
}

/// Product page URL for a fixed product id.
pub fn amazon_product_url(product_id: &str, config: &AmazonConfig) -> Result<String> {
    let mut url = parse_base(&config.product_base_url, Platform::Amazon)?
        .join(product_id)
        .map_err(|e| Error::Config(format!("invalid product id {:?}: {}", product_id, e)))?;
    url.query_pairs_mut().append_pair("tag", &config.tag);
    Ok(url.into())
}

/// Search URL wrapped in the affiliate redirect so the click is attributed.
pub fn rakuten_search_url(query: &str, config: &RakutenConfig) -> Result<String> {
    let mut search = parse_base(&config.search_base_url, Platform::Rakuten)?;
    search
        .path_segments_mut()
        .map_err(|_| Error::Config(format!("rakuten search url cannot take a path: {}", config.search_base_url)))?
        .pop_if_empty()
        .push(query)
        .push("");
    search.set_query(Some("f=1&grp=product"));

    let mut redirect = parse_base(&config.redirect_base_url, Platform::Rakuten)?
        .join(&format!("{}/", config.affiliate_id))
        .map_err(|e| Error::Config(format!("invalid rakuten affiliate id {:?}: {}", config.affiliate_id, e)))?;
    redirect.query_pairs_mut().append_pair("pc", search.as_str());
    Ok(redirect.into())
}

pub fn search_link(
    platform: Platform,
    query: &str,
    display_text: impl Into<String>,
    amazon: &AmazonConfig,
    rakuten: &RakutenConfig,
) -> Result<AffiliateLink> {
    let url = match platform {
        Platform::Amazon => amazon_search_url(query, amazon)?,
        Platform::Rakuten => rakuten_search_url(query, rakuten)?,
    };
    Ok(AffiliateLink {
        platform,
        url,
        display_text: display_text.into(),
        keyword: Some(query.to_string()),
        product_id: None,
        price: None,
        image_url: None,
        rating: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_value(url: &str, key: &str) -> Option<String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_amazon_search_url() {
        let url = amazon_search_url("iPhone ケース", &AmazonConfig::default()).unwrap();
        assert!(url.starts_with("https://www.amazon.co.jp/s?k=iPhone+"));
        assert_eq!(query_value(&url, "k").as_deref(), Some("iPhone ケース"));
        assert_eq!(query_value(&url, "tag").as_deref(), Some("your-amazon-tag-20"));
        assert_eq!(query_value(&url, "linkCode").as_deref(), Some("ll2"));
    }

    #[test]
    fn test_amazon_product_url() {
        let url = amazon_product_url("B0EXAMPLE1", &AmazonConfig::default()).unwrap();
        assert_eq!(url, "https://www.amazon.co.jp/dp/B0EXAMPLE1?tag=your-amazon-tag-20");
    }

    #[test]
    fn test_rakuten_url_is_wrapped_in_redirect() {
        let url = rakuten_search_url("スマホ アクセサリー", &RakutenConfig::default()).unwrap();
        let parsed = Url::parse(&url).unwrap();
        assert_eq!(parsed.host_str(), Some("hb.afl.rakuten.co.jp"));
        assert_eq!(parsed.path(), "/hgc/your-rakuten-id/");

        let target = query_value(&url, "pc").unwrap();
        let target = Url::parse(&target).unwrap();
        assert_eq!(target.host_str(), Some("search.rakuten.co.jp"));
        assert!(target.path().starts_with("/search/mall/"));
        assert!(target.path().ends_with('/'));
        assert_eq!(target.query(), Some("f=1&grp=product"));
    }

    #[test]
    fn test_invalid_base_is_a_config_error() {
        let config = AmazonConfig {
            search_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(amazon_search_url("x", &config), Err(Error::Config(_))));
    }

    #[test]
    fn test_search_link_carries_platform_and_query() {
        let link = search_link(
            Platform::Rakuten,
            "PC ゲーム",
            "🛒 PC ゲーム",
            &AmazonConfig::default(),
            &RakutenConfig::default(),
        )
        .unwrap();
        assert_eq!(link.platform, Platform::Rakuten);
        assert_eq!(link.keyword.as_deref(), Some("PC ゲーム"));
        assert!(!link.url.is_empty());
    }
}
