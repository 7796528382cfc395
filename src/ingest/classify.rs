use crate::db::enums::ContentType;

/// One provider-detection rule: if any needle occurs in the lower-cased
/// link, the link belongs to `provider`.
struct ProviderRule {
    needles: &'static [&'static str],
    provider: ContentType,
    /// Only active when extended provider rules are enabled.
    extended: bool,
}

/// Evaluated top to bottom; the first matching rule wins. Links are matched
/// as plain substrings, not parsed into components, so order matters when a
/// provider's domain shows up inside another URL.
const PROVIDER_RULES: &[ProviderRule] = &[
    ProviderRule {
        needles: &["youtube.com", "youtu.be"],
        provider: ContentType::Youtube,
        extended: false,
    },
    ProviderRule {
        needles: &["twitter.com", "x.com"],
        provider: ContentType::Twitter,
        extended: false,
    },
    ProviderRule {
        needles: &["facebook.com"],
        provider: ContentType::Facebook,
        extended: true,
    },
    ProviderRule {
        needles: &["instagram.com"],
        provider: ContentType::Instagram,
        extended: false,
    },
    ProviderRule {
        needles: &["linkedin.com"],
        provider: ContentType::LinkedIn,
        extended: true,
    },
];

/// Classifies a normalized link into its provider type. Pure and
/// case-insensitive; anything unrecognized is `Others`.
pub fn classify(link: &str, extended_rules: bool) -> ContentType {
    let link = link.to_lowercase();
    PROVIDER_RULES
        .iter()
        .filter(|rule| extended_rules || !rule.extended)
        .find(|rule| rule.needles.iter().any(|needle| link.contains(needle)))
        .map(|rule| rule.provider)
        .unwrap_or(ContentType::Others)
}
