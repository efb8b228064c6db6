//! Deployed resource set cached for offline use.
//!
//! The list is fixed deployment configuration: one externally hosted red
//! card PDF per supported language, the local flyer PDFs, and the QR code
//! SVGs. Ordering matters for progress reporting and must stay stable.

/// Named cache region holding the offline resource set.
pub const RESOURCE_CACHE_NAME: &str = "redcards-resources-v1";

/// Externally hosted red card print PDFs by language, as deployed.
pub const RED_CARD_PRINT_LINKS: &[(&str, &str)] = &[
    (
        "english",
        "https://www.ilrc.org/sites/default/files/resources/red_card_english.pdf",
    ),
    (
        "spanish",
        "https://www.ilrc.org/sites/default/files/resources/red_card_spanish.pdf",
    ),
    (
        "chinese",
        "https://www.ilrc.org/sites/default/files/resources/red_card_chinese.pdf",
    ),
    (
        "korean",
        "https://www.ilrc.org/sites/default/files/resources/red_card_korean.pdf",
    ),
    (
        "vietnamese",
        "https://www.ilrc.org/sites/default/files/resources/red_card_vietnamese.pdf",
    ),
    (
        "tagalog",
        "https://www.ilrc.org/sites/default/files/resources/red_card_tagalog.pdf",
    ),
    (
        "arabic",
        "https://www.ilrc.org/sites/default/files/resources/red_card_arabic.pdf",
    ),
    (
        "haitian creole",
        "https://www.ilrc.org/sites/default/files/resources/red_card_haitian_creole.pdf",
    ),
];

/// Local flyer and QR assets served alongside the app shell.
const LOCAL_ASSETS: &[&str] = &[
    "/assets/Flyer.pdf",
    "/assets/Flyer_blank.pdf",
    "/assets/qr_black.svg",
    "/assets/qr.svg",
    "/assets/qr_red.svg",
];

/// Returns the full ordered list of resource URLs to cache: red card PDFs
/// first, then the local assets.
pub fn resource_urls() -> Vec<String> {
    RED_CARD_PRINT_LINKS
        .iter()
        .map(|(_, url)| (*url).to_string())
        .chain(LOCAL_ASSETS.iter().map(|url| (*url).to_string()))
        .collect()
}
