//! Menu text handling: typed input parsing and menu-item heuristics for
//! document text returned by the backend.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Common Singapore dishes offered when a document yields nothing usable.
pub const FALLBACK_DISHES: &[&str] = &[
    "Chicken Rice",
    "Laksa",
    "Char Kway Teow",
    "Prawn Mee",
    "Bak Chor Mee",
    "Fish and Chips",
    "Nasi Lemak",
    "Kaya Toast",
];

/// How many fallback dishes get preselected when content extraction fails.
pub const FALLBACK_PRESELECT: usize = 3;

/// Section headings seen on scanned menus; never dishes.
const CATEGORY_HEADERS: &[&str] = &["LUNCH SPECIALS", "BURGERS/MAINS", "MON-THU", "TILL4PM"];

const LENIENT_LIMIT: usize = 15;
const STRICT_LIMIT: usize = 12;

static PRICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d+").expect("price regex"));
static VARIANT_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+\.\d+").expect("variant price regex"));
static ADD_ON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+\s*\d+").expect("add-on regex"));
static PIPE_TAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[|].*").expect("pipe regex"));
static PRICE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+.*$").expect("price tail regex"));
static SLASH_TAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/.*$").expect("slash regex"));

pub fn fallback_dishes() -> Vec<String> {
    FALLBACK_DISHES.iter().map(|d| d.to_string()).collect()
}

/// Splits typed menu input. Newlines and commas both separate items.
pub fn parse_menu_input(input: &str) -> Vec<String> {
    input
        .replace('\n', ",")
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extraction used when the backend acknowledged the document text.
/// Strips prices and add-ons but keeps the rest of the line.
pub fn parse_menu_lines_lenient(content: &str) -> Vec<String> {
    let items = content
        .split('\n')
        .map(str::trim)
        .filter(|line| is_candidate(line, 3))
        .filter_map(|line| {
            let cleaned = PRICE.replace_all(line, "");
            let cleaned = VARIANT_PRICE.replace_all(&cleaned, "");
            let cleaned = ADD_ON.replace_all(&cleaned, "");
            let cleaned = PIPE_TAIL.replace_all(&cleaned, "");
            let cleaned = cleaned.trim();
            (char_len(cleaned) > 5
                && !CATEGORY_HEADERS.contains(&cleaned)
                && !cleaned.starts_with('·'))
            .then(|| cleaned.to_string())
        });
    dedup_exact(items, LENIENT_LIMIT)
}

/// Offline extraction. Cuts each line at the first price or slash.
pub fn parse_menu_lines_strict(content: &str) -> Vec<String> {
    let items = content
        .split('\n')
        .map(str::trim)
        .filter(|line| is_candidate(line, 5) && !line.contains("type"))
        .filter_map(|line| {
            let cleaned = PRICE_TAIL.replace_all(line, "");
            let cleaned = SLASH_TAIL.replace_all(&cleaned, "");
            let cleaned = cleaned.trim();
            (char_len(cleaned) > 3 && !CATEGORY_HEADERS.contains(&cleaned))
                .then(|| cleaned.to_string())
        });
    dedup_exact(items, STRICT_LIMIT)
}

/// Keeps the first occurrence of each item, comparing lowercase.
pub fn dedup_case_insensitive(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

fn dedup_exact(items: impl Iterator<Item = String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(item.clone()))
        .take(limit)
        .collect()
}

/// Skips blanks, JSON/image metadata, bullet fragments and bare numbers.
fn is_candidate(line: &str, min_len: usize) -> bool {
    !line.is_empty()
        && !line.starts_with('{')
        && !line.starts_with('·')
        && !line.starts_with('?')
        && char_len(line) > min_len
        && !line.chars().all(char::is_numeric)
        && !line.contains("img_path")
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCANNED_MENU: &str = "LUNCH SPECIALS\n\
        Hainanese Chicken Rice 5.50\n\
        Beef Burger 9.90/11.90 | with fries\n\
        {\"img_path\": \"page1.png\"}\n\
        · side\n\
        12345\n\
        Laksa + 1\n\
        Hainanese Chicken Rice 5.50\n\
        ? what\n\
        MON-THU\n";

    #[test]
    fn test_parse_menu_input_splits_on_newlines_and_commas() {
        assert_eq!(
            parse_menu_input("Chicken Rice\nLaksa, Kaya Toast,,\n  \nTeh Tarik "),
            vec!["Chicken Rice", "Laksa", "Kaya Toast", "Teh Tarik"]
        );
        assert!(parse_menu_input(" , \n ").is_empty());
    }

    #[test]
    fn test_lenient_strips_prices_and_addons() {
        let items = parse_menu_lines_lenient(SCANNED_MENU);
        // "Laksa" is too short once the add-on is stripped.
        assert_eq!(items, vec!["Hainanese Chicken Rice", "Beef Burger /"]);
    }

    #[test]
    fn test_strict_cuts_at_first_price() {
        let items = parse_menu_lines_strict(SCANNED_MENU);
        assert_eq!(items, vec!["Hainanese Chicken Rice", "Beef Burger", "Laksa + 1"]);
    }

    #[test]
    fn test_limits_are_applied() {
        let content: String = (0..40).map(|i| format!("Signature Dish {}\n", i)).collect();
        assert_eq!(parse_menu_lines_lenient(&content).len(), LENIENT_LIMIT);
        assert_eq!(parse_menu_lines_strict(&content).len(), STRICT_LIMIT);
    }

    #[test]
    fn test_dedup_case_insensitive_keeps_first() {
        let items = vec!["Laksa".to_string(), "LAKSA".to_string(), "Mee Siam".to_string()];
        assert_eq!(dedup_case_insensitive(items), vec!["Laksa", "Mee Siam"]);
    }
}
