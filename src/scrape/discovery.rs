//! Year-range and sub-category discovery from the domain landing page.

use scraper::{Html, Selector};

use crate::error::ScrapeError;

/// Inclusive year range advertised by the page's search label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

/// One selectable sub-category button: portal value attribute + visible label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCategory {
    pub value: String,
    pub label: String,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Extract the `[start-end]` range from the `lbl_pesq` label.
/// A missing or malformed label means the page layout changed, so this
/// propagates instead of soft-failing.
pub fn year_window(page: &Html) -> Result<YearWindow, ScrapeError> {
    let label_selector = selector("label.lbl_pesq");
    let label = page
        .select(&label_selector)
        .next()
        .ok_or_else(|| ScrapeError::PageLayout("label.lbl_pesq not found".into()))?;
    let text: String = label.text().collect();
    parse_window(&text)
}

fn parse_window(text: &str) -> Result<YearWindow, ScrapeError> {
    let malformed = || ScrapeError::PageLayout(format!("malformed year range label {text:?}"));
    let open = text.find('[').ok_or_else(malformed)?;
    let close = text.find(']').ok_or_else(malformed)?;
    if close <= open {
        return Err(malformed());
    }
    let range = &text[open + 1..close];
    let (start, end) = range.split_once('-').ok_or_else(malformed)?;
    let start = start.trim().parse::<i32>().map_err(|_| malformed())?;
    let end = end.trim().parse::<i32>().map_err(|_| malformed())?;
    Ok(YearWindow { start, end })
}

/// Resolve the `year` query token against the discovered window.
/// Empty or "all" (any case) expands to the whole inclusive range; any
/// other token is taken as a single year with no bounds check — an
/// out-of-window year just produces an empty fetch downstream.
pub fn resolve_years(token: &str, window: YearWindow) -> Result<Vec<i32>, ScrapeError> {
    let token = token.trim();
    if token.is_empty() || token.eq_ignore_ascii_case("all") {
        return Ok((window.start..=window.end).collect());
    }
    let year = token
        .parse::<i32>()
        .map_err(|_| ScrapeError::YearToken(token.to_string()))?;
    Ok(vec![year])
}

/// Read the `btn_sopt` sub-category buttons. A non-zero filter keeps only
/// buttons whose value ends with the filter digit — a string suffix
/// match, not equality, reproducing the portal's `opt_0N` encoding.
pub fn subcategories(page: &Html, filter: u8) -> Vec<SubCategory> {
    let button_selector = selector("button.btn_sopt");
    let digit = filter.to_string();
    page.select(&button_selector)
        .filter_map(|button| {
            let value = button.value().attr("value")?.to_string();
            let label = button.text().collect::<String>().trim().to_string();
            Some(SubCategory { value, label })
        })
        .filter(|sub| filter == 0 || sub.value.ends_with(&digit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn window_parses_bracketed_range() {
        let doc = page(r#"<label class="lbl_pesq">Ano: [1970-2024]</label>"#);
        let window = year_window(&doc).unwrap();
        assert_eq!(window, YearWindow { start: 1970, end: 2024 });
    }

    #[test]
    fn missing_label_is_an_error() {
        let doc = page("<p>nothing here</p>");
        assert!(matches!(year_window(&doc), Err(ScrapeError::PageLayout(_))));
    }

    #[test]
    fn malformed_range_is_an_error() {
        for text in ["[1970]", "1970-2024", "[abc-2024]", "]1970-2024["] {
            let doc = page(&format!(r#"<label class="lbl_pesq">{text}</label>"#));
            assert!(year_window(&doc).is_err(), "should reject {text:?}");
        }
    }

    #[test]
    fn empty_token_expands_to_full_window() {
        let window = YearWindow { start: 1970, end: 2024 };
        let years = resolve_years("", window).unwrap();
        assert_eq!(years.len(), 55);
        assert_eq!(years.first(), Some(&1970));
        assert_eq!(years.last(), Some(&2024));
    }

    #[test]
    fn all_token_is_case_insensitive() {
        let window = YearWindow { start: 2000, end: 2002 };
        assert_eq!(resolve_years("all", window).unwrap(), vec![2000, 2001, 2002]);
        assert_eq!(resolve_years("ALL", window).unwrap(), vec![2000, 2001, 2002]);
    }

    #[test]
    fn single_year_token_is_a_singleton_without_bounds_check() {
        let window = YearWindow { start: 1970, end: 2024 };
        assert_eq!(resolve_years("2020", window).unwrap(), vec![2020]);
        // Out-of-window years pass through; they yield empty fetches later.
        assert_eq!(resolve_years("1900", window).unwrap(), vec![1900]);
    }

    #[test]
    fn garbage_token_is_an_error() {
        let window = YearWindow { start: 1970, end: 2024 };
        assert!(matches!(
            resolve_years("two-thousand", window),
            Err(ScrapeError::YearToken(_))
        ));
    }

    #[test]
    fn suffix_filter_is_exact_trailing_match() {
        let doc = page(concat!(
            r#"<button class="btn_sopt" value="opt_03">Uvas de mesa</button>"#,
            r#"<button class="btn_sopt" value="subopcao_13">Outras</button>"#,
            r#"<button class="btn_sopt" value="opt_13x">Ruído</button>"#,
            r#"<button class="btn_sopt" value="opt_04">Sem classificação</button>"#,
        ));
        let subs = subcategories(&doc, 3);
        let values: Vec<&str> = subs.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["opt_03", "subopcao_13"]);
    }

    #[test]
    fn zero_filter_keeps_every_button() {
        let doc = page(concat!(
            r#"<button class="btn_sopt" value="opt_01"> Viníferas </button>"#,
            r#"<button class="btn_sopt" value="opt_02">Americanas</button>"#,
        ));
        let subs = subcategories(&doc, 0);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].label, "Viníferas");
    }
}
