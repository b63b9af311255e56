//! Ordered selector fallbacks and text helpers shared by the scrapers.
//!
//! Habr has shipped several layouts over the years, so most fields can live
//! under more than one class name. A [`FallbackChain`] lists the known shapes
//! in priority order and returns the first one that yields a value.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Extracts a value from a matched element, `None` meaning "try the next strategy".
pub type Extractor<T> = fn(ElementRef<'_>) -> Option<T>;

/// One selector paired with the extractor applied to its first match.
pub struct Strategy<T> {
    selector: Selector,
    extract: Extractor<T>,
}

impl<T> Strategy<T> {
    /// Panics on an invalid selector; chains are built from string literals.
    pub fn new(css: &str, extract: Extractor<T>) -> Self {
        let selector = Selector::parse(css)
            .unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"));
        Self { selector, extract }
    }

    fn apply(&self, scope: ElementRef<'_>) -> Option<T> {
        scope.select(&self.selector).next().and_then(self.extract)
    }
}

/// Strategies tried in order; the first non-`None` result wins.
pub struct FallbackChain<T> {
    strategies: Vec<Strategy<T>>,
}

impl<T> FallbackChain<T> {
    pub fn new(strategies: Vec<Strategy<T>>) -> Self {
        Self { strategies }
    }

    /// Every strategy uses the same extractor.
    pub fn uniform(selectors: &[&str], extract: Extractor<T>) -> Self {
        Self::new(
            selectors
                .iter()
                .map(|css| Strategy::new(css, extract))
                .collect(),
        )
    }

    /// Search beneath `scope`.
    pub fn first(&self, scope: ElementRef<'_>) -> Option<T> {
        self.strategies.iter().find_map(|s| s.apply(scope))
    }

    /// Search the whole document.
    pub fn first_in(&self, document: &Html) -> Option<T> {
        self.first(document.root_element())
    }
}

/// All elements matched by the first selector that matches anything.
pub fn select_all_first_nonempty<'a>(document: &'a Html, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
    selectors
        .iter()
        .map(|selector| document.select(selector).collect::<Vec<_>>())
        .find(|items| !items.is_empty())
        .unwrap_or_default()
}

/// Text of an element, trimmed; `None` when empty.
pub fn trimmed_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    non_empty(text.trim())
}

/// Text nodes joined with a space and whitespace runs collapsed; `None` when empty.
pub fn collapsed_text(element: ElementRef<'_>) -> Option<String> {
    let joined = element.text().join(" ");
    non_empty(WHITESPACE_RUN.replace_all(&joined, " ").trim())
}

/// Visible text beneath `container`: text inside `script` and `style` is
/// dropped, every other text node is trimmed and empty ones skipped, the rest
/// joined with a single space.
pub fn visible_text(container: ElementRef<'_>) -> String {
    container
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != container.id())
                .filter_map(|ancestor| ancestor.value().as_element())
                .any(|el| matches!(el.name(), "script" | "style"))
        })
        .map(|(_, text)| text.trim())
        .filter(|text| !text.is_empty())
        .join(" ")
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
