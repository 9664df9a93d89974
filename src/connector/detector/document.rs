use crate::connector::render::{Anchor, Placement};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("Invalid body selector"));

/// Raw page as handed over by the host: its URL and current markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSource {
    pub url: String,
    pub html: String,
}

impl PageSource {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Read-only parsed view of a host page
pub struct Document {
    url: Option<Url>,
    html: Html,
}

impl Document {
    #[must_use]
    pub fn parse(source: &PageSource) -> Self {
        Self {
            url: Url::parse(&source.url).ok(),
            html: Html::parse_document(&source.html),
        }
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// URL path, empty when the URL did not parse
    pub fn path(&self) -> &str {
        self.url.as_ref().map_or("", Url::path)
    }

    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    pub fn select_all<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }

    /// Whitespace-normalized text of the first match, if non-empty
    pub fn text_of(&self, selector: &Selector) -> Option<String> {
        self.select_first(selector).and_then(non_empty_text)
    }

    /// Trimmed attribute of the first match, if non-empty
    pub fn attr_of(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.select_first(selector)
            .and_then(|el| el.value().attr(attr))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Anchor the given element for injection
    pub fn anchor(&self, element: ElementRef<'_>, placement: Placement) -> Anchor {
        let position = match placement {
            Placement::Before | Placement::Prepend => self.position_of(element),
            Placement::After | Placement::Append => self.subtree_end(element),
        };
        Anchor::new(describe(element), position, placement)
    }

    /// Anchor at the end of `<body>`, the last-resort spot for floating elements
    pub fn body_anchor(&self) -> Option<Anchor> {
        self.select_first(&BODY)
            .map(|body| self.anchor(body, Placement::Append))
    }

    fn position_of(&self, element: ElementRef<'_>) -> usize {
        let id = element.id();
        self.html
            .tree
            .root()
            .descendants()
            .position(|node| node.id() == id)
            .unwrap_or(0)
    }

    fn subtree_end(&self, element: ElementRef<'_>) -> usize {
        let last = element
            .descendants()
            .last()
            .map_or_else(|| element.id(), |node| node.id());
        self.html
            .tree
            .root()
            .descendants()
            .position(|node| node.id() == last)
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("url", &self.url).finish_non_exhaustive()
    }
}

/// Collapse all whitespace runs in an element's text into single spaces
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse(element.text())
}

/// Text of the element's direct text children only, ignoring nested tags
pub fn own_text(element: ElementRef<'_>) -> String {
    collapse(
        element
            .children()
            .filter_map(|child| child.value().as_text().map(|t| &**t)),
    )
}

fn non_empty_text(element: ElementRef<'_>) -> Option<String> {
    let text = element_text(element);
    (!text.is_empty()).then_some(text)
}

fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short CSS-like description of an element, e.g. `section.hero` or `div#rhs`
fn describe(element: ElementRef<'_>) -> String {
    let value = element.value();
    let mut out = value.name().to_string();
    if let Some(id) = value.id() {
        out.push('#');
        out.push_str(id);
    } else if let Some(test_id) = value.attr("data-testid") {
        out.push_str(&format!("[data-testid=\"{test_id}\"]"));
    } else {
        for class in value.classes() {
            out.push('.');
            out.push_str(class);
        }
    }
    out
}
