//! Status rendering: pure construction of injected element trees.
//!
//! Builders in this module never touch the page. They map an availability
//! result (or the loading phase) to an [`Element`]; the [`Surface`] is the
//! only thing that mounts and unmounts them.

mod badge;
mod card;
mod indicator;
mod surface;
mod trakt;

pub use badge::{SEARCH_BADGE_CLASS, search_badge};
pub use card::{jellyseerr_card, skeleton, status_card};
pub use indicator::floating_indicator;
pub use surface::{Anchor, Mount, Placement, SlotLease, Surface};
pub use trakt::{action_button, where_to_watch_item};

use crate::connector::types::{
    AvailabilityResult, AvailabilityStatus, MediaIdentity, MediaType, SearchResultRow,
    SearchResultSet,
};

pub(crate) const AVAILABLE_TEXT: &str = "✓ Available";
pub(crate) const PARTIAL_TEXT: &str = "◐ Partially available";
pub(crate) const UNAVAILABLE_TEXT: &str = "Not in library";
pub(crate) const PLAY_TEXT: &str = "Play";
pub(crate) const REQUEST_TEXT: &str = "Request";

/// Render phase of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Resolved,
}

/// What a user wants to request when media is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIntent {
    pub title: String,
    pub media_type: MediaType,
    pub year: Option<i32>,
}

impl From<&MediaIdentity> for RequestIntent {
    fn from(media: &MediaIdentity) -> Self {
        Self {
            title: media.query_title().to_string(),
            media_type: media.media_type(),
            year: media.year(),
        }
    }
}

impl From<&SearchResultRow> for RequestIntent {
    fn from(row: &SearchResultRow) -> Self {
        Self {
            title: row.title.clone(),
            media_type: row.media_type,
            year: row.year,
        }
    }
}

/// Behaviour bound to an injected control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the media server item page
    Open { url: String },
    /// Start the request flow for missing media
    Request(RequestIntent),
    /// Close the element that owns the control
    Dismiss { slot: String },
}

impl Action {
    /// Page to navigate to when the control is activated
    pub fn target_url(&self, jellyseerr_url: Option<&str>) -> Option<String> {
        match self {
            Self::Open { url } => Some(url.clone()),
            Self::Request(intent) => jellyseerr_url.map(|base| {
                format!(
                    "{}/search?query={}",
                    base.trim_end_matches('/'),
                    urlencoding::encode(&intent.title)
                )
            }),
            Self::Dismiss { .. } => None,
        }
    }
}

/// One node of an injected element tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
    pub action: Option<Action>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: set id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder pattern: add class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder pattern: add attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder pattern: set text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder pattern: add child
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Builder pattern: add children
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Builder pattern: bind action
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Visible text of this node and its descendants, space separated
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            parts.push(text);
        }
        for child in &self.children {
            child.collect_text(parts);
        }
    }

    /// Depth-first search including this node
    pub fn find(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(predicate))
    }

    /// Controls in this tree, as (label, action) pairs in tree order
    pub fn actions(&self) -> Vec<(String, &Action)> {
        let mut out = Vec::new();
        self.collect_actions(&mut out);
        out
    }

    fn collect_actions<'a>(&'a self, out: &mut Vec<(String, &'a Action)>) {
        if let Some(action) = &self.action {
            out.push((self.text_content(), action));
        }
        for child in &self.children {
            child.collect_actions(out);
        }
    }

    /// Control whose label contains `label`
    pub fn action_labelled(&self, label: &str) -> Option<&Action> {
        self.actions()
            .into_iter()
            .find(|(text, _)| text.contains(label))
            .map(|(_, action)| action)
    }

    /// Serialize to HTML markup, e.g. for a host that injects via `innerHTML`
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            push_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            push_attr(out, "class", &self.classes.join(" "));
        }
        for (name, value) in &self.attributes {
            push_attr(out, name, value);
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Functional state a result maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Available { item_url: Option<String> },
    Partial {
        item_url: Option<String>,
        details: Option<String>,
    },
    Unavailable,
    Unconfigured,
    Error { message: Option<String> },
    NoResults,
}

impl Presentation {
    pub fn from_availability(result: &AvailabilityResult) -> Self {
        match result.status {
            AvailabilityStatus::Available => Self::Available {
                item_url: result.item_url.clone(),
            },
            AvailabilityStatus::Partial => Self::Partial {
                item_url: result.item_url.clone(),
                details: result.details.clone(),
            },
            AvailabilityStatus::Unavailable => Self::Unavailable,
            AvailabilityStatus::Unconfigured => Self::Unconfigured,
            AvailabilityStatus::Error => Self::Error {
                message: result.error.clone().or_else(|| result.details.clone()),
            },
        }
    }

    pub fn from_row(row: &SearchResultRow) -> Self {
        match row.status {
            AvailabilityStatus::Available => Self::Available {
                item_url: row.item_url.clone(),
            },
            AvailabilityStatus::Partial => Self::Partial {
                item_url: row.item_url.clone(),
                details: None,
            },
            AvailabilityStatus::Unavailable => Self::Unavailable,
            AvailabilityStatus::Unconfigured => Self::Unconfigured,
            AvailabilityStatus::Error => Self::Error { message: None },
        }
    }

    /// Set-level state: disabled and failed searches win over rows,
    /// otherwise the row best matching the query decides.
    pub fn from_search(set: &SearchResultSet, query: &str, media_type: MediaType) -> Self {
        if !set.jellyseerr_enabled {
            return Self::Unconfigured;
        }
        if let Some(error) = &set.error {
            return Self::Error {
                message: Some(error.clone()),
            };
        }
        set.best_row(query, media_type)
            .map_or(Self::NoResults, Self::from_row)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Available { .. } => "available",
            Self::Partial { .. } => "partial",
            Self::Unavailable => "unavailable",
            Self::Unconfigured => "unconfigured",
            Self::Error { .. } => "error",
            Self::NoResults => "no-results",
        }
    }
}

/// Badge text and primary control for a presentation
pub(crate) fn status_controls(presentation: &Presentation, intent: RequestIntent) -> Vec<Element> {
    let badge = |modifier: &str, text: &str| {
        Element::new("span")
            .with_class("mc-badge")
            .with_class(format!("mc-badge--{modifier}"))
            .with_text(text)
    };
    let play = |url: &Option<String>| {
        url.as_ref().map(|url| {
            Element::new("a")
                .with_class("mc-button")
                .with_attr("href", url.as_str())
                .with_attr("target", "_blank")
                .with_text(PLAY_TEXT)
                .with_action(Action::Open { url: url.clone() })
        })
    };

    match presentation {
        Presentation::Available { item_url } => std::iter::once(badge("available", AVAILABLE_TEXT))
            .chain(play(item_url))
            .collect(),
        Presentation::Partial { item_url, details } => {
            let mut out = vec![badge("partial", PARTIAL_TEXT)];
            if let Some(details) = details {
                out.push(Element::new("span").with_class("mc-details").with_text(details.as_str()));
            }
            out.extend(play(item_url));
            out
        }
        Presentation::Unavailable => vec![
            badge("unavailable", UNAVAILABLE_TEXT),
            Element::new("button")
                .with_class("mc-button")
                .with_class("mc-button--request")
                .with_text(REQUEST_TEXT)
                .with_action(Action::Request(intent)),
        ],
        Presentation::Unconfigured => vec![badge("unconfigured", "Not configured")],
        Presentation::Error { .. } => vec![badge("error", "Unavailable right now")],
        Presentation::NoResults => vec![badge("no-results", "Not found")],
    }
}
