use super::{Action, Element, RequestIntent};
use crate::connector::types::{AvailabilityResult, AvailabilityStatus};

/// Entry for Trakt's "Where to Watch" list
pub fn where_to_watch_item(
    slot: &str,
    result: &AvailabilityResult,
    intent: RequestIntent,
) -> Option<Element> {
    let server = result.server_type.label();
    let (label, href, action) = match (result.status, &result.item_url) {
        (AvailabilityStatus::Available, Some(url)) => (
            server.to_string(),
            url.clone(),
            Action::Open { url: url.clone() },
        ),
        (AvailabilityStatus::Partial, Some(url)) => (
            format!("{server} (Partial)"),
            url.clone(),
            Action::Open { url: url.clone() },
        ),
        (AvailabilityStatus::Unavailable, _) => {
            ("Request".to_string(), "#".to_string(), Action::Request(intent))
        }
        _ => return None,
    };

    Some(
        Element::new("div")
            .with_id(slot)
            .with_class("trakt-list-item")
            .with_class("media-connector-wtw")
            .with_child(
                Element::new("a")
                    .with_attr("href", href)
                    .with_attr("target", "_blank")
                    .with_child(Element::new("div").with_class("icon").with_attr("data-icon", server))
                    .with_child(Element::new("div").with_class("title").with_text(label))
                    .with_action(action),
            ),
    )
}

/// Button placed next to Trakt's "Check In" control
pub fn action_button(
    slot: &str,
    result: &AvailabilityResult,
    intent: RequestIntent,
) -> Option<Element> {
    let server = result.server_type.label();
    let (label, action) = match (result.status, &result.item_url) {
        (AvailabilityStatus::Available | AvailabilityStatus::Partial, Some(url)) => {
            (format!("Play on {server}"), Action::Open { url: url.clone() })
        }
        (AvailabilityStatus::Unavailable, _) => {
            (format!("Request on {server}"), Action::Request(intent))
        }
        _ => return None,
    };

    Some(
        Element::new("a")
            .with_id(slot)
            .with_class("btn")
            .with_class("btn-block")
            .with_class("media-connector-btn")
            .with_text(label)
            .with_action(action),
    )
}
