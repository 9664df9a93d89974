use super::{Action, Element, Phase, Presentation, RequestIntent};
use crate::connector::types::ServerType;

/// Class shared by every search-result badge on a page
pub const SEARCH_BADGE_CLASS: &str = "media-connector-jw-search-badge";

/// Compact per-row badge for search listings
pub fn search_badge(
    slot: &str,
    phase: Phase,
    presentation: Option<&Presentation>,
    server: ServerType,
    intent: RequestIntent,
) -> Element {
    let badge = Element::new("span")
        .with_id(slot)
        .with_class(SEARCH_BADGE_CLASS);

    let presentation = match (phase, presentation) {
        (Phase::Resolved, Some(p)) => p,
        _ => {
            return badge
                .with_class("mc-shimmer")
                .with_attr("aria-busy", "true")
                .with_text("…");
        }
    };

    let server = server.label();
    let (modifier, text, action) = match presentation {
        Presentation::Available { item_url } => (
            "available",
            format!("✓ On {server}"),
            item_url.clone().map(|url| Action::Open { url }),
        ),
        Presentation::Partial { item_url, .. } => (
            "partial",
            format!("◐ Partial on {server}"),
            item_url.clone().map(|url| Action::Open { url }),
        ),
        Presentation::Unavailable => ("unavailable", "+ Request".to_string(), Some(Action::Request(intent))),
        Presentation::Unconfigured => ("unconfigured", "⚙ Set up".to_string(), None),
        Presentation::Error { .. } => ("error", "⚠ Error".to_string(), None),
        Presentation::NoResults => ("no-results", "– Not found".to_string(), None),
    };

    let badge = badge
        .with_class(format!("mc-badge--{modifier}"))
        .with_attr("data-status", presentation.label())
        .with_text(text);
    match action {
        Some(action) => badge.with_action(action),
        None => badge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::types::MediaType;

    fn intent() -> RequestIntent {
        RequestIntent {
            title: "Heat".to_string(),
            media_type: MediaType::Movie,
            year: Some(1995),
        }
    }

    #[test]
    fn test_loading_badge() {
        let badge = search_badge("b0", Phase::Loading, None, ServerType::Emby, intent());
        assert!(badge.has_class(SEARCH_BADGE_CLASS));
        assert!(badge.has_class("mc-shimmer"));
        assert!(badge.action.is_none());
    }

    #[test]
    fn test_resolved_badges() {
        let available = Presentation::Available {
            item_url: Some("https://emby.test/1".to_string()),
        };
        let badge = search_badge("b0", Phase::Resolved, Some(&available), ServerType::Emby, intent());
        assert_eq!(badge.text_content(), "✓ On Emby");
        assert_eq!(badge.attr("data-status"), Some("available"));

        let request = search_badge(
            "b1",
            Phase::Resolved,
            Some(&Presentation::Unavailable),
            ServerType::Jellyfin,
            intent(),
        );
        assert_eq!(request.action, Some(Action::Request(intent())));

        let missing = search_badge(
            "b2",
            Phase::Resolved,
            Some(&Presentation::NoResults),
            ServerType::Emby,
            intent(),
        );
        assert_eq!(missing.attr("data-status"), Some("no-results"));
    }
}
