use super::{Action, Element, RequestIntent};
use crate::connector::types::{AvailabilityResult, AvailabilityStatus};

/// Floating corner indicator. Errors, and available items without a link,
/// render nothing.
pub fn floating_indicator(
    slot: &str,
    result: &AvailabilityResult,
    intent: RequestIntent,
) -> Option<Element> {
    let (modifier, icon, label, action) = match (result.status, &result.item_url) {
        (AvailabilityStatus::Available, Some(url)) => (
            "available",
            "check",
            "Available on Server".to_string(),
            Some(Action::Open { url: url.clone() }),
        ),
        (AvailabilityStatus::Partial, Some(url)) => (
            "partial",
            "warning",
            result
                .details
                .clone()
                .unwrap_or_else(|| "Partially available".to_string()),
            Some(Action::Open { url: url.clone() }),
        ),
        (AvailabilityStatus::Unavailable, _) => (
            "unavailable",
            "plus",
            "Request with Jellyseerr".to_string(),
            Some(Action::Request(intent)),
        ),
        (AvailabilityStatus::Unconfigured, _) => {
            ("unconfigured", "settings", "Configure Extension".to_string(), None)
        }
        _ => return None,
    };

    let mut body = Element::new("span").with_class("mc-indicator__label").with_text(label);
    if let Some(action) = action {
        body = body.with_action(action);
    }

    Some(
        Element::new("div")
            .with_id(slot)
            .with_class("mc-indicator")
            .with_class(format!("mc-indicator--{modifier}"))
            .with_attr("data-server", result.server_type.label())
            .with_child(
                Element::new("span")
                    .with_class("mc-icon")
                    .with_attr("data-icon", icon),
            )
            .with_child(body)
            .with_child(
                Element::new("span")
                    .with_class("mc-indicator__close")
                    .with_text("×")
                    .with_action(Action::Dismiss {
                        slot: slot.to_string(),
                    }),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::types::{MediaType, ServerType};

    fn intent() -> RequestIntent {
        RequestIntent {
            title: "Dune".to_string(),
            media_type: MediaType::Movie,
            year: Some(2021),
        }
    }

    #[test]
    fn test_available_opens_item() {
        let result = AvailabilityResult::new(AvailabilityStatus::Available, ServerType::Emby)
            .with_item_url("https://emby.test/item/9");
        let el = floating_indicator("ind", &result, intent()).unwrap();

        assert!(el.text_content().contains("Available on Server"));
        assert_eq!(
            el.action_labelled("Available"),
            Some(&Action::Open {
                url: "https://emby.test/item/9".to_string()
            })
        );
        assert_eq!(
            el.action_labelled("×"),
            Some(&Action::Dismiss {
                slot: "ind".to_string()
            })
        );
    }

    #[test]
    fn test_partial_uses_details() {
        let result = AvailabilityResult::new(AvailabilityStatus::Partial, ServerType::Jellyfin)
            .with_item_url("https://jf.test/item/1")
            .with_details("2 of 3 seasons");
        let el = floating_indicator("ind", &result, intent()).unwrap();
        assert!(el.text_content().contains("2 of 3 seasons"));
    }

    #[test]
    fn test_unavailable_and_unconfigured() {
        let unavailable = AvailabilityResult::new(AvailabilityStatus::Unavailable, ServerType::Emby);
        let unconfigured =
            AvailabilityResult::new(AvailabilityStatus::Unconfigured, ServerType::Emby);

        let request = floating_indicator("ind", &unavailable, intent()).unwrap();
        let settings = floating_indicator("ind", &unconfigured, intent()).unwrap();

        assert_eq!(
            request.action_labelled("Request with Jellyseerr"),
            Some(&Action::Request(intent()))
        );
        assert!(settings.text_content().contains("Configure Extension"));
        assert!(settings.action_labelled("Configure").is_none());
    }

    #[test]
    fn test_error_and_linkless_render_nothing() {
        let error = AvailabilityResult::new(AvailabilityStatus::Error, ServerType::Emby);
        let linkless = AvailabilityResult::new(AvailabilityStatus::Available, ServerType::Emby);

        assert!(floating_indicator("ind", &error, intent()).is_none());
        assert!(floating_indicator("ind", &linkless, intent()).is_none());
    }
}
