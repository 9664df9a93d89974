use super::{Element, Presentation, RequestIntent, status_controls};
use crate::connector::types::{
    AvailabilityResult, MediaIdentity, MediaType, SearchQuery, SearchResultSet, ServerType,
};

const BRAND: &str = "I've got this!";

fn header(server: Option<ServerType>) -> Element {
    let powered_by = match server {
        Some(server) => format!("Powered by Jellyseerr · {}", server.label()),
        None => "Powered by Jellyseerr".to_string(),
    };

    Element::new("div")
        .with_class("mc-card__header")
        .with_child(Element::new("div").with_class("mc-card__icon"))
        .with_child(
            Element::new("div")
                .with_child(Element::new("div").with_class("mc-card__brand").with_text(BRAND))
                .with_child(
                    Element::new("div")
                        .with_class("mc-card__subtitle")
                        .with_text(powered_by),
                ),
        )
}

fn shimmer(width: u8) -> Element {
    Element::new("div")
        .with_class("mc-shimmer")
        .with_attr("style", format!("width:{width}%"))
}

fn card_shell(slot: &str, server: Option<ServerType>) -> Element {
    Element::new("div")
        .with_id(slot)
        .with_class("mc-card")
        .with_child(header(server))
}

/// Loading placeholder shown while the orchestrator answers
pub fn skeleton(slot: &str, server: Option<ServerType>) -> Element {
    Element::new("div")
        .with_id(slot)
        .with_class("mc-card")
        .with_class("mc-card--skeleton")
        .with_attr("aria-busy", "true")
        .with_child(header(server))
        .with_child(
            Element::new("div")
                .with_class("mc-card__body")
                .with_child(Element::new("div").with_class("mc-shimmer").with_class("mc-poster"))
                .with_children([shimmer(75), shimmer(40), shimmer(55), shimmer(50)]),
        )
}

/// Informational row: icon, heading and explanation
fn info_row(icon: &str, title: &str, message: &str) -> Element {
    Element::new("div")
        .with_class("mc-info-row")
        .with_child(Element::new("span").with_class("mc-info-row__icon").with_text(icon))
        .with_child(
            Element::new("div")
                .with_child(Element::new("div").with_class("mc-info-row__title").with_text(title))
                .with_child(
                    Element::new("div")
                        .with_class("mc-info-row__message")
                        .with_text(message),
                ),
        )
}

/// One media row with its status badge and control
fn result_row(
    title: &str,
    media_type: MediaType,
    year: Option<i32>,
    presentation: &Presentation,
    intent: RequestIntent,
) -> Element {
    let kind = match media_type {
        MediaType::Movie => "Movie",
        MediaType::Tv => "TV Series",
    };
    let meta = match year {
        Some(year) => format!("{kind} · {year}"),
        None => kind.to_string(),
    };

    Element::new("div")
        .with_class("mc-result-row")
        .with_attr("data-status", presentation.label())
        .with_child(Element::new("div").with_class("mc-result-row__title").with_text(title))
        .with_child(Element::new("div").with_class("mc-result-row__meta").with_text(meta))
        .with_child(
            Element::new("div")
                .with_class("mc-result-row__controls")
                .with_children(status_controls(presentation, intent)),
        )
}

/// Card listing Jellyseerr search results for the detected title
pub fn jellyseerr_card(slot: &str, set: &SearchResultSet, query: &SearchQuery) -> Element {
    let card = card_shell(slot, Some(set.server_type));

    if !set.jellyseerr_enabled {
        return card.with_child(info_row(
            "⚙️",
            "Jellyseerr not configured",
            "Open the extension popup to set your Jellyseerr URL and API key.",
        ));
    }

    if let Some(error) = &set.error {
        return card.with_child(info_row("⚠️", "Connection error", error));
    }

    if set.results.is_empty() {
        return card.with_child(info_row(
            "🔍",
            "No results",
            &format!("\"{}\" was not found on Jellyseerr.", query.query),
        ));
    }

    card.with_children(set.results.iter().map(|row| {
        result_row(
            &row.title,
            row.media_type,
            row.year,
            &Presentation::from_row(row),
            RequestIntent::from(row),
        )
    }))
}

/// Card for a single availability check of the detected media
pub fn status_card(slot: &str, result: &AvailabilityResult, media: &MediaIdentity) -> Element {
    let card = card_shell(slot, Some(result.server_type));
    let presentation = Presentation::from_availability(result);

    match &presentation {
        Presentation::Unconfigured => card.with_child(info_row(
            "⚙️",
            "Extension not configured",
            "Open the extension popup to connect your media server.",
        )),
        Presentation::Error { message } => card.with_child(info_row(
            "⚠️",
            "Connection error",
            message.as_deref().unwrap_or("The media server could not be reached."),
        )),
        _ => card.with_child(result_row(
            media.query_title(),
            media.media_type(),
            media.year(),
            &presentation,
            RequestIntent::from(media),
        )),
    }
}
