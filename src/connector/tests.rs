//! Connector integration tests

#[cfg(test)]
mod support {
    use crate::connector::{Result, Transport};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    /// Orchestrator stand-in answering by message kind, optionally per title
    #[derive(Default)]
    pub struct Scripted {
        replies: HashMap<String, Value>,
        gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
        pub seen: Mutex<Vec<Value>>,
    }

    impl Scripted {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer every `kind` message with `payload`
        pub fn reply(mut self, kind: &str, payload: Value) -> Self {
            self.replies.insert(kind.to_string(), envelope(kind, payload));
            self
        }

        /// Answer `kind` messages about `title` with `payload`
        pub fn reply_for(mut self, kind: &str, title: &str, payload: Value) -> Self {
            self.replies
                .insert(format!("{kind}:{title}"), envelope(kind, payload));
            self
        }

        /// Hold the first message about `title` until the sender fires
        pub fn gate(self, title: &str) -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().insert(title.to_string(), rx);
            (self, tx)
        }

        pub fn kinds(&self) -> Vec<String> {
            self.seen
                .lock()
                .iter()
                .filter_map(|m| m["type"].as_str().map(str::to_string))
                .collect()
        }
    }

    fn envelope(kind: &str, payload: Value) -> Value {
        json!({ "type": format!("{kind}_RESPONSE"), "payload": payload })
    }

    fn title_of(message: &Value) -> Option<String> {
        let payload = &message["payload"];
        payload["query"]
            .as_str()
            .or_else(|| payload["title"].as_str())
            .map(str::to_string)
    }

    #[async_trait]
    impl Transport for Arc<Scripted> {
        async fn deliver(&self, message: Value) -> Result<Option<Value>> {
            self.seen.lock().push(message.clone());

            let title = title_of(&message);
            let gate = title.as_ref().and_then(|t| self.gates.lock().remove(t));
            if let Some(gate) = gate {
                let _ = gate.await;
            }

            let kind = message["type"].as_str().unwrap_or_default();
            let specific = title.map(|t| format!("{kind}:{t}"));
            Ok(specific
                .and_then(|key| self.replies.get(&key))
                .or_else(|| self.replies.get(kind))
                .cloned())
        }
    }

    pub fn search_set(title: &str, status: &str, item_url: Option<&str>) -> Value {
        let mut row = json!({ "title": title, "mediaType": "movie", "status": status });
        if let Some(url) = item_url {
            row["itemUrl"] = json!(url);
        }
        json!({
            "results": [row],
            "jellyseerrEnabled": true,
            "serverType": "jellyfin",
            "jellyseerrUrl": "https://requests.test"
        })
    }
}

#[cfg(test)]
mod imdb_tests {
    use super::support::{Scripted, search_set};
    use crate::connector::{
        Action, AdapterTable, MessageClient, PageSource, Presentation, Surface, TargetState,
        on_page_load,
    };
    use serde_json::json;
    use std::sync::Arc;

    const SKELETON: &str = "media-connector-imdb-skeleton";
    const CARD: &str = "media-connector-imdb-card";

    fn page() -> PageSource {
        PageSource::new(
            "https://www.imdb.com/title/tt0133093/",
            r#"<html><head>
              <script type="application/ld+json">{"@type":"Movie","name":"The Matrix","datePublished":"1999-03-31"}</script>
            </head><body><main role="main">
              <section class="ipc-page-background--baseAlt"><div data-testid="hero-parent">hero</div></section>
            </main></body></html>"#,
        )
    }

    #[tokio::test]
    async fn test_available_title_gets_play_control() {
        let transport = Arc::new(
            Scripted::new()
                .reply("GET_CONFIG", json!({ "serverType": "jellyfin" }))
                .reply(
                    "SEARCH_JELLYSEERR",
                    search_set("The Matrix", "available", Some("https://jf.test/item/603")),
                ),
        );
        let client = MessageClient::new(transport.clone());
        let surface = Surface::new();

        let report = on_page_load(&page(), &client, &surface).await.unwrap();

        assert_eq!(
            report.targets[0].state,
            TargetState::Resolved(Presentation::Available {
                item_url: Some("https://jf.test/item/603".to_string())
            })
        );
        assert!(!surface.contains(SKELETON));

        let card = surface.get(CARD).unwrap();
        let text = card.text_content();
        assert!(text.contains("Powered by Jellyseerr · Jellyfin"));
        assert!(text.contains("✓ Available"));
        assert_eq!(
            card.action_labelled("Play"),
            Some(&Action::Open {
                url: "https://jf.test/item/603".to_string()
            })
        );
        assert_eq!(transport.kinds(), vec!["GET_CONFIG", "SEARCH_JELLYSEERR"]);
    }

    #[tokio::test]
    async fn test_unavailable_title_offers_request() {
        let transport = Arc::new(
            Scripted::new()
                .reply("GET_CONFIG", json!({ "serverType": "emby" }))
                .reply("SEARCH_JELLYSEERR", search_set("The Matrix", "unavailable", None)),
        );
        let surface = Surface::new();

        on_page_load(&page(), &MessageClient::new(transport), &surface)
            .await
            .unwrap();

        let card = surface.get(CARD).unwrap();
        assert!(card.text_content().contains("Not in library"));
        let action = card.action_labelled("Request").unwrap();
        assert_eq!(
            action.target_url(Some("https://requests.test/")).as_deref(),
            Some("https://requests.test/search?query=The%20Matrix")
        );
    }

    #[tokio::test]
    async fn test_no_answer_removes_skeleton() {
        let transport = Arc::new(Scripted::new());
        let surface = Surface::new();

        let report = on_page_load(&page(), &MessageClient::new(transport.clone()), &surface)
            .await
            .unwrap();

        assert_eq!(report.targets[0].state, TargetState::NoResponse);
        assert!(surface.is_empty());
        assert_eq!(transport.kinds(), vec!["GET_CONFIG", "SEARCH_JELLYSEERR"]);
    }

    #[tokio::test]
    async fn test_repeated_cycles_keep_one_card() {
        let transport = Arc::new(
            Scripted::new().reply("SEARCH_JELLYSEERR", search_set("The Matrix", "available", None)),
        );
        let client = MessageClient::new(transport);
        let surface = Surface::new();
        let table = AdapterTable::standard();

        for _ in 0..3 {
            table.dispatch(&page(), &client, &surface).await;
        }

        assert_eq!(surface.count(CARD), 1);
        assert_eq!(surface.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_site_is_ignored() {
        let surface = Surface::new();
        let report = on_page_load(
            &PageSource::new("https://example.com/", "<h1>Hi</h1>"),
            &MessageClient::new(Arc::new(Scripted::new())),
            &surface,
        )
        .await;

        assert!(report.is_none());
        assert!(surface.is_empty());
    }
}

#[cfg(test)]
mod justwatch_tests {
    use super::support::{Scripted, search_set};
    use crate::connector::{
        CyclePhase, JustWatchAdapter, MessageClient, NavigationSignal, PageSession, PageSource,
        Presentation, SEARCH_BADGE_CLASS, SiteVariant, Surface, TargetState, on_page_load,
    };
    use serde_json::json;
    use std::sync::Arc;

    const CARD: &str = "media-connector-justwatch-card";

    fn detail(slug: &str, title: &str) -> PageSource {
        PageSource::new(
            format!("https://www.justwatch.com/us/movie/{slug}"),
            format!(
                r#"<div class="title-detail-hero"><h1 class="title-detail-hero__details__title">{title}</h1></div>
                   <div class="buybox-container"></div>"#
            ),
        )
    }

    fn session(transport: Arc<Scripted>) -> PageSession {
        PageSession::new(
            Arc::new(JustWatchAdapter),
            MessageClient::new(transport),
            Arc::new(Surface::new()),
        )
    }

    #[tokio::test]
    async fn test_search_badges_follow_page_order() {
        let page = PageSource::new(
            "https://www.justwatch.com/us/search?q=alien",
            r#"<div class="title-list">
              <div class="title-list-row__row"><a href="/us/movie/alien"><span class="header-title">Alien</span></a></div>
              <div class="title-list-row__row"><a href="/us/movie/aliens"><span class="header-title">Aliens</span></a></div>
              <div class="title-list-row__row"><a href="/us/movie/alien-3"><span class="header-title">Alien 3</span></a></div>
            </div>"#,
        );
        let transport = Arc::new(
            Scripted::new()
                .reply_for("SEARCH_JELLYSEERR", "Alien", search_set("Alien", "available", None))
                .reply_for("SEARCH_JELLYSEERR", "Aliens", search_set("Aliens", "unavailable", None))
                .reply_for("SEARCH_JELLYSEERR", "Alien 3", search_set("Alien 3", "partial", None)),
        );
        let surface = Surface::new();

        let report = on_page_load(&page, &MessageClient::new(transport.clone()), &surface)
            .await
            .unwrap();

        assert_eq!(report.targets.len(), 3);
        let badges = surface.with_class(SEARCH_BADGE_CLASS);
        let statuses: Vec<_> = badges.iter().filter_map(|b| b.attr("data-status")).collect();
        assert_eq!(statuses, vec!["available", "unavailable", "partial"]);
        assert!(!transport.kinds().contains(&"GET_CONFIG".to_string()));
    }

    fn search_page(titles: &[&str]) -> PageSource {
        let rows: String = titles
            .iter()
            .map(|title| {
                let slug = title.to_lowercase().replace(' ', "-");
                format!(
                    r#"<div class="title-list-row__row"><a href="/us/movie/{slug}"><span class="header-title">{title}</span></a></div>"#
                )
            })
            .collect();
        PageSource::new(
            "https://www.justwatch.com/us/search?q=alien",
            format!(r#"<div class="title-list">{rows}</div>"#),
        )
    }

    fn badge_states(surface: &Surface) -> Vec<(String, Option<String>)> {
        surface
            .with_class(SEARCH_BADGE_CLASS)
            .iter()
            .map(|b| {
                (
                    b.id.clone().unwrap_or_default(),
                    b.attr("data-status").map(str::to_string),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_search_rows_resolve_independently() {
        let page = search_page(&["Alien", "Aliens", "Alien 3", "Prometheus"]);
        let (scripted, release) = Scripted::new()
            .reply_for("SEARCH_JELLYSEERR", "Alien", search_set("Alien", "available", None))
            .reply_for(
                "SEARCH_JELLYSEERR",
                "Aliens",
                json!({ "results": [], "jellyseerrEnabled": true, "serverType": "emby", "error": "boom" }),
            )
            .reply_for("SEARCH_JELLYSEERR", "Alien 3", search_set("Alien 3", "unavailable", None))
            .gate("Alien");
        let client = MessageClient::new(Arc::new(scripted));
        let surface = Surface::new();
        let badge = |i: usize| format!("media-connector-jw-search-badge-{i}");

        let (report, ()) = futures::join!(on_page_load(&page, &client, &surface), async {
            // Later rows settle while the first one is still waiting
            assert_eq!(
                badge_states(&surface),
                vec![
                    (badge(0), None),
                    (badge(1), Some("error".to_string())),
                    (badge(2), Some("unavailable".to_string())),
                ]
            );
            let _ = release.send(());
        });

        let states: Vec<_> = report.unwrap().targets.into_iter().map(|t| t.state).collect();
        assert_eq!(
            states,
            vec![
                TargetState::Resolved(Presentation::Available { item_url: None }),
                TargetState::Resolved(Presentation::Error {
                    message: Some("boom".to_string())
                }),
                TargetState::Resolved(Presentation::Unavailable),
                TargetState::NoResponse,
            ]
        );
        assert_eq!(
            badge_states(&surface),
            vec![
                (badge(0), Some("available".to_string())),
                (badge(1), Some("error".to_string())),
                (badge(2), Some("unavailable".to_string())),
            ]
        );
        assert!(!surface.contains(&badge(3)));
    }

    #[tokio::test]
    async fn test_fewer_rows_on_reload_retire_old_badges() {
        let transport = Arc::new(
            Scripted::new().reply("SEARCH_JELLYSEERR", search_set("Alien", "available", None)),
        );
        let client = MessageClient::new(transport);
        let surface = Surface::new();

        on_page_load(&search_page(&["Alien", "Aliens", "Alien 3"]), &client, &surface).await;
        assert_eq!(surface.with_class(SEARCH_BADGE_CLASS).len(), 3);

        on_page_load(&search_page(&["Alien"]), &client, &surface).await;
        let badges = badge_states(&surface);
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].0, "media-connector-jw-search-badge-0");

        let listing = PageSource::new("https://www.justwatch.com/us/new", "<h1>New</h1>");
        on_page_load(&listing, &client, &surface).await;
        assert!(surface.is_empty());
    }

    #[tokio::test]
    async fn test_stale_answer_is_discarded() {
        let (scripted, release) = Scripted::new()
            .reply("GET_CONFIG", json!({ "serverType": "emby" }))
            .reply_for("SEARCH_JELLYSEERR", "Heat", search_set("Heat", "available", None))
            .reply_for("SEARCH_JELLYSEERR", "Ronin", search_set("Ronin", "unavailable", None))
            .gate("Heat");
        let session = session(Arc::new(scripted));
        let heat = detail("heat", "Heat");
        let ronin = detail("ronin", "Ronin");

        let (first, second) = futures::join!(session.load(&heat), async {
            let report = session
                .navigate(NavigationSignal::HistoryChange, &ronin)
                .await;
            let _ = release.send(());
            report
        });

        assert_eq!(first.targets[0].state, TargetState::Superseded);
        assert!(matches!(
            second.unwrap().targets[0].state,
            TargetState::Resolved(_)
        ));

        let card = session.surface().get(CARD).unwrap();
        assert!(card.text_content().contains("Ronin"));
        assert!(!card.text_content().contains("Heat"));
        assert_eq!(session.phase(), CyclePhase::Resolved);
        assert_eq!(session.current_media()[0].query_title(), "Ronin");
    }

    #[tokio::test]
    async fn test_navigation_without_change_is_skipped() {
        let transport = Arc::new(
            Scripted::new().reply("SEARCH_JELLYSEERR", search_set("Heat", "available", None)),
        );
        let session = session(transport.clone());
        let page = detail("heat", "Heat");

        session.load(&page).await;
        let sent = transport.kinds().len();

        assert!(session.navigate(NavigationSignal::HistoryChange, &page).await.is_none());
        assert!(session.navigate(NavigationSignal::ContentMutation, &page).await.is_none());
        assert_eq!(transport.kinds().len(), sent);
        assert_eq!(session.surface().count(CARD), 1);
    }

    #[tokio::test]
    async fn test_navigation_to_non_media_clears_ui() {
        let transport = Arc::new(
            Scripted::new().reply("SEARCH_JELLYSEERR", search_set("Heat", "available", None)),
        );
        let session = session(transport);

        session.load(&detail("heat", "Heat")).await;
        assert!(session.surface().contains(CARD));

        let report = session
            .navigate(
                NavigationSignal::HistoryChange,
                &PageSource::new("https://www.justwatch.com/us/new", "<h1>New</h1>"),
            )
            .await
            .unwrap();

        assert!(report.is_empty());
        assert!(session.surface().is_empty());
        assert_eq!(session.phase(), CyclePhase::Idle);
    }

    #[test]
    fn test_justwatch_is_spa() {
        assert!(SiteVariant::JustWatch.is_spa());
    }
}

#[cfg(test)]
mod trakt_tests {
    use super::support::Scripted;
    use crate::connector::{
        Action, ImdbAdapter, MessageClient, NavigationSignal, PageSession, PageSource, Surface,
        TraktAdapter,
    };
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_item_and_button_rendered() {
        let page = PageSource::new(
            "https://trakt.tv/movies/the-matrix-1999",
            r#"<body><h1>The Matrix <span class="year">1999</span></h1>
              <a class="btn btn-checkin">Check In</a>
              <div class="section">
                <div class="trakt-list-title">Where to Watch</div>
                <div class="trakt-list-item-container"></div>
              </div></body>"#,
        );
        let transport = Arc::new(Scripted::new().reply(
            "CHECK_MEDIA",
            json!({ "status": "available", "serverType": "emby", "itemUrl": "https://emby.test/item/9" }),
        ));
        let session = PageSession::new(
            Arc::new(TraktAdapter),
            MessageClient::new(transport.clone()),
            Arc::new(Surface::new()),
        );

        session.load(&page).await;

        let surface = session.surface();
        let ids: Vec<_> = surface
            .mounts()
            .iter()
            .filter_map(|m| m.element.id.clone())
            .collect();
        assert_eq!(ids, vec!["media-connector-trakt-action-btn", "media-connector-wtw-item"]);
        assert!(
            surface
                .get("media-connector-trakt-action-btn")
                .unwrap()
                .text_content()
                .contains("Play on Emby")
        );

        let sent = transport.seen.lock();
        assert_eq!(sent[0]["type"], "CHECK_MEDIA");
        assert_eq!(sent[0]["payload"]["title"], "The Matrix");
        assert_eq!(sent[0]["payload"]["year"], 1999);
    }

    #[tokio::test]
    async fn test_indicator_can_be_dismissed() {
        let transport = Arc::new(Scripted::new().reply(
            "CHECK_MEDIA",
            json!({ "status": "unavailable", "serverType": "emby" }),
        ));
        let session = PageSession::new(
            Arc::new(TraktAdapter),
            MessageClient::new(transport),
            Arc::new(Surface::new()),
        );

        session
            .load(&PageSource::new(
                "https://trakt.tv/shows/dark",
                "<body><h1>Dark <span class=\"year\">2017</span></h1></body>",
            ))
            .await;
        assert!(session.surface().contains("media-connector-indicator"));

        let action = session.activate("media-connector-indicator", "×").unwrap();
        assert!(matches!(action, Action::Dismiss { .. }));
        assert!(session.surface().is_empty());
    }

    #[tokio::test]
    async fn test_non_spa_session_ignores_navigation() {
        let session = PageSession::new(
            Arc::new(ImdbAdapter),
            MessageClient::new(Arc::new(Scripted::new())),
            Arc::new(Surface::new()),
        );
        let page = PageSource::new("https://www.imdb.com/title/tt0133093/", "");

        assert!(
            session
                .navigate(NavigationSignal::HistoryChange, &page)
                .await
                .is_none()
        );
    }
}

#[cfg(test)]
mod transport_tests {
    use crate::connector::{HttpTransport, MessageClient};
    use std::time::Duration;

    #[tokio::test]
    async fn test_unreachable_orchestrator_yields_none() {
        let transport =
            HttpTransport::new("http://127.0.0.1:9/messages", Duration::from_millis(500)).unwrap();
        assert_eq!(transport.endpoint(), "http://127.0.0.1:9/messages");

        let client = MessageClient::new(transport);
        assert!(client.get_config().await.is_none());
    }
}
