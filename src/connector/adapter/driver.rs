use super::{SiteAdapter, Target, View};
use crate::connector::detector::{Document, PageSource};
use crate::connector::message::{MessageClient, Resolution};
use crate::connector::render::{Presentation, SlotLease, Surface};
use crate::connector::types::MediaIdentity;
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// How one target's cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetState {
    /// The answer was rendered
    Resolved(Presentation),
    /// Nobody answered; the loading view was removed
    NoResponse,
    /// A newer cycle took over the target's slots; the answer was dropped
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub media: MediaIdentity,
    pub state: TargetState,
}

/// Outcome of one detect/resolve/render cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub targets: Vec<TargetReport>,
}

impl CycleReport {
    /// Nothing was detected
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn media(&self) -> Vec<MediaIdentity> {
        self.targets.iter().map(|t| t.media.clone()).collect()
    }

    /// Presentation of each rendered target, in target order
    pub fn presentations(&self) -> Vec<Option<&Presentation>> {
        self.targets
            .iter()
            .map(|t| match &t.state {
                TargetState::Resolved(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

/// Parse the page and let the adapter find its targets.
///
/// The parsed document never outlives this call.
pub fn detect_targets(adapter: &dyn SiteAdapter, page: &PageSource) -> Vec<Target> {
    let doc = Document::parse(page);
    let targets = adapter.detect(&doc);
    debug!("{} targets on {}", targets.len(), adapter.variant());
    targets
}

/// Claim every target's slots, paint the loading view, then ask all
/// questions concurrently and render each answer as it arrives.
///
/// Answers for slots claimed again in the meantime are dropped.
pub async fn resolve_targets(
    adapter: &dyn SiteAdapter,
    targets: &[Target],
    client: &MessageClient,
    surface: &Surface,
) -> CycleReport {
    let leases: Vec<Vec<SlotLease>> = targets
        .iter()
        .map(|target| target.slots().map(|slot| surface.claim(slot)).collect())
        .collect();

    let server = if targets.iter().any(|t| t.needs_label) {
        Some(
            client
                .get_config()
                .await
                .map(|config| config.server_type)
                .unwrap_or_default(),
        )
    } else {
        None
    };

    let loading = View::Loading { server };
    for (target, leases) in targets.iter().zip(&leases) {
        paint(adapter, target, leases, &loading, surface);
    }

    let reports = join_all(
        targets
            .iter()
            .zip(&leases)
            .map(|(target, leases)| settle(adapter, target, leases, client, surface)),
    )
    .await;

    CycleReport { targets: reports }
}

/// Full cycle for one page.
///
/// The cycle replaces everything earlier cycles injected into `surface`:
/// slots it does not detect again are retired before any request goes out.
pub async fn run_cycle(
    adapter: &dyn SiteAdapter,
    page: &PageSource,
    client: &MessageClient,
    surface: &Surface,
) -> CycleReport {
    let targets = detect_targets(adapter, page);
    retire_undetected(&targets, surface);
    if targets.is_empty() {
        debug!("No media detected on {}", page.url);
        return CycleReport::default();
    }
    let report = resolve_targets(adapter, &targets, client, surface).await;
    info!(
        "{}: {} targets, {} rendered",
        adapter.variant(),
        report.targets.len(),
        report.presentations().iter().flatten().count()
    );
    report
}

fn retire_undetected(targets: &[Target], surface: &Surface) {
    let detected: HashSet<&str> = targets.iter().flat_map(Target::slots).collect();
    for slot in surface.slots() {
        if !detected.contains(slot.as_str()) {
            debug!("Retiring {}", slot);
            surface.retire(&slot);
        }
    }
}

async fn settle(
    adapter: &dyn SiteAdapter,
    target: &Target,
    leases: &[SlotLease],
    client: &MessageClient,
    surface: &Surface,
) -> TargetReport {
    let resolution = adapter.resolve(client, target).await;

    let state = if !leases.iter().all(|lease| surface.is_current(lease)) {
        debug!("Dropping stale answer for {}", target.media.query_title());
        TargetState::Superseded
    } else if let Some(resolution) = resolution {
        let painted = paint(adapter, target, leases, &View::Resolved(&resolution), surface);
        for lease in leases.iter().filter(|l| !painted.iter().any(|s| s == l.slot())) {
            surface.release(lease);
        }
        TargetState::Resolved(presentation_of(target, &resolution))
    } else {
        debug!("No answer for {}", target.media.query_title());
        for lease in leases {
            surface.release(lease);
        }
        TargetState::NoResponse
    };

    TargetReport {
        media: target.media.clone(),
        state,
    }
}

/// Commit the adapter's elements for `view`. Returns the slots painted.
fn paint(
    adapter: &dyn SiteAdapter,
    target: &Target,
    leases: &[SlotLease],
    view: &View<'_>,
    surface: &Surface,
) -> Vec<String> {
    let mut painted = Vec::new();
    for element in adapter.render(target, view) {
        let Some(slot) = element.id.clone() else {
            warn!("{} rendered an element without an id", adapter.variant());
            continue;
        };
        let (Some(lease), Some(anchor)) = (
            leases.iter().find(|l| l.slot() == slot),
            target.anchor_for(&slot),
        ) else {
            warn!("{} rendered into unclaimed slot {}", adapter.variant(), slot);
            continue;
        };
        if surface.commit(lease, anchor.clone(), element) {
            painted.push(slot);
        }
    }
    painted
}

fn presentation_of(target: &Target, resolution: &Resolution) -> Presentation {
    match resolution {
        Resolution::Availability(result) => Presentation::from_availability(result),
        Resolution::Search(set) => Presentation::from_search(
            set,
            target.media.query_title(),
            target.media.media_type(),
        ),
    }
}
