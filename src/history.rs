//! Classification history for the selected variant.
//!
//! Selecting a variant claims the history slot. A response for a variant
//! that is no longer selected is dropped, so the displayed events always
//! belong to the displayed identifier.

use crate::client::ApiClient;
use crate::error::ErrorKind;
use crate::fence::{FencedSlot, Settled, SlotState};
use crate::types::{ClassificationEvent, VariantId};
use tracing::{debug, warn};

pub type HistoryState = SlotState<VariantId, Vec<ClassificationEvent>>;

pub struct HistoryLoader {
    api: ApiClient,
    slot: FencedSlot<VariantId, Vec<ClassificationEvent>>,
}

impl HistoryLoader {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            slot: FencedSlot::new(),
        }
    }

    /// Select `id` and fetch its event log in server order.
    ///
    /// A failed fetch resolves to an empty list (the slot keeps a notice so
    /// the failure is visible). Returns `Settled::Superseded` if another
    /// variant was selected before the response arrived.
    pub async fn load_history(&self, id: VariantId) -> Settled<Vec<ClassificationEvent>> {
        self.load(id).await.0
    }

    /// Like [`load_history`](Self::load_history), but also reports the kind
    /// of a failed fetch, even when the response was superseded.
    pub(crate) async fn load(
        &self,
        id: VariantId,
    ) -> (Settled<Vec<ClassificationEvent>>, Option<ErrorKind>) {
        let ticket = self.slot.begin(id);
        let (events, next, failure) = match self.api.variant_history(id).await {
            Ok(events) => (
                events.clone(),
                SlotState::Ready {
                    key: id,
                    value: events,
                },
                None,
            ),
            Err(e) => {
                warn!(variant_id = id, error = %e, "history fetch failed; showing empty history");
                (
                    Vec::new(),
                    SlotState::Failed {
                        key: id,
                        notice: e.notice(),
                    },
                    Some(e.kind()),
                )
            }
        };

        if self.slot.settle(ticket, next) {
            (Settled::Applied(events), failure)
        } else {
            debug!(variant_id = id, seq = ticket.seq(), "stale history response discarded");
            (Settled::Superseded, failure)
        }
    }

    pub fn state(&self) -> HistoryState {
        self.slot.state()
    }

    /// The selected variant and the events shown for it. Pending and failed
    /// loads show no events.
    pub fn displayed(&self) -> (Option<VariantId>, Vec<ClassificationEvent>) {
        let state = self.slot.state();
        let selected = state.key().copied();
        let events = match state {
            SlotState::Ready { value, .. } => value,
            _ => Vec::new(),
        };
        (selected, events)
    }

    pub fn clear(&self) {
        self.slot.reset();
    }
}
