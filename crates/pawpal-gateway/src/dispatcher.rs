use std::sync::Arc;

use tokio::sync::broadcast;

use pawpal_types::events::MarketEvent;

/// Publish/subscribe hub for market events. Writes publish here; connected
/// WebSocket clients subscribe and relay. Replaces interval polling as the
/// liveness mechanism (polling the REST endpoints still works as a degraded
/// mode).
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    broadcast_tx: broadcast::Sender<MarketEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(DispatcherInner { broadcast_tx }),
        }
    }

    /// Subscribe to market events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Publish an event to all connected clients. A send with no subscribers
    /// is not an error.
    pub fn publish(&self, event: MarketEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawpal_types::models::BookingStatus;

    #[tokio::test]
    async fn publish_reaches_all_subscribers() {
        let dispatcher = Dispatcher::new();
        let mut rx1 = dispatcher.subscribe();
        let mut rx2 = dispatcher.subscribe();

        dispatcher.publish(MarketEvent::BookingUpdated {
            booking_id: "b1".into(),
            status: BookingStatus::Accepted,
        });

        for rx in [&mut rx1, &mut rx2] {
            match rx.recv().await.unwrap() {
                MarketEvent::BookingUpdated { booking_id, status } => {
                    assert_eq!(booking_id, "b1");
                    assert_eq!(status, BookingStatus::Accepted);
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let dispatcher = Dispatcher::new();
        dispatcher.publish(MarketEvent::BookingUpdated {
            booking_id: "b1".into(),
            status: BookingStatus::Rejected,
        });
    }
}
