use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the system after state changes commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    InventoryRecordCreated {
        record_id: Uuid,
        item_id: Uuid,
    },
    InventoryAdjusted {
        record_id: Uuid,
        item_id: Uuid,
        quantity_change: i32,
        new_quantity: i32,
        transaction_id: Uuid,
    },
    InventoryBelowReorderPoint {
        record_id: Uuid,
        item_id: Uuid,
        quantity: i32,
        reorder_point: i32,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Processes incoming events from the channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::InventoryRecordCreated { record_id, item_id } => {
                info!(
                    record_id = %record_id,
                    item_id = %item_id,
                    "Inventory record created"
                );
            }
            Event::InventoryAdjusted {
                record_id,
                item_id,
                quantity_change,
                new_quantity,
                transaction_id,
            } => {
                info!(
                    record_id = %record_id,
                    item_id = %item_id,
                    quantity_change = quantity_change,
                    new_quantity = new_quantity,
                    transaction_id = %transaction_id,
                    "Inventory adjusted"
                );
            }
            Event::InventoryBelowReorderPoint {
                record_id,
                item_id,
                quantity,
                reorder_point,
            } => {
                warn!(
                    record_id = %record_id,
                    item_id = %item_id,
                    quantity = quantity,
                    reorder_point = reorder_point,
                    "Inventory at or below reorder point"
                );
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_sender_delivers_events() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::InventoryRecordCreated {
                record_id: Uuid::new_v4(),
                item_id: Uuid::new_v4(),
            })
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(Event::InventoryRecordCreated { .. })
        ));
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender
            .send(Event::InventoryBelowReorderPoint {
                record_id: Uuid::new_v4(),
                item_id: Uuid::new_v4(),
                quantity: 1,
                reorder_point: 5,
            })
            .await;

        assert!(result.is_err());
    }
}
