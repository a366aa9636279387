//! Fire-and-forget delivery of order commits.
//!
//! The gesture side hands over a batch and moves on; a background task
//! applies batches one at a time, in submission order. A failed batch is
//! not retried and the local board is not rolled back: the failure is
//! logged and left in the notification log for the front end to show.

use std::sync::Arc;
use taskboard_core::{Notification, NotificationLog, Notifier};
use taskboard_domain::{apply_commits, OrderBackend, OrderCommit};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

pub struct CommitDispatcher {
    batch_tx: mpsc::UnboundedSender<Vec<OrderCommit>>,
    worker: JoinHandle<()>,
    notifications: Arc<Mutex<NotificationLog>>,
}

impl CommitDispatcher {
    pub fn spawn(backend: Arc<dyn OrderBackend>) -> Self {
        let (batch_tx, mut batch_rx) = mpsc::unbounded_channel::<Vec<OrderCommit>>();
        let notifications = Arc::new(Mutex::new(NotificationLog::new()));
        let log = notifications.clone();

        let worker = tokio::spawn(async move {
            while let Some(batch) = batch_rx.recv().await {
                tracing::debug!("Applying batch of {} commits", batch.len());
                if let Err(e) = apply_commits(backend.as_ref(), &batch).await {
                    tracing::error!("Order commit batch failed: {}", e);
                    log.lock()
                        .await
                        .notify(Notification::error(format!("Could not save new order: {}", e)));
                }
            }
            tracing::debug!("Commit dispatcher stopped");
        });

        Self {
            batch_tx,
            worker,
            notifications,
        }
    }

    /// Queue a batch without waiting for it. Empty batches are dropped.
    pub fn submit(&self, batch: Vec<OrderCommit>) {
        if batch.is_empty() {
            return;
        }
        tracing::debug!("Queueing {} commits", batch.len());
        if let Err(e) = self.batch_tx.send(batch) {
            tracing::error!("Failed to queue {} commits: channel closed", e.0.len());
        }
    }

    /// Wait for every queued batch to finish, then return the notifications
    /// left undrained.
    pub async fn shutdown(self) -> Vec<Notification> {
        let Self {
            batch_tx,
            worker,
            notifications,
        } = self;
        drop(batch_tx);
        if let Err(e) = worker.await {
            tracing::error!("Commit dispatcher task failed: {}", e);
        }
        let drained = notifications.lock().await.drain();
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::{mock, predicate::eq, Sequence};
    use taskboard_core::{BoardError, BoardResult, Severity};
    use taskboard_domain::{
        BoardId, BoardSnapshot, Card, CardId, CardOrder, Column, ColumnId,
    };
    use uuid::Uuid;

    mock! {
        pub Backend {}

        #[async_trait]
        impl OrderBackend for Backend {
            async fn fetch_board(&self, board_id: BoardId) -> BoardResult<BoardSnapshot>;
            async fn update_column_order(&self, column_id: ColumnId, order: CardOrder) -> BoardResult<()>;
            async fn update_card_owner(&self, card_id: CardId, column_id: ColumnId) -> BoardResult<()>;
            async fn update_board_column_order(&self, board_id: BoardId, order: Vec<ColumnId>) -> BoardResult<()>;
            async fn create_column(&self, board_id: BoardId, title: String) -> BoardResult<Column>;
            async fn create_card(&self, column_id: ColumnId, title: String) -> BoardResult<Card>;
            async fn delete_column(&self, column_id: ColumnId) -> BoardResult<()>;
        }
    }

    #[tokio::test]
    async fn test_batches_apply_in_submission_order() {
        let (board_a, board_b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut seq = Sequence::new();
        let mut backend = MockBackend::new();
        backend
            .expect_update_board_column_order()
            .with(eq(board_a), eq(Vec::<ColumnId>::new()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        backend
            .expect_update_board_column_order()
            .with(eq(board_b), eq(Vec::<ColumnId>::new()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let dispatcher = CommitDispatcher::spawn(Arc::new(backend));
        dispatcher.submit(vec![OrderCommit::BoardColumnOrder {
            board_id: board_a,
            order: vec![],
        }]);
        dispatcher.submit(Vec::new());
        dispatcher.submit(vec![OrderCommit::BoardColumnOrder {
            board_id: board_b,
            order: vec![],
        }]);

        let notifications = dispatcher.shutdown().await;
        assert!(notifications.is_empty());
    }

    #[tokio::test]
    async fn test_failure_stops_batch_and_notifies() {
        let (source, destination, card) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut backend = MockBackend::new();
        backend
            .expect_update_column_order()
            .with(eq(source), eq(CardOrder::empty()))
            .times(1)
            .returning(|_, _| Err(BoardError::Backend("offline".to_string())));
        backend.expect_update_card_owner().times(0);

        let dispatcher = CommitDispatcher::spawn(Arc::new(backend));
        dispatcher.submit(vec![
            OrderCommit::ColumnCardOrder {
                column_id: source,
                order: CardOrder::empty(),
            },
            OrderCommit::ColumnCardOrder {
                column_id: destination,
                order: CardOrder::empty(),
            },
            OrderCommit::CardOwner {
                card_id: card,
                column_id: destination,
            },
        ]);

        let notifications = dispatcher.shutdown().await;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].severity, Severity::Error);
        assert!(notifications[0].message.contains("offline"));
    }
}
