use anyhow::Context;
use serde::Serialize;
use taskboard_core::Notification;
use taskboard_domain::{BoardAggregate, EntityRef, OrderCommit};

use crate::cli::DragAction;
use crate::context::CliContext;
use crate::dispatcher::CommitDispatcher;
use crate::gesture::{GestureReplay, GestureScript};
use crate::output;

#[derive(Serialize)]
struct ReplayReport {
    board: BoardAggregate,
    commits: Vec<Vec<OrderCommit>>,
    clicks: Vec<EntityRef>,
    rejected: Vec<String>,
    notifications: Vec<Notification>,
}

pub async fn handle(ctx: &CliContext, action: DragAction) -> anyhow::Result<()> {
    match action {
        DragAction::Replay { board_id, script } => {
            let content = tokio::fs::read_to_string(&script)
                .await
                .with_context(|| format!("Failed to read gesture script {}", script.display()))?;
            let script: GestureScript =
                serde_json::from_str(&content).context("Invalid gesture script")?;

            let mut board = ctx.load_board(board_id).await?;
            let dispatcher = CommitDispatcher::spawn(ctx.backend());

            let mut commits = Vec::new();
            let mut replay = GestureReplay::new(&mut board, script.layout, ctx.config.sensors);
            for event in script.events {
                if let Some(batch) = replay.apply(event) {
                    dispatcher.submit(batch.clone());
                    commits.push(batch);
                }
            }
            let summary = replay.finish();

            let notifications = dispatcher.shutdown().await;
            for notification in &notifications {
                tracing::warn!("{}", notification.message);
            }

            output::output_success(ReplayReport {
                board,
                commits,
                clicks: summary.clicks,
                rejected: summary.rejected,
                notifications,
            });
        }
    }
    Ok(())
}
