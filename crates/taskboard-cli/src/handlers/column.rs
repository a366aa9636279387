use crate::cli::ColumnAction;
use crate::context::CliContext;
use crate::output;
use taskboard_domain::OrderBackend;

pub async fn handle(ctx: &CliContext, action: ColumnAction) -> anyhow::Result<()> {
    match action {
        ColumnAction::Create { board_id, name } => {
            let column = ctx.store().create_column(board_id, name).await?;
            output::output_success(&column);
        }
        ColumnAction::Delete { id } => {
            ctx.store().delete_column(id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}));
        }
    }
    Ok(())
}
