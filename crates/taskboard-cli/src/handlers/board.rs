use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::Create { name, description } => {
            let board = ctx.store().create_board(name, description).await?;
            output::output_success(&board);
        }
        BoardAction::List => {
            let boards = ctx.store().list_boards().await;
            output::output_list(boards);
        }
        BoardAction::Show { id } => {
            let board = ctx.load_board(id).await?;
            output::output_success(&board);
        }
    }
    Ok(())
}
