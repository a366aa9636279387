use crate::cli::CardAction;
use crate::context::CliContext;
use crate::output;
use taskboard_domain::OrderBackend;

pub async fn handle(ctx: &CliContext, action: CardAction) -> anyhow::Result<()> {
    match action {
        CardAction::Create { column_id, title } => {
            let card = ctx.store().create_card(column_id, title).await?;
            output::output_success(&card);
        }
    }
    Ok(())
}
