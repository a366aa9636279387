use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Kanban board with drag-and-drop reordering", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the board data file (or set TASKBOARD_FILE env var)
    #[arg(long, short, global = true, value_name = "FILE", env = "TASKBOARD_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// Column operations
    Column(ColumnCommand),
    /// Card operations
    Card(CardCommand),
    /// Drive a drag gesture against a board
    Drag(DragCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a new board
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List all boards
    List,
    /// Show a board with its columns and cards in display order
    Show {
        #[arg(long)]
        id: Uuid,
    },
}

// Column commands
#[derive(Args)]
pub struct ColumnCommand {
    #[command(subcommand)]
    pub action: ColumnAction,
}

#[derive(Subcommand)]
pub enum ColumnAction {
    /// Append a new column to a board
    Create {
        #[arg(long)]
        board_id: Uuid,
        #[arg(long)]
        name: String,
    },
    /// Delete a column and its cards
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

// Card commands
#[derive(Args)]
pub struct CardCommand {
    #[command(subcommand)]
    pub action: CardAction,
}

#[derive(Subcommand)]
pub enum CardAction {
    /// Append a new card to a column
    Create {
        #[arg(long)]
        column_id: Uuid,
        #[arg(long)]
        title: String,
    },
}

// Drag commands
#[derive(Args)]
pub struct DragCommand {
    #[command(subcommand)]
    pub action: DragAction,
}

#[derive(Subcommand)]
pub enum DragAction {
    /// Replay a recorded gesture script and commit the resulting order
    Replay {
        #[arg(long)]
        board_id: Uuid,
        /// JSON gesture script
        #[arg(long, value_name = "SCRIPT")]
        script: PathBuf,
    },
}
