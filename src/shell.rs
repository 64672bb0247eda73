//! Line-oriented front end. Each input line is one user event; the catalog
//! is re-rendered after every change.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, warn};
use crate::catalog::EditSession;
use crate::catalog_service::CatalogClient;
use crate::domain::{ProductId, Rating};
use crate::error::CatalogError;
use crate::view::render_catalog;

pub const HELP: &str = "\
commands:
  list                              show the catalog
  add <rating> [name...]            add a product
  delete <id>                       delete a product
  fav <id>                          toggle favorite
  edit <id>                         start editing a product
  name <text>                       set the edited name
  rating <value>                    set the edited rating
  save                              save the edit
  review <id> <rating> <content...> add a review
  help                              show this text
  quit                              leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Add { rating: String, name: String },
    Delete(ProductId),
    Favorite(ProductId),
    Edit(ProductId),
    DraftName(String),
    DraftRating(String),
    Save,
    Review { id: ProductId, rating: String, content: String },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("invalid product id `{0}`")]
    InvalidId(String),
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Splits off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

fn parse_id(raw: &str) -> Result<ProductId, CommandParseError> {
    if raw.is_empty() {
        return Err(CommandParseError::MissingArgument("product id"));
    }
    raw.parse().map_err(|_| CommandParseError::InvalidId(raw.to_string()))
}

/// The review form requires both a rating and some content.
pub fn require_review_fields(rating: &str, content: &str) -> Result<(), CommandParseError> {
    if rating.trim().is_empty() {
        return Err(CommandParseError::MissingArgument("review rating"));
    }
    if content.trim().is_empty() {
        return Err(CommandParseError::MissingArgument("review content"));
    }
    Ok(())
}

pub fn parse_command(line: &str) -> Result<ShellCommand, CommandParseError> {
    let (word, rest) = split_word(line.trim_end());
    match word {
        "" => Err(CommandParseError::Empty),
        "list" | "ls" => Ok(ShellCommand::List),
        // The add form has no required fields.
        "add" => {
            let (rating, name) = split_word(rest);
            Ok(ShellCommand::Add {
                rating: rating.to_string(),
                name: name.trim_end().to_string(),
            })
        }
        "delete" | "rm" => Ok(ShellCommand::Delete(parse_id(split_word(rest).0)?)),
        "fav" | "favorite" => Ok(ShellCommand::Favorite(parse_id(split_word(rest).0)?)),
        "edit" => Ok(ShellCommand::Edit(parse_id(split_word(rest).0)?)),
        "name" => Ok(ShellCommand::DraftName(rest.trim_end().to_string())),
        "rating" => Ok(ShellCommand::DraftRating(rest.trim().to_string())),
        "save" => Ok(ShellCommand::Save),
        "review" => {
            let (id, rest) = split_word(rest);
            let id = parse_id(id)?;
            let (rating, content) = split_word(rest);
            let content = content.trim_end();
            require_review_fields(rating, content)?;
            Ok(ShellCommand::Review {
                id,
                rating: rating.to_string(),
                content: content.to_string(),
            })
        }
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(CommandParseError::Unknown(other.to_string())),
    }
}

async fn render<W: AsyncWrite + Unpin>(client: &CatalogClient, out: &mut W) -> Result<(), ShellError> {
    let products = client.list_products().await?;
    let session = client.get_edit_session().await?;
    out.write_all(render_catalog(&products, &session).as_bytes()).await?;
    Ok(())
}

/// Runs one command. Returns `false` when the shell should stop.
#[instrument(skip(client, out))]
pub async fn execute<W: AsyncWrite + Unpin>(
    client: &CatalogClient,
    command: ShellCommand,
    out: &mut W,
) -> Result<bool, ShellError> {
    let changed = match command {
        ShellCommand::List => true,
        ShellCommand::Help => {
            out.write_all(HELP.as_bytes()).await?;
            false
        }
        ShellCommand::Quit => return Ok(false),
        ShellCommand::Add { rating, name } => {
            let product = client.add_product(name, Rating::from(rating)).await?;
            debug!(product_id = %product.id, "Added from shell");
            true
        }
        ShellCommand::Delete(id) => {
            client.delete_product(id).await?;
            true
        }
        ShellCommand::Favorite(id) => {
            client.toggle_favorite(id).await?;
            true
        }
        ShellCommand::Edit(id) => {
            if client.begin_edit(id).await?.is_none() {
                out.write_all(format!("no product {}\n", id).as_bytes()).await?;
            }
            true
        }
        ShellCommand::DraftName(name) => update_draft(client, Some(name), None, out).await?,
        ShellCommand::DraftRating(rating) => {
            update_draft(client, None, Some(Rating::from(rating)), out).await?
        }
        ShellCommand::Save => match client.get_edit_session().await? {
            EditSession::Editing(draft) => {
                client.save_edit(draft.product_id, draft.name, draft.rating).await?;
                true
            }
            EditSession::Idle => {
                out.write_all(b"nothing to save\n").await?;
                false
            }
        },
        ShellCommand::Review { id, rating, content } => {
            client.add_review(id, content, Rating::from(rating)).await?;
            true
        }
    };

    if changed {
        render(client, out).await?;
    }
    Ok(true)
}

async fn update_draft<W: AsyncWrite + Unpin>(
    client: &CatalogClient,
    name: Option<String>,
    rating: Option<Rating>,
    out: &mut W,
) -> Result<bool, ShellError> {
    if client.update_edit_draft(name, rating).await?.is_none() {
        out.write_all(b"not editing; use `edit <id>` first\n").await?;
        return Ok(false);
    }
    Ok(true)
}

/// Reads commands until end of input or `quit`. Bad input and rejected
/// operations are reported and the loop continues; losing the service ends it.
pub async fn run_shell<R, W>(client: &CatalogClient, input: R, out: &mut W) -> Result<(), ShellError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    render(client, out).await?;
    out.write_all(b"> ").await?;
    out.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let keep_going = match parse_command(&line) {
            Ok(command) => match execute(client, command, out).await {
                Ok(keep_going) => keep_going,
                Err(ShellError::Catalog(e @ CatalogError::ActorCommunicationError(_))) => {
                    return Err(e.into());
                }
                Err(ShellError::Catalog(e)) => {
                    warn!(error = %e, "Command rejected");
                    out.write_all(format!("error: {}\n", e).as_bytes()).await?;
                    true
                }
                Err(e) => return Err(e),
            },
            Err(CommandParseError::Empty) => true,
            Err(e) => {
                out.write_all(format!("error: {}\n", e).as_bytes()).await?;
                true
            }
        };

        if !keep_going {
            break;
        }
        out.write_all(b"> ").await?;
        out.flush().await?;
    }

    out.flush().await?;
    Ok(())
}
