use clap::Subcommand;
use serde_json::json;

use crate::admin::AdminConsole;
use crate::api::ApiClient;
use crate::cli::utils::{output_form, output_rows, output_success};
use crate::cli::OutputFormat;
use crate::models::{EntityId, EntityKind};
use crate::store::Store;

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List every record of a kind")]
    List {
        #[arg(help = "Entity kind (team-members, executives, news, accounts, ...)")]
        kind: EntityKind,
    },

    #[command(about = "Show the edit form for a record, or the empty form for a new one")]
    Form {
        #[arg(help = "Entity kind")]
        kind: EntityKind,
        #[arg(help = "Record ID (omit for a new record)")]
        id: Option<String>,
    },

    #[command(about = "Create a record, or update one when --id is given")]
    Save {
        #[arg(help = "Entity kind")]
        kind: EntityKind,
        #[arg(long, help = "Record ID to update")]
        id: Option<String>,
        #[arg(long = "set", value_name = "FIELD=VALUE", help = "Form field to set (repeatable)")]
        set: Vec<String>,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(help = "Entity kind")]
        kind: EntityKind,
        #[arg(help = "Record ID to delete")]
        id: String,
    },
}

pub async fn handle(cmd: DataCommands, client: ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = Store::mount(client).await?;
    let console = AdminConsole::new(store);

    match cmd {
        DataCommands::List { kind } => {
            let rows = console.rows(kind).await;
            output_rows(&output_format, kind.resource(), &rows)
        }
        DataCommands::Form { kind, id } => {
            let id = id.map(EntityId::from);
            let fields = console.begin_edit(kind, id.as_ref()).await?;
            output_form(&output_format, &fields)
        }
        DataCommands::Save { kind, id, set } => {
            let id = id.map(EntityId::from);
            let mut fields = console.begin_edit(kind, id.as_ref()).await?;
            for assignment in &set {
                let (name, value) = parse_assignment(assignment)?;
                if !fields.contains(name) {
                    anyhow::bail!("{} has no field '{}' (fields: {})", kind, name, kind.field_names().join(", "));
                }
                fields.set(name, value);
            }

            let saved = console.submit(kind, &fields, id).await?;
            output_success(
                &output_format,
                &format!("Saved {} {}", kind.label(), saved),
                Some(json!({ "id": saved })),
            )
        }
        DataCommands::Delete { kind, id } => {
            let id = EntityId::from(id);
            console.remove(kind, &id).await?;
            output_success(
                &output_format,
                &format!("Deleted {} {}", kind.label(), id),
                Some(json!({ "id": id })),
            )
        }
    }
}

fn parse_assignment(raw: &str) -> anyhow::Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim(), value))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| anyhow::anyhow!("expected FIELD=VALUE, got '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment_keeps_value_verbatim() {
        assert_eq!(parse_assignment("tags=a, b").unwrap(), ("tags", "a, b"));
        assert_eq!(parse_assignment("bio=x=y").unwrap(), ("bio", "x=y"));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=v").is_err());
    }
}
