use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::forms::FormFields;
use crate::models::EntityId;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(obj)) = (data, response.as_object_mut()) {
                obj.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output one form as `field: value` lines
pub fn output_form(output_format: &OutputFormat, fields: &FormFields) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(fields)?);
        }
        OutputFormat::Text => {
            let width = fields.names().map(str::len).max().unwrap_or(0);
            for (name, value) in fields.iter() {
                println!("{:width$}  {}", name, value, width = width);
            }
        }
    }
    Ok(())
}

/// Output table rows, or an empty-collection message
pub fn output_rows(
    output_format: &OutputFormat,
    collection_name: &str,
    rows: &[(EntityId, FormFields)],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let items: Vec<Value> = rows
                .iter()
                .map(|(id, fields)| json!({ "id": id, "fields": fields }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: items }))?);
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No {} found", collection_name);
            }
            for (id, fields) in rows {
                let summary = ["name", "title", "username"]
                    .iter()
                    .find_map(|key| fields.get(key).filter(|v| !v.is_empty()))
                    .unwrap_or("(untitled)");
                println!("{}  {}", id, summary);
            }
        }
    }
    Ok(())
}
