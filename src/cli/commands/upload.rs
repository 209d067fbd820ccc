use serde_json::json;

use crate::api::ApiClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

pub async fn handle(path: String, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let url = client.uploader().upload_path(&path).await?;
    match output_format {
        OutputFormat::Text => {
            println!("{}", url);
            Ok(())
        }
        OutputFormat::Json => output_success(
            &output_format,
            &format!("Uploaded {}", path),
            Some(json!({ "url": url })),
        ),
    }
}
