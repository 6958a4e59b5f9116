//! Asset upload flow.
//!
//! Upload bytes, create an asset pointing at the upload, trigger
//! processing, poll until the file has a URL, then publish.

use eventdesk_core::content::AssetUpload;
use eventdesk_core::provider::{self, Asset};
use serde_json::{json, Value};
use tracing::debug;

use super::management::{ManagementClient, VERSION_HEADER};
use super::{handle_empty_response, handle_response, join, Target};
use crate::error::{ClientError, Result};

impl ManagementClient {
    /// Upload a file and publish it as an asset.
    pub async fn upload(&self, upload: AssetUpload) -> Result<Asset> {
        let upload_id = self.upload_bytes(&upload).await?;
        let created = self.create_asset(&upload, &upload_id).await?;
        let asset_id = sys_id(&created)?;

        self.process_asset(&asset_id, sys_version(&created)?).await?;
        let (url, version) = self.wait_for_url(&asset_id).await?;

        let response = self
            .request(
                reqwest::Method::PUT,
                self.url(&format!("/assets/{asset_id}/published")),
            )
            .header(VERSION_HEADER, version.to_string())
            .send()
            .await?;
        let _: Value = handle_response(response, Target::Collection).await?;

        debug!(asset_id = %asset_id, file_name = %upload.file_name, "Published asset");

        Ok(Asset {
            id: asset_id,
            url,
            file_name: upload.file_name,
            content_type: upload.content_type,
        })
    }

    async fn upload_bytes(&self, upload: &AssetUpload) -> Result<String> {
        let url = join(&self.upload_url, &format!("/spaces/{}/uploads", self.space.id));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(upload.bytes.clone())
            .send()
            .await?;
        let created: Value = handle_response(response, Target::Collection).await?;
        sys_id(&created)
    }

    async fn create_asset(&self, upload: &AssetUpload, upload_id: &str) -> Result<Value> {
        let locale = self.locale.as_str();
        let body = json!({
            "fields": {
                "title": {locale: upload.file_name},
                "file": {locale: {
                    "contentType": upload.content_type,
                    "fileName": upload.file_name,
                    "uploadFrom": {"sys": {"type": "Link", "linkType": "Upload", "id": upload_id}}
                }}
            }
        });

        let response = self
            .request(reqwest::Method::POST, self.url("/assets"))
            .json(&body)
            .send()
            .await?;
        handle_response(response, Target::Collection).await
    }

    async fn process_asset(&self, asset_id: &str, version: u64) -> Result<()> {
        let response = self
            .request(
                reqwest::Method::PUT,
                self.url(&format!("/assets/{asset_id}/files/{}/process", self.locale)),
            )
            .header(VERSION_HEADER, version.to_string())
            .send()
            .await?;
        handle_empty_response(response, Target::Collection).await
    }

    /// Polls the asset until processing has produced a file URL.
    async fn wait_for_url(&self, asset_id: &str) -> Result<(String, u64)> {
        for attempt in 1..=self.poll_attempts {
            let response = self
                .request(reqwest::Method::GET, self.url(&format!("/assets/{asset_id}")))
                .send()
                .await?;
            let asset: Value = handle_response(response, Target::Collection).await?;

            let url = asset
                .pointer(&format!("/fields/file/{}/url", self.locale))
                .and_then(Value::as_str);
            if let Some(url) = url {
                return Ok((absolute_url(url), sys_version(&asset)?));
            }

            debug!(asset_id = %asset_id, attempt, "Asset not processed yet");
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(ClientError::AssetProcessing {
            id: asset_id.to_string(),
        })
    }
}

fn sys_id(value: &Value) -> Result<String> {
    provider::sys_id(value)
        .map(str::to_string)
        .ok_or_else(|| ClientError::InvalidResponse("response has no sys.id".to_string()))
}

fn sys_version(value: &Value) -> Result<u64> {
    provider::sys_version(value)
        .ok_or_else(|| ClientError::InvalidResponse("response has no sys.version".to_string()))
}

/// Asset URLs are protocol-relative.
fn absolute_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Space;
    use eventdesk_core::provider::ContentManager;
    use httpmock::MockServer;
    use std::time::Duration;

    const ASSETS: &str = "/spaces/space1/environments/master/assets";

    fn client(server: &MockServer) -> ManagementClient {
        ManagementClient::new("cma-token", Space::new("space1", "master"))
            .with_base_url(server.base_url())
            .with_upload_url(server.base_url())
            .with_asset_polling(Duration::from_millis(1), 2)
    }

    #[tokio::test]
    async fn test_upload_runs_full_flow() {
        let server = MockServer::start();
        let upload = server.mock(|when, then| {
            when.method("POST")
                .path("/spaces/space1/uploads")
                .header("content-type", "application/octet-stream")
                .body("PNGDATA");
            then.status(201).json_body(json!({"sys": {"id": "up-1"}}));
        });
        let create = server.mock(|when, then| {
            when.method("POST").path(ASSETS).json_body(json!({
                "fields": {
                    "title": {"en-US": "banner.png"},
                    "file": {"en-US": {
                        "contentType": "image/png",
                        "fileName": "banner.png",
                        "uploadFrom": {"sys": {"type": "Link", "linkType": "Upload", "id": "up-1"}}
                    }}
                }
            }));
            then.status(201).json_body(json!({"sys": {"id": "a-1", "version": 1}}));
        });
        let process = server.mock(|when, then| {
            when.method("PUT")
                .path(format!("{ASSETS}/a-1/files/en-US/process"))
                .header(VERSION_HEADER, "1");
            then.status(204);
        });
        let poll = server.mock(|when, then| {
            when.method("GET").path(format!("{ASSETS}/a-1"));
            then.status(200).json_body(json!({
                "sys": {"id": "a-1", "version": 2},
                "fields": {"file": {"en-US": {"url": "//images.ctfassets.net/space1/a-1/banner.png"}}}
            }));
        });
        let publish = server.mock(|when, then| {
            when.method("PUT")
                .path(format!("{ASSETS}/a-1/published"))
                .header(VERSION_HEADER, "2");
            then.status(200).json_body(json!({"sys": {"id": "a-1", "version": 3}}));
        });

        let asset = client(&server)
            .upload_asset(AssetUpload::new("banner.png", "image/png", b"PNGDATA".to_vec()))
            .await
            .unwrap();

        upload.assert();
        create.assert();
        process.assert();
        poll.assert();
        publish.assert();
        assert_eq!(asset.id, "a-1");
        assert_eq!(asset.url, "https://images.ctfassets.net/space1/a-1/banner.png");
    }

    #[tokio::test]
    async fn test_upload_gives_up_when_processing_stalls() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/spaces/space1/uploads");
            then.status(201).json_body(json!({"sys": {"id": "up-1"}}));
        });
        server.mock(|when, then| {
            when.method("POST").path(ASSETS);
            then.status(201).json_body(json!({"sys": {"id": "a-1", "version": 1}}));
        });
        server.mock(|when, then| {
            when.method("PUT").path(format!("{ASSETS}/a-1/files/en-US/process"));
            then.status(204);
        });
        server.mock(|when, then| {
            when.method("GET").path(format!("{ASSETS}/a-1"));
            then.status(200)
                .json_body(json!({"sys": {"id": "a-1", "version": 2}, "fields": {}}));
        });

        let error = client(&server)
            .upload(AssetUpload::new("banner.png", "image/png", b"x".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(error, ClientError::AssetProcessing { ref id } if id == "a-1"));
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("//img/x.png"), "https://img/x.png");
        assert_eq!(absolute_url("https://img/x.png"), "https://img/x.png");
    }
}
