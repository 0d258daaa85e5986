//! Remote storage backed by the template server's REST API.

use super::{BoxFuture, Storage, StorageError, StorageResult, Template, stored_id};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;

/// Storage that talks to a Labelcraft template server over HTTP.
///
/// Endpoints live under `<base>/templates`. Transport failures surface as
/// [`StorageError::Io`], which lets a [`TemplateRepository`](super::TemplateRepository)
/// fall back to its local mirror.
#[derive(Debug, Clone)]
pub struct HttpStorage {
    http: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct Deleted {
    deleted: bool,
}

impl HttpStorage {
    /// Create a storage for the server at `base_url`, e.g. `http://localhost:3030`.
    pub fn new(base_url: &str) -> StorageResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a storage that sends requests through `http`.
    pub fn with_client(http: Client, base_url: &str) -> StorageResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| StorageError::Other(format!("Invalid server URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::Other(format!("Invalid server URL {base_url}")));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/templates`, or `<base>/templates/<id>` with the id escaped.
    fn endpoint(&self, id: Option<&str>) -> StorageResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StorageError::Other(format!("Invalid server URL {}", self.base_url)))?;
            segments.pop_if_empty().push("templates");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

fn transport(e: reqwest::Error) -> StorageError {
    StorageError::Io(format!("Request failed: {e}"))
}

fn decode(e: reqwest::Error) -> StorageError {
    StorageError::Serialization(format!("Unexpected response body: {e}"))
}

/// Map a non-success response to a storage error.
async fn check(response: Response, id: &str) -> StorageResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    Err(match status {
        StatusCode::NOT_FOUND => StorageError::NotFound(id.to_string()),
        StatusCode::BAD_REQUEST => StorageError::Validation(message),
        _ => StorageError::Other(format!("Server returned {status}: {message}")),
    })
}

impl Storage for HttpStorage {
    fn save(&self, template: &Template) -> BoxFuture<'_, StorageResult<()>> {
        let prepared = stored_id(template).and_then(|id| Ok((id, self.endpoint(None)?)));
        let template = template.clone();

        Box::pin(async move {
            let (id, url) = prepared?;
            let response = self.http.post(url).json(&template).send().await.map_err(transport)?;
            check(response, &id).await?;
            log::debug!("Saved template {} to {}", id, self.base_url);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Template>> {
        let id = id.to_string();
        let url = self.endpoint(Some(&id));

        Box::pin(async move {
            let response = self.http.get(url?).send().await.map_err(transport)?;
            check(response, &id).await?.json().await.map_err(decode)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        let url = self.endpoint(Some(&id));

        Box::pin(async move {
            let response = self.http.delete(url?).send().await.map_err(transport)?;
            let body: Deleted = check(response, &id).await?.json().await.map_err(decode)?;
            Ok(body.deleted)
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<Template>>> {
        let url = self.endpoint(None);

        Box::pin(async move {
            let response = self.http.get(url?).send().await.map_err(transport)?;
            let mut templates: Vec<Template> = check(response, "").await?.json().await.map_err(decode)?;
            templates.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(templates)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let load = self.load(id);

        Box::pin(async move {
            match load.await {
                Ok(_) => Ok(true),
                Err(StorageError::NotFound(_)) => Ok(false),
                Err(e) => Err(e),
            }
        })
    }
}
