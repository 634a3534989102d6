//! HTTP client for the `/todos` backend.

use crate::{
    config::BaseUrl,
    todo::{Todo, TodoId},
};
use gloo::net::http::{Request, Response};
use log::debug;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] gloo::net::Error),
    #[error("cannot decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend responded with {status}: {body}")]
    Status { status: u16, body: String },
}

/// Backend routes, one per operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    List,
    Create,
    Update(TodoId),
    ToggleComplete(TodoId),
    Delete(TodoId),
    ClearCompleted,
}

impl Endpoint {
    pub fn method(&self) -> &'static str {
        match self {
            Endpoint::List => "GET",
            Endpoint::Create => "POST",
            Endpoint::Update(_) | Endpoint::ToggleComplete(_) => "PUT",
            Endpoint::Delete(_) | Endpoint::ClearCompleted => "DELETE",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::List => "/todos".to_string(),
            Endpoint::Create => "/todos/create".to_string(),
            Endpoint::Update(id) | Endpoint::Delete(id) => format!("/todos/{id}"),
            Endpoint::ToggleComplete(id) => format!("/todos/{id}/complete"),
            Endpoint::ClearCompleted => "/todos/clear".to_string(),
        }
    }
}

#[derive(Serialize)]
struct TitleBody<'a> {
    title: &'a str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TodoClient {
    base_url: BaseUrl,
}

impl TodoClient {
    pub fn new(base_url: BaseUrl) -> Self {
        Self { base_url }
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        self.base_url.join(&endpoint.path())
    }

    fn request(&self, endpoint: &Endpoint) -> gloo::net::http::RequestBuilder {
        let url = self.url(endpoint);
        debug!("{} {url}", endpoint.method());
        match endpoint {
            Endpoint::List => Request::get(&url),
            Endpoint::Create => Request::post(&url),
            Endpoint::Update(_) | Endpoint::ToggleComplete(_) => Request::put(&url),
            Endpoint::Delete(_) | Endpoint::ClearCompleted => Request::delete(&url),
        }
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.request(&Endpoint::List).send().await?;
        let body = ensure_success(response).await?.text().await?;
        Ok(parse_list(&body)?)
    }

    pub async fn create(&self, title: &str) -> Result<Todo, ClientError> {
        let response = self
            .request(&Endpoint::Create)
            .json(&TitleBody { title })?
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn update(&self, id: &TodoId, title: &str) -> Result<(), ClientError> {
        let response = self
            .request(&Endpoint::Update(id.clone()))
            .json(&TitleBody { title })?
            .send()
            .await?;
        ensure_success(response).await.map(drop)
    }

    pub async fn toggle_complete(&self, id: &TodoId) -> Result<(), ClientError> {
        let response = self
            .request(&Endpoint::ToggleComplete(id.clone()))
            .send()
            .await?;
        ensure_success(response).await.map(drop)
    }

    pub async fn delete(&self, id: &TodoId) -> Result<(), ClientError> {
        let response = self.request(&Endpoint::Delete(id.clone())).send().await?;
        ensure_success(response).await.map(drop)
    }

    pub async fn clear_completed(&self) -> Result<(), ClientError> {
        let response = self.request(&Endpoint::ClearCompleted).send().await?;
        ensure_success(response).await.map(drop)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status,
        body: body.trim().to_string(),
    })
}

/// The backend encodes an empty list as `null`.
pub fn parse_list(body: &str) -> Result<Vec<Todo>, serde_json::Error> {
    let todos: Option<Vec<Todo>> = serde_json::from_str(body)?;
    Ok(todos.unwrap_or_default())
}
