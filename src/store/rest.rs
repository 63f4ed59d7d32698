use super::{NoteStore, StoreError, StoreResult, NOTE_TABLE};
use crate::config::EnvConfig;
use crate::models::{NewNote, Note, NoteId, NotePatch};

/// PostgREST client for the `note` table.
#[derive(Clone)]
pub(crate) struct RestStore {
    client: reqwest::Client,
    table_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            table_url: config.rest_url(NOTE_TABLE),
            api_key: config.supabase_anon_key.clone(),
        }
    }

    fn with_auth_headers(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = req.header("apikey", &self.api_key);
        if self.api_key.is_empty() {
            req
        } else {
            req.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }

    pub(crate) fn select_all_url(&self) -> String {
        format!("{}?select=*&order=id.desc", self.table_url)
    }

    pub(crate) fn update_url(&self, id: NoteId) -> String {
        format!("{}?id=eq.{}", self.table_url, id)
    }

    async fn check(res: reqwest::Response, context: &'static str) -> StoreResult<reqwest::Response> {
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        Err(StoreError::Http {
            context,
            status,
            body,
        })
    }
}

impl NoteStore for RestStore {
    async fn select_all(&self) -> StoreResult<Vec<Note>> {
        let req = self.with_auth_headers(self.client.get(self.select_all_url()));
        let res = Self::check(req.send().await?, "select notes").await?;
        Ok(res.json().await?)
    }

    async fn insert(&self, note: &NewNote) -> StoreResult<()> {
        let req = self
            .with_auth_headers(self.client.post(&self.table_url))
            .header("Prefer", "return=minimal")
            .json(note);
        Self::check(req.send().await?, "insert note").await?;
        Ok(())
    }

    async fn update(&self, id: NoteId, patch: &NotePatch) -> StoreResult<()> {
        let req = self
            .with_auth_headers(self.client.patch(self.update_url(id)))
            .header("Prefer", "return=minimal")
            .json(patch);
        Self::check(req.send().await?, "update note").await?;
        Ok(())
    }
}
