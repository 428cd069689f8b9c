//! Landing page

use super::AppState;
use crate::error::ChatError;
use anyhow::Context;
use axum::extract::State;
use axum::response::Html;
use std::path::PathBuf;

/// Page shipped with the binary
pub const EMBEDDED_INDEX: &str = include_str!("../../assets/index.html");

/// Source of the HTML served at `/`
#[derive(Debug, Clone, Default)]
pub enum IndexPage {
    #[default]
    Embedded,
    /// Read from disk on every request so edits show up without a restart
    File(PathBuf),
}

impl From<Option<PathBuf>> for IndexPage {
    fn from(path: Option<PathBuf>) -> Self {
        path.map(IndexPage::File).unwrap_or_default()
    }
}

impl IndexPage {
    pub async fn load(&self) -> anyhow::Result<String> {
        match self {
            IndexPage::Embedded => Ok(EMBEDDED_INDEX.to_string()),
            IndexPage::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading index page {}", path.display())),
        }
    }
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ChatError> {
    Ok(Html(state.index.load().await?))
}
