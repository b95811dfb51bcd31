use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

use crate::decode::Decode;
use crate::scope::Scope;
use crate::Result;

/// Fetch a page over HTTP and decode it in one step.
#[async_trait]
pub trait FetchExt {
    async fn fetch_decoded<T>(&self, url: &str) -> Result<T>
    where
        T: Decode + Default + Send;

    async fn fetch_decoded_into<T>(&self, url: &str, dest: &mut T) -> Result<()>
    where
        T: Decode + Send;
}

#[async_trait]
impl FetchExt for reqwest::Client {
    async fn fetch_decoded<T>(&self, url: &str) -> Result<T>
    where
        T: Decode + Default + Send,
    {
        let mut dest = T::default();
        self.fetch_decoded_into(url, &mut dest).await?;
        Ok(dest)
    }

    async fn fetch_decoded_into<T>(&self, url: &str, dest: &mut T) -> Result<()>
    where
        T: Decode + Send,
    {
        let body = self.get(url).send().await?.error_for_status()?.text().await?;
        debug!(url, bytes = body.len(), "fetched page");
        decode_body(&body, dest)
    }
}

// The parsed tree is not `Send`, so it must never live across an await.
fn decode_body<T: Decode>(body: &str, dest: &mut T) -> Result<()> {
    let document = Html::parse_document(body);
    Scope::document(&document).decode_into(dest)
}
