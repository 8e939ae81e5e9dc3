use futures_util::{stream, Stream};
use reqwest::{
    multipart::{Form, Part},
    Body,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    api::{client::ApiClient, error, success::Page},
    modules::material::{
        model::{MaterialQuery, UpdateMaterial, UploadFile, UploadProgress},
        repository::MaterialRepository,
        schema::MaterialEntity,
    },
};

#[derive(Clone)]
pub struct MaterialRepositoryHttp {
    api: ApiClient,
    chunk_size: usize,
}

impl MaterialRepositoryHttp {
    pub fn new(api: ApiClient, chunk_size: usize) -> Self {
        Self { api, chunk_size: chunk_size.max(1) }
    }
}

/// Splits the payload into chunks and reports progress as each one is
/// pulled by the transport. Events fire only when the whole percentage moves,
/// so the last chunk carries the single 100% event. An empty payload is sent
/// as one empty chunk and reports 100% straight away.
fn progress_chunks(
    bytes: Vec<u8>,
    chunk_size: usize,
    progress: Option<UnboundedSender<UploadProgress>>,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + 'static {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = if bytes.is_empty() {
        vec![Vec::new()]
    } else {
        bytes.chunks(chunk_size).map(<[u8]>::to_vec).collect()
    };
    let mut sent = 0u64;
    let mut last_pct: Option<u8> = None;

    let chunks = chunks.into_iter().map(move |chunk| {
        sent += chunk.len() as u64;
        if let Some(tx) = &progress {
            let event = UploadProgress { sent, total };
            if last_pct != Some(event.percentage()) {
                last_pct = Some(event.percentage());
                let _ = tx.send(event);
            }
        }
        Ok::<_, std::io::Error>(chunk)
    });
    stream::iter(chunks)
}

#[async_trait::async_trait]
impl MaterialRepository for MaterialRepositoryHttp {
    async fn find_page(
        &self,
        query: &MaterialQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<MaterialEntity>, error::SystemError> {
        let (items, pagination) = self
            .api
            .get_query::<Vec<MaterialEntity>>("materials", &query.to_query(page, page_size))
            .await?
            .into_parts();
        Ok(Page::new(items, pagination, page, page_size))
    }

    async fn find_by_id(&self, id: u64) -> Result<MaterialEntity, error::SystemError> {
        Ok(self.api.get::<MaterialEntity>(&format!("materials/{id}")).await?.into_data())
    }

    async fn upload(
        &self,
        file: UploadFile,
        progress: Option<UnboundedSender<UploadProgress>>,
    ) -> Result<MaterialEntity, error::SystemError> {
        let total = file.bytes.len() as u64;
        let body = Body::wrap_stream(progress_chunks(file.bytes, self.chunk_size, progress));
        let part = Part::stream_with_length(body, total)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)?;

        let mut form = Form::new().part("file", part);
        if let Some(workflow_id) = file.workflow_id {
            form = form.text("workflow_id", workflow_id.to_string());
        }

        Ok(self.api.post_multipart::<MaterialEntity>("materials", form).await?.into_data())
    }

    async fn update(
        &self,
        id: u64,
        changes: &UpdateMaterial,
    ) -> Result<MaterialEntity, error::SystemError> {
        let path = format!("materials/{id}");
        Ok(self.api.put::<_, MaterialEntity>(&path, changes).await?.into_data())
    }

    async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
        self.api.delete(&format!("materials/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_progress_reports_each_percent_change_once() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut chunks = Box::pin(progress_chunks(vec![0u8; 1000], 250, Some(tx)));
        let mut received = 0;
        while let Some(chunk) = chunks.next().await {
            received += chunk.unwrap().len();
        }
        assert_eq!(received, 1000);

        let mut pcts = Vec::new();
        while let Ok(event) = rx.try_recv() {
            pcts.push(event.percentage());
        }
        assert_eq!(pcts, vec![25, 50, 75, 100]);
    }

    #[tokio::test]
    async fn test_small_chunks_do_not_repeat_percentages() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let chunks: Vec<_> = progress_chunks(vec![1u8; 1000], 3, Some(tx)).collect().await;
        assert_eq!(chunks.len(), 334);

        let mut pcts = Vec::new();
        while let Ok(event) = rx.try_recv() {
            pcts.push(event.percentage());
        }
        assert_eq!(pcts.len(), 101);
        assert!(pcts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(pcts.last(), Some(&100));
    }

    #[tokio::test]
    async fn test_empty_file_reports_completion_once() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let chunks: Vec<_> = progress_chunks(Vec::new(), 64, Some(tx)).collect().await;
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].as_ref().unwrap().is_empty());

        assert_eq!(rx.try_recv().unwrap(), UploadProgress { sent: 0, total: 0 });
        assert!(rx.try_recv().is_err());
    }
}
