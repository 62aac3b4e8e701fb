use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::Mutex;
use tower::Service;
use tracing::info;

use crate::analytics::ReportRequest;
use crate::config::{OutputFormat, PopularPagesConfig};
use crate::error::PopularPagesError;
use crate::traits::ReportFetcher;
use crate::transform::{transform_response, PageRecord, PopularPages};
use crate::writer::{write_pages, WriteOutcome};

/// 人気ページ取得リクエスト
#[derive(Debug, Clone)]
pub struct PopularPagesRequest {
    pub view_id: String,
    pub max_size: u32,
    pub output_format: OutputFormat,
    pub output_path: Option<PathBuf>,
}

impl PopularPagesRequest {
    pub fn new(view_id: impl Into<String>, max_size: u32) -> Self {
        Self {
            view_id: view_id.into(),
            max_size,
            output_format: OutputFormat::Stdout,
            output_path: None,
        }
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

impl From<&PopularPagesConfig> for PopularPagesRequest {
    fn from(config: &PopularPagesConfig) -> Self {
        PopularPagesRequest {
            view_id: config.view_id.clone(),
            max_size: config.max_size,
            output_format: config.output_format,
            output_path: config.output_path.clone(),
        }
    }
}

/// 実行結果
#[derive(Debug)]
pub struct PopularPagesResult {
    pub records: Vec<PageRecord>,
    pub outcome: WriteOutcome,
}

/// tower::Serviceを実装した人気ページサービス
///
/// 取得 → 変換 → 書き出しを順番に実行する。
pub struct PopularPagesService<F> {
    fetcher: Arc<Mutex<F>>,
}

impl<F> Clone for PopularPagesService<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<F: ReportFetcher + 'static> PopularPagesService<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(Mutex::new(fetcher)),
        }
    }
}

impl<F: ReportFetcher + 'static> Service<PopularPagesRequest> for PopularPagesService<F> {
    type Response = PopularPagesResult;
    type Error = PopularPagesError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: PopularPagesRequest) -> Self::Future {
        info!(
            "人気ページリクエスト受信: view_id={}, max_size={}, format={}",
            req.view_id, req.max_size, req.output_format
        );

        let fetcher = Arc::clone(&self.fetcher);

        Box::pin(async move {
            let report_request = ReportRequest::popular_pages(&req.view_id, req.max_size);

            let response = fetcher.lock().await.execute(&report_request).await?;
            let records = transform_response(&response)?;

            let pages = PopularPages::from(records);
            let outcome = write_pages(&pages, req.output_format, req.output_path.as_deref())?;

            info!("人気ページ出力完了: {} 件, {:?}", pages.popular.len(), outcome);

            Ok(PopularPagesResult {
                records: pages.popular,
                outcome,
            })
        })
    }
}
