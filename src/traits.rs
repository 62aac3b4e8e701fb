use async_trait::async_trait;

use crate::analytics::{GetReportsResponse, ReportRequest};
use crate::error::PopularPagesError;

#[async_trait]
pub trait ReportFetcher: Send + Sync {
    /// 認証（アクセストークン取得）
    async fn authorize(&mut self) -> Result<(), PopularPagesError>;

    /// レポート取得
    async fn fetch(&self, request: &ReportRequest) -> Result<GetReportsResponse, PopularPagesError>;

    /// 一括実行（authorize → fetch）
    async fn execute(
        &mut self,
        request: &ReportRequest,
    ) -> Result<GetReportsResponse, PopularPagesError> {
        self.authorize().await?;
        self.fetch(request).await
    }
}
