//! 人気ページ取得ライブラリ
//!
//! - Google Analytics (Reporting API v4) から直近30日のページ別レポートを取得
//! - `/` やカテゴリ・シリーズ・aboutページを除外して `{path, views}` に変換
//! - JSON / YAML ファイル、または標準出力に書き出し
//!
//! # 使用例
//!
//! ```rust,ignore
//! use popular_pages::{AnalyticsClient, PopularPagesConfig, PopularPagesRequest, PopularPagesService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = PopularPagesConfig::from_env().unwrap();
//!     let client = AnalyticsClient::from_key_file(&config.key_file_location).unwrap();
//!
//!     let mut service = PopularPagesService::new(client);
//!     let result = service.call(PopularPagesRequest::from(&config)).await.unwrap();
//!     println!("Popular pages: {}", result.records.len());
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod service;
pub mod traits;
pub mod transform;
pub mod writer;

// 主要な型をリエクスポート
pub use analytics::{AnalyticsClient, GetReportsResponse, ReportRequest};
pub use config::{OutputFormat, PopularPagesConfig};
pub use error::PopularPagesError;
pub use service::{PopularPagesRequest, PopularPagesResult, PopularPagesService};
pub use traits::ReportFetcher;
pub use transform::{is_excluded_path, transform_response, PageRecord, PopularPages};
pub use writer::{write_pages, WriteOutcome};
