//! Analytics Reporting API v4 モジュール
//!
//! サービスアカウントで認証し、人気ページのレポートを1回だけ取得する

mod client;
mod credentials;
mod types;

pub use client::{AnalyticsClient, BATCH_GET_URL};
pub use credentials::{Claims, ServiceAccountKey, ANALYTICS_READONLY_SCOPE, DEFAULT_TOKEN_URI};
pub use types::{
    BatchGetRequest, ColumnHeader, DateRange, DateRangeValues, Dimension, GetReportsResponse,
    Metric, MetricHeader, MetricHeaderEntry, OrderBy, Report, ReportData, ReportRequest, ReportRow,
    DIMENSION_PAGE_PATH, METRIC_PAGE_VIEWS,
};
