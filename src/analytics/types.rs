//! Analytics Reporting API v4 のリクエスト/レスポンス型定義

use serde::{Deserialize, Serialize};

/// ページビュー
pub const METRIC_PAGE_VIEWS: &str = "ga:pageviews";
pub const METRIC_UNIQUE_PAGE_VIEWS: &str = "ga:uniquePageviews";
pub const METRIC_TIME_ON_PAGE: &str = "ga:timeOnPage";
pub const METRIC_BOUNCES: &str = "ga:bounces";
pub const METRIC_ENTRANCES: &str = "ga:entrances";
pub const METRIC_EXITS: &str = "ga:exits";

/// ページパス
pub const DIMENSION_PAGE_PATH: &str = "ga:pagePath";

/// 取得期間（30日前〜今日）
pub const START_DATE: &str = "30daysAgo";
pub const END_DATE: &str = "today";

pub const SORT_DESCENDING: &str = "DESCENDING";

// ---- リクエスト ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetRequest {
    pub report_requests: Vec<ReportRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub view_id: String,
    pub date_ranges: Vec<DateRange>,
    pub metrics: Vec<Metric>,
    pub dimensions: Vec<Dimension>,
    pub order_bys: Vec<OrderBy>,
    pub page_size: u32,
}

impl ReportRequest {
    /// 人気ページ取得用のリクエスト
    ///
    /// 直近30日間のページパスごとの指標を、ページビューの降順で `max_size` 件まで取得する。
    pub fn popular_pages(view_id: impl Into<String>, max_size: u32) -> Self {
        let metrics = [
            METRIC_PAGE_VIEWS,
            METRIC_UNIQUE_PAGE_VIEWS,
            METRIC_TIME_ON_PAGE,
            METRIC_BOUNCES,
            METRIC_ENTRANCES,
            METRIC_EXITS,
        ]
        .into_iter()
        .map(|expression| Metric {
            expression: expression.to_string(),
        })
        .collect();

        Self {
            view_id: view_id.into(),
            date_ranges: vec![DateRange {
                start_date: START_DATE.to_string(),
                end_date: END_DATE.to_string(),
            }],
            metrics,
            dimensions: vec![Dimension {
                name: DIMENSION_PAGE_PATH.to_string(),
            }],
            order_bys: vec![OrderBy {
                field_name: METRIC_PAGE_VIEWS.to_string(),
                sort_order: SORT_DESCENDING.to_string(),
            }],
            page_size: max_size,
        }
    }
}

impl From<ReportRequest> for BatchGetRequest {
    fn from(req: ReportRequest) -> Self {
        Self {
            report_requests: vec![req],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub field_name: String,
    pub sort_order: String,
}

// ---- レスポンス ----
// 欠けているキーはすべて空として扱う

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetReportsResponse {
    #[serde(default)]
    pub reports: Vec<Report>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub column_header: ColumnHeader,
    #[serde(default)]
    pub data: ReportData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metric_header: MetricHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricHeader {
    #[serde(default)]
    pub metric_header_entries: Vec<MetricHeaderEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricHeaderEntry {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    #[serde(default)]
    pub rows: Vec<ReportRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(default)]
    pub dimensions: Vec<String>,
    /// 日付範囲ごとの指標値。先頭のみを使用する
    #[serde(default)]
    pub metrics: Vec<DateRangeValues>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRangeValues {
    #[serde(default)]
    pub values: Vec<String>,
}
