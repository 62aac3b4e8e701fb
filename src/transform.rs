//! レポート → 人気ページレコード変換
//!
//! ヘッダー名でページビュー列を探し、行の値とは位置で対応付ける。
//! 名前リストと値リストの長さが違う場合は短い方に揃える（zip）。

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analytics::{GetReportsResponse, Report, METRIC_PAGE_VIEWS};
use crate::error::PopularPagesError;

/// 完全一致で除外するパス
const EXCLUDED_EXACT: &[&str] = &["/"];

/// 前方一致で除外するパス
const EXCLUDED_PREFIXES: &[&str] = &["/categories", "/series", "/about"];

/// 人気ページ1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub path: String,
    pub views: i64,
}

/// 出力ドキュメント `{popular: [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularPages {
    pub popular: Vec<PageRecord>,
}

impl From<Vec<PageRecord>> for PopularPages {
    fn from(popular: Vec<PageRecord>) -> Self {
        Self { popular }
    }
}

/// コンテンツ以外のページかどうか
pub fn is_excluded_path(path: &str) -> bool {
    EXCLUDED_EXACT.contains(&path) || EXCLUDED_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// ページビュー値を整数に変換
///
/// 値が無い、または数値でない場合は実行全体を失敗させる。
fn parse_views(path: &str, value: Option<&str>) -> Result<i64, PopularPagesError> {
    let value = value.ok_or_else(|| PopularPagesError::MissingPageViews {
        path: path.to_string(),
    })?;

    value
        .trim()
        .parse::<i64>()
        .map_err(|_| PopularPagesError::InvalidPageViews {
            path: path.to_string(),
            value: value.to_string(),
        })
}

/// 1レポート分を変換
pub fn transform_report(report: &Report) -> Result<Vec<PageRecord>, PopularPagesError> {
    let dimension_headers = &report.column_header.dimensions;
    let metric_headers = &report.column_header.metric_header.metric_header_entries;

    let mut records = Vec::new();

    for row in &report.data.rows {
        let metric_values: &[String] = row
            .metrics
            .first()
            .map(|m| m.values.as_slice())
            .unwrap_or_default();

        for (_header, dimension) in dimension_headers.iter().zip(&row.dimensions) {
            if is_excluded_path(dimension) {
                debug!("Skipping excluded path: {}", dimension);
                continue;
            }

            let page_views = metric_headers
                .iter()
                .zip(metric_values)
                .find(|(header, _)| header.name == METRIC_PAGE_VIEWS)
                .map(|(_, value)| value.as_str());

            records.push(PageRecord {
                path: dimension.clone(),
                views: parse_views(dimension, page_views)?,
            });
        }
    }

    Ok(records)
}

/// レスポンス全体を変換（レポートごとの結果を連結）
pub fn transform_response(
    response: &GetReportsResponse,
) -> Result<Vec<PageRecord>, PopularPagesError> {
    info!("Parsing analytics response...");

    let mut records = Vec::new();
    for report in &response.reports {
        records.extend(transform_report(report)?);
    }

    info!(
        "Parsed {} record(s) from {} report(s)",
        records.len(),
        response.reports.len()
    );
    Ok(records)
}
