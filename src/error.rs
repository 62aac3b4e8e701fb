use thiserror::Error;

#[derive(Error, Debug)]
pub enum PopularPagesError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("認証情報ファイルエラー: {0}")]
    Credentials(String),

    #[error("認証エラー: {0}")]
    Auth(String),

    #[error("JWT署名エラー: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("APIエラー: status={status}, body={body}")]
    Api { status: u16, body: String },

    #[error("ページビューがありません: path={path}")]
    MissingPageViews { path: String },

    #[error("ページビューを整数に変換できません: path={path}, value={value:?}")]
    InvalidPageViews { path: String, value: String },

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("JSONエラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8変換エラー: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("YAMLエラー: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
