use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::config::OutputFormat;
use crate::error::PopularPagesError;
use crate::transform::PopularPages;

/// JSON出力のインデント（3スペース）
const JSON_INDENT: &[u8] = b"   ";

/// 書き出し先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    File(PathBuf),
    Stdout,
}

impl PopularPages {
    pub fn to_json_string(&self) -> Result<String, PopularPagesError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8(buf)?)
    }

    /// ブロックスタイルのYAML
    pub fn to_yaml_string(&self) -> Result<String, PopularPagesError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// 人が読むための一覧表示
    pub fn dump<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(out, "popular ({} pages):", self.popular.len())?;
        for (i, record) in self.popular.iter().enumerate() {
            writeln!(out, "  {:>3}. {} ({} views)", i + 1, record.path, record.views)?;
        }
        Ok(())
    }
}

/// シリアライズしてからファイルを作成する（途中失敗で空ファイルを残さない）
fn write_file(path: &Path, content: &str) -> Result<(), PopularPagesError> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// 出力形式に従って書き出す
///
/// `Stdout` はフォールバックでありエラーではない。
pub fn write_pages(
    pages: &PopularPages,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<WriteOutcome, PopularPagesError> {
    info!("Writing response... format={}", format);

    let content = match format {
        OutputFormat::Json => pages.to_json_string()?,
        OutputFormat::Yaml => pages.to_yaml_string()?,
        OutputFormat::Stdout => {
            pages.dump(std::io::stdout().lock())?;
            return Ok(WriteOutcome::Stdout);
        }
    };

    let path = output_path.ok_or_else(|| {
        PopularPagesError::Config(format!("{} 出力には出力先ファイルが必要です", format))
    })?;
    write_file(path, &content)?;

    info!("Wrote {} page(s) to {}", pages.popular.len(), path.display());
    Ok(WriteOutcome::File(path.to_path_buf()))
}
