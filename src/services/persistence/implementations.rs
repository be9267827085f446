// サマリー永続化の具象実装

use crate::core::{PipelineError, PipelineResult, PipelineSummary};
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// サマリーを整形済みJSONとして書き出す
pub fn write_summary_json(path: impl AsRef<Path>, summary: &PipelineSummary) -> PipelineResult<()> {
    let path = path.as_ref();

    let result = (|| -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, summary)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    })();

    result.map_err(PipelineError::persistence)
}
