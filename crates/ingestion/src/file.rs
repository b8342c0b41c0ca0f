//! FileSource - streams records out of a file artifact.
//!
//! Format handling:
//! - `jsonl`: one JSON object per line
//! - `json`: array of objects, one element per line (pretty-printed arrays
//!   with `[` / `]` on their own lines)
//! - `csv`: header row, each data row converted to a flat JSON object
//! - `fixedwidth`: pipe- or tab-delimited header and rows, converted like csv
//!
//! The file is streamed line by line so memory stays bounded for arbitrary
//! input sizes; backpressure comes from `RecordQueue::put`.

use std::path::PathBuf;

use contracts::{InputConfig, InputFormat};
use serde_json::{Map, Value};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, instrument};

use crate::{IngestionError, RecordQueue, RecordSource};

/// Record source reading a single file artifact.
#[derive(Debug)]
pub struct FileSource {
    name: String,
    path: PathBuf,
    format: InputFormat,
}

impl FileSource {
    /// Create a source for the given path and format.
    pub fn new(path: impl Into<PathBuf>, format: InputFormat) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
            format,
        }
    }

    /// Create a source from the input section of the relay configuration.
    pub fn from_config(config: &InputConfig) -> Self {
        Self::new(config.file_path.clone(), config.format)
    }

    async fn open(&self) -> Result<Lines<BufReader<File>>, IngestionError> {
        let file = File::open(&self.path)
            .await
            .map_err(|e| IngestionError::source_open(&self.name, e))?;
        Ok(BufReader::new(file).lines())
    }
}

impl RecordSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "file_source_produce", skip(self, queue), fields(path = %self.name, format = ?self.format))]
    async fn produce(self, queue: RecordQueue) -> Result<u64, IngestionError> {
        let lines = self.open().await?;

        let count = match self.format {
            InputFormat::Json => read_json_lines(lines, &queue, &self.name, true).await?,
            InputFormat::Jsonl => read_json_lines(lines, &queue, &self.name, false).await?,
            InputFormat::Csv => read_delimited(lines, &queue, &self.name, CommaSplit).await?,
            InputFormat::FixedWidth => {
                read_delimited(lines, &queue, &self.name, ColumnSplit).await?
            }
        };

        debug!(records = count, "file exhausted");
        Ok(count)
    }
}

/// JSON object-per-line reader, shared by `json` and `jsonl`.
///
/// Skips blank lines and bare array brackets, strips trailing commas, and
/// keeps only lines that open a JSON object; everything else is noise from
/// pretty-printed arrays. With `require_closed` (the `json` array format)
/// the object must also close on the same line, so an object split across
/// lines is dropped instead of queued as a fragment.
async fn read_json_lines(
    mut lines: Lines<BufReader<File>>,
    queue: &RecordQueue,
    name: &str,
    require_closed: bool,
) -> Result<u64, IngestionError> {
    let mut count = 0u64;
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| IngestionError::source_read(name, e))?
    {
        let mut line = line.trim();
        if line.is_empty() || line == "[" || line == "]" {
            continue;
        }
        if let Some(stripped) = line.strip_suffix(',') {
            line = stripped.trim_end();
        }
        if line.starts_with('{') && (!require_closed || line.ends_with('}')) {
            queue.put(line.to_string()).await?;
            count += 1;
        }
    }
    Ok(count)
}

/// Row splitting strategy for the delimited formats.
trait RowSplit {
    fn split(&self, line: &str) -> Vec<String>;
}

/// Plain comma split; values are not quote-aware, matching the simple
/// delimited inputs this relay ingests.
struct CommaSplit;

impl RowSplit for CommaSplit {
    fn split(&self, line: &str) -> Vec<String> {
        line.split(',').map(|v| v.trim().to_string()).collect()
    }
}

/// Pipe split when the line carries pipes, tab split otherwise.
struct ColumnSplit;

impl RowSplit for ColumnSplit {
    fn split(&self, line: &str) -> Vec<String> {
        let delimiter = if line.contains('|') { '|' } else { '\t' };
        line.split(delimiter).map(|v| v.trim().to_string()).collect()
    }
}

/// Header-plus-rows reader: the first line names the columns, every later
/// line becomes one flat JSON object with string values.
async fn read_delimited<S: RowSplit>(
    mut lines: Lines<BufReader<File>>,
    queue: &RecordQueue,
    name: &str,
    splitter: S,
) -> Result<u64, IngestionError> {
    let Some(header_line) = lines
        .next_line()
        .await
        .map_err(|e| IngestionError::source_read(name, e))?
    else {
        return Ok(0);
    };
    let headers = splitter.split(&header_line);

    let mut count = 0u64;
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| IngestionError::source_read(name, e))?
    {
        if line.trim().is_empty() {
            continue;
        }
        let values = splitter.split(&line);
        queue.put(row_to_json(&headers, &values)).await?;
        count += 1;
    }
    Ok(count)
}

fn row_to_json(headers: &[String], values: &[String]) -> String {
    let mut object = Map::new();
    for (header, value) in headers.iter().zip(values.iter()) {
        object.insert(header.clone(), Value::String(value.clone()));
    }
    Value::Object(object).to_string()
}
