use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use tracing::info;

use super::report::{ParseResult, parse};

/// Basic facts about a loaded report file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size_bytes: u64,
    pub records: usize,
}

pub struct ReportLoader {
    info: FileInfo,
    result: ParseResult,
}

impl ReportLoader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        let size_bytes = file.metadata().context("Failed to read file metadata")?.len();

        // Empty files cannot be mapped on every platform.
        let text = if size_bytes == 0 {
            String::new()
        } else {
            // Safety: the file is only read here and is not expected to change
            // while the report is being decoded.
            let mmap = unsafe { Mmap::map(&file).context("Failed to memory map file")? };
            String::from_utf8_lossy(&mmap).into_owned()
        };

        let result = parse(&text).with_context(|| format!("Failed to process {:?}", path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let info = FileInfo {
            name,
            size_bytes,
            records: result.records.len(),
        };
        info!(file = %info.name, bytes = info.size_bytes, records = info.records, "report loaded");

        Ok(Self { info, result })
    }

    pub fn file_info(&self) -> &FileInfo {
        &self.info
    }

    pub fn result(&self) -> &ParseResult {
        &self.result
    }
}
