//! Shared helpers for integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use markup_validator::error::ProcessorResult;
use markup_validator::{Processor, ProcessorCatalog, Violation};

/// Processor that flags every line containing `needle` and counts its runs
#[derive(Default)]
pub struct NeedleProcessor {
    pub needle: String,
    pub runs: Arc<AtomicUsize>,
}

impl NeedleProcessor {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_string(),
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Processor for NeedleProcessor {
    fn execute(&self, markup: &str) -> ProcessorResult<Vec<Violation>> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(markup
            .lines()
            .enumerate()
            .filter(|(_, line)| line.contains(&self.needle))
            .map(|(index, line)| {
                let column = line.find(&self.needle).unwrap_or(0) as u32 + 1;
                Violation::new(format!("unexpected {}", self.needle)).at(index as u32 + 1, column)
            })
            .collect())
    }
}

/// Catalog with `tidy` flagging `<font>` and `w3c` flagging `<blink>`
pub fn test_catalog() -> ProcessorCatalog {
    let mut catalog = ProcessorCatalog::new();
    catalog.tag("tidy", NeedleProcessor::new("<font>")).unwrap();
    catalog.tag("w3c", NeedleProcessor::new("<blink>")).unwrap();
    catalog
}

/// Write `content` to `dir/name` and return the path
pub fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
