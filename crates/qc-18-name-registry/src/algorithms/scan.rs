//! # Scan / Pagination Engine
//!
//! Seek-and-iterate over the name index. Filters run cheapest first:
//! height window, then byte prefix, then regular expression.

use crate::domain::assembler::ResultAssembler;
use crate::domain::entities::{NameRecord, OutputRecord};
use crate::domain::errors::NameRegistryError;
use crate::domain::filters::{HeightWindow, NamePattern};
use crate::domain::options::QueryOptions;
use crate::ports::outbound::NameIndex;

/// Per-request filter set for a scan.
#[derive(Debug, Clone, Copy)]
pub struct ScanFilter<'a> {
    window: HeightWindow,
    prefix: &'a [u8],
    pattern: Option<&'a NamePattern>,
}

impl<'a> ScanFilter<'a> {
    pub fn new(options: &'a QueryOptions, current_height: u64) -> Self {
        Self {
            window: HeightWindow::new(current_height, options.min_conf(), options.max_conf()),
            prefix: options.prefix(),
            pattern: options.pattern(),
        }
    }

    pub fn accepts(&self, name: &[u8], record: &NameRecord) -> bool {
        if !self.window.contains(record.height) {
            return false;
        }
        if !name.starts_with(self.prefix) {
            return false;
        }
        match self.pattern {
            Some(pattern) => pattern.matches_name(name),
            None => true,
        }
    }
}

/// Collect up to `count` matching names at or after `start`.
///
/// A zero budget returns without opening a cursor.
pub fn scan_names<I>(
    index: &I,
    start: &[u8],
    count: u64,
    filter: &ScanFilter<'_>,
    assembler: &ResultAssembler<'_>,
) -> Result<Vec<OutputRecord>, NameRegistryError>
where
    I: NameIndex + ?Sized,
{
    let mut results = Vec::new();
    if count == 0 {
        return Ok(results);
    }

    let mut cursor = index.iterate_names();
    cursor.seek(start);

    let mut remaining = count;
    while remaining > 0 {
        let Some((name, record)) = cursor.next_entry()? else {
            break;
        };
        if !filter.accepts(&name, &record) {
            continue;
        }
        results.push(assembler.assemble_record(&name, &record));
        remaining -= 1;
    }

    Ok(results)
}
