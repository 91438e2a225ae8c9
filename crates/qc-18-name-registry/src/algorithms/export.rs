//! # Export Writer
//!
//! Streams a JSON array of matching names to a sink. Unlike a scan, export
//! walks the whole index from the start and filters by regular expression
//! only. Elements are written as soon as they are assembled, so memory use
//! does not grow with the number of names.
//!
//! ## File Layout
//!
//! ```text
//! [
//! "d/abc",
//! "d/def"
//! ]
//! ```

use std::io::{self, Write};

use serde::Serialize;
use shared_types::OutPoint;
use tracing::debug;

use crate::domain::assembler::ResultAssembler;
use crate::domain::encoding::render_utf8;
use crate::domain::entities::{NameRecord, OutputRecord};
use crate::domain::errors::NameRegistryError;
use crate::domain::filters::NamePattern;
use crate::ports::outbound::{NameIndex, TransactionLookup, TxIndexStatus};

/// Incremental writer for a JSON array.
pub struct JsonArrayWriter<W: Write> {
    inner: W,
    wrote_element: bool,
}

impl<W: Write> JsonArrayWriter<W> {
    /// Write the opening bracket.
    pub fn begin(mut inner: W) -> io::Result<Self> {
        inner.write_all(b"[\n")?;
        Ok(Self {
            inner,
            wrote_element: false,
        })
    }

    pub fn write_element<T: Serialize + ?Sized>(&mut self, element: &T) -> io::Result<()> {
        if self.wrote_element {
            self.inner.write_all(b",\n")?;
        }
        serde_json::to_writer(&mut self.inner, element)?;
        self.wrote_element = true;
        Ok(())
    }

    /// Write the closing bracket and flush.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.write_all(b"\n]")?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    /// Flush whatever was written, leaving the array unterminated.
    pub fn abandon(mut self) {
        let _ = self.inner.flush();
    }
}

/// Collaborators and settings of one export run.
pub struct ExportRun<'a, I: ?Sized, L: ?Sized> {
    pub index: &'a I,
    pub lookup: &'a L,
    pub pattern: &'a NamePattern,
    pub assembler: &'a ResultAssembler<'a>,
    pub with_history: bool,
    pub max_count: Option<u64>,
}

impl<'a, I, L> ExportRun<'a, I, L>
where
    I: NameIndex + ?Sized,
    L: TransactionLookup + ?Sized,
{
    /// Write every match into `writer`, returning how many were written.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut JsonArrayWriter<W>,
    ) -> Result<u64, NameRegistryError> {
        let mut written = 0u64;
        if self.max_count == Some(0) {
            return Ok(written);
        }

        let mut cursor = self.index.iterate_names();
        while let Some((name, record)) = cursor.next_entry()? {
            let Some(text) = render_utf8(&name) else {
                continue;
            };
            if !self.pattern.matches_text(text) {
                continue;
            }

            if self.with_history {
                let element = self.joined_record(&name, &record)?;
                writer.write_element(&element)?;
            } else {
                writer.write_element(text)?;
            }

            written += 1;
            debug!("Handling {}: '{}'", written, text);

            if self.max_count.is_some_and(|max| written >= max) {
                break;
            }
        }

        Ok(written)
    }

    /// Current record with `last_updated`, followed by its history entries
    /// each carrying `time`.
    fn joined_record(
        &self,
        name: &[u8],
        record: &NameRecord,
    ) -> Result<OutputRecord, NameRegistryError> {
        let status = self.lookup.index_status();

        let mut history = Vec::new();
        for entry in self.index.get_history(name)? {
            let time = resolve_timestamp(self.lookup, status, &entry.update_outpoint)?;
            history.push(self.assembler.assemble_record(name, &entry).with_time(time));
        }

        let last_updated = resolve_timestamp(self.lookup, status, &record.update_outpoint)?;
        Ok(self
            .assembler
            .assemble_record(name, record)
            .with_last_updated(last_updated)
            .with_history(history))
    }
}

/// Block time of the transaction behind `outpoint`.
pub fn resolve_timestamp<L>(
    lookup: &L,
    status: TxIndexStatus,
    outpoint: &OutPoint,
) -> Result<u64, NameRegistryError>
where
    L: TransactionLookup + ?Sized,
{
    if let Some(time) = lookup.block_time(&outpoint.txid)? {
        return Ok(time);
    }

    let reason = match status {
        TxIndexStatus::Disabled => {
            "No such mempool transaction. Use -txindex or provide a block hash to enable blockchain transaction queries"
        }
        TxIndexStatus::Syncing => {
            "No such mempool transaction. Blockchain transactions are still in the process of being indexed"
        }
        TxIndexStatus::Ready => "No such mempool or blockchain transaction",
    };
    Err(NameRegistryError::ResolutionFailure(format!(
        "{}. Use gettransaction for wallet transactions.",
        reason
    )))
}

/// Summary line returned to the caller.
pub fn export_summary(count: u64, pattern: &NamePattern) -> String {
    format!("Found {} names with \"{}\" regexp", count, pattern.as_str())
}
