//! Name Registry Service
//!
//! Main service implementing `NameRegistryApi`. Every operation runs
//! synchronously to completion:
//! 1. Refuse if the chain is still syncing (not for `pending`)
//! 2. Parse and validate the options bag (regex compiled here, before any lock)
//! 3. Take the read snapshot in the global lock order
//! 4. Run the algorithm and assemble results

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, instrument, warn};

use crate::algorithms::{
    export_summary, scan_names, scan_pending, ExportRun, JsonArrayWriter, ScanFilter,
};
use crate::application::locks::{IndexSnapshot, PoolSnapshot};
use crate::config::NameRegistryConfig;
use crate::domain::assembler::ResultAssembler;
use crate::domain::encoding::name_for_message;
use crate::domain::entities::{ExpirationContext, OutputRecord};
use crate::domain::errors::NameRegistryError;
use crate::domain::filters::NamePattern;
use crate::domain::options::{OptionsBag, OptionsParser, QueryOperation, QueryOptions};
use crate::ports::inbound::NameRegistryApi;
use crate::ports::outbound::{
    ChainStateProvider, NameIndex, NoWallet, PendingPool, TransactionLookup, WalletOwnership,
};

/// Name Registry Service
///
/// Reads the name index, pending pool and optional wallet through shared
/// read locks. Never takes a write lock.
pub struct NameRegistryService<I, P, W = NoWallet> {
    config: NameRegistryConfig,
    index: Arc<RwLock<I>>,
    pool: Arc<RwLock<P>>,
    wallet: Option<Arc<RwLock<W>>>,
    chain: Arc<dyn ChainStateProvider>,
    transactions: Arc<dyn TransactionLookup>,
}

impl<I, P> NameRegistryService<I, P, NoWallet>
where
    I: NameIndex,
    P: PendingPool,
{
    /// Create a service without a wallet.
    pub fn new(
        config: NameRegistryConfig,
        index: Arc<RwLock<I>>,
        pool: Arc<RwLock<P>>,
        chain: Arc<dyn ChainStateProvider>,
        transactions: Arc<dyn TransactionLookup>,
    ) -> Self {
        Self {
            config,
            index,
            pool,
            wallet: None,
            chain,
            transactions,
        }
    }
}

impl<I, P, W> NameRegistryService<I, P, W>
where
    I: NameIndex,
    P: PendingPool,
    W: WalletOwnership,
{
    /// Attach a wallet; results then carry `ismine`.
    pub fn with_wallet<V: WalletOwnership>(
        self,
        wallet: Arc<RwLock<V>>,
    ) -> NameRegistryService<I, P, V> {
        NameRegistryService {
            config: self.config,
            index: self.index,
            pool: self.pool,
            wallet: Some(wallet),
            chain: self.chain,
            transactions: self.transactions,
        }
    }

    fn parse_options(
        &self,
        operation: QueryOperation,
        bag: &OptionsBag,
    ) -> Result<QueryOptions, NameRegistryError> {
        OptionsParser::new(&self.config).parse(operation, bag)
    }

    fn ensure_synced(&self) -> Result<(), NameRegistryError> {
        if self.config.reject_during_sync && self.chain.node_state().is_syncing() {
            warn!("Rejecting name query: chain is syncing");
            return Err(NameRegistryError::SyncInProgress);
        }
        Ok(())
    }

    /// Tip and expiration depth sampled once for the whole request.
    fn expiration_context(&self) -> ExpirationContext {
        let current_height = self.chain.current_height();
        ExpirationContext {
            current_height,
            expiration_depth: self.chain.expiration_depth(current_height),
        }
    }

    fn snapshot(&self) -> IndexSnapshot<'_, I, W> {
        IndexSnapshot::acquire(&self.index, self.wallet.as_deref())
    }
}

impl<I, P, W> NameRegistryApi for NameRegistryService<I, P, W>
where
    I: NameIndex,
    P: PendingPool,
    W: WalletOwnership,
{
    #[instrument(skip(self, options))]
    fn lookup(&self, name: &str, options: &OptionsBag) -> Result<OutputRecord, NameRegistryError> {
        self.ensure_synced()?;
        let opts = self.parse_options(QueryOperation::Lookup, options)?;
        let name = opts.decode_name(name)?;

        let snapshot = self.snapshot();
        let record = snapshot
            .index()
            .get_name(&name)?
            .ok_or_else(|| NameRegistryError::NotFound {
                name: name_for_message(&name),
            })?;

        let assembler = ResultAssembler::new(&opts)
            .with_expiration(self.expiration_context())
            .with_wallet(snapshot.wallet());
        Ok(assembler.assemble_record(&name, &record))
    }

    #[instrument(skip(self, options))]
    fn history(
        &self,
        name: &str,
        options: &OptionsBag,
    ) -> Result<Vec<OutputRecord>, NameRegistryError> {
        self.ensure_synced()?;
        let opts = self.parse_options(QueryOperation::History, options)?;
        let name = opts.decode_name(name)?;

        let snapshot = self.snapshot();
        let index = snapshot.index();
        if !index.history_enabled() {
            return Err(NameRegistryError::history_disabled());
        }

        let current = index
            .get_name(&name)?
            .ok_or_else(|| NameRegistryError::NotFound {
                name: name_for_message(&name),
            })?;

        let assembler = ResultAssembler::new(&opts)
            .with_expiration(self.expiration_context())
            .with_wallet(snapshot.wallet());

        let mut results: Vec<OutputRecord> = index
            .get_history(&name)?
            .iter()
            .map(|entry| assembler.assemble_record(&name, entry))
            .collect();
        results.push(assembler.assemble_record(&name, &current));
        Ok(results)
    }

    #[instrument(skip(self, options))]
    fn scan(
        &self,
        start: Option<&str>,
        count: Option<i64>,
        options: &OptionsBag,
    ) -> Result<Vec<OutputRecord>, NameRegistryError> {
        self.ensure_synced()?;
        let opts = self.parse_options(QueryOperation::Scan, options)?;
        let start = match start {
            Some(text) => opts.decode_name(text)?,
            None => Vec::new(),
        };

        let count = count.unwrap_or(i64::from(self.config.default_scan_count));
        if count <= 0 {
            return Ok(Vec::new());
        }

        let snapshot = self.snapshot();
        let ctx = self.expiration_context();
        let filter = ScanFilter::new(&opts, ctx.current_height);
        let assembler = ResultAssembler::new(&opts)
            .with_expiration(ctx)
            .with_wallet(snapshot.wallet());

        let results = scan_names(snapshot.index(), &start, count as u64, &filter, &assembler)?;
        info!("Name scan returned {} of at most {} names", results.len(), count);
        Ok(results)
    }

    #[instrument(skip(self, options))]
    fn pending(
        &self,
        name: Option<&str>,
        options: &OptionsBag,
    ) -> Result<Vec<OutputRecord>, NameRegistryError> {
        let opts = self.parse_options(QueryOperation::Pending, options)?;
        let name = name.map(|text| opts.decode_name(text)).transpose()?;

        let snapshot = PoolSnapshot::acquire(self.wallet.as_deref(), &self.pool);
        let assembler = ResultAssembler::new(&opts).with_wallet(snapshot.wallet());
        Ok(scan_pending(snapshot.pool(), name.as_deref(), &assembler))
    }

    #[instrument(skip(self, options))]
    fn export(
        &self,
        pattern: &str,
        destination: &Path,
        options: &OptionsBag,
    ) -> Result<String, NameRegistryError> {
        self.ensure_synced()?;
        let opts = self.parse_options(QueryOperation::Export, options)?;
        let pattern = NamePattern::compile(pattern)?;

        let snapshot = self.snapshot();
        if opts.with_history() && !snapshot.index().history_enabled() {
            return Err(NameRegistryError::history_disabled());
        }

        let file = File::create(destination)?;
        let mut writer = JsonArrayWriter::begin(BufWriter::new(file))?;

        let assembler = ResultAssembler::new(&opts)
            .with_expiration(self.expiration_context())
            .with_wallet(snapshot.wallet());
        let run = ExportRun {
            index: snapshot.index(),
            lookup: &*self.transactions,
            pattern: &pattern,
            assembler: &assembler,
            with_history: opts.with_history(),
            max_count: opts.max_count(),
        };

        let count = match run.write_to(&mut writer) {
            Ok(count) => count,
            Err(err) => {
                writer.abandon();
                return Err(err);
            }
        };
        writer.finish()?;

        info!(
            "Found {} names with {} regexp, written to {}",
            count,
            pattern.as_str(),
            destination.display()
        );
        Ok(export_summary(count, &pattern))
    }

    #[instrument(skip(self))]
    fn check_index_consistency(&self) -> Result<bool, NameRegistryError> {
        let index = self.index.read();
        index.flush()?;
        let consistent = index.validate_name_db();
        if !consistent {
            warn!("Name database failed validation");
        }
        Ok(consistent)
    }
}
