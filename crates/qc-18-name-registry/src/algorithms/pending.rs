//! # Pending Scanner
//!
//! Full scan of the unconfirmed pool for name registrations and updates.
//! Bare reservations carry no visible name and are ignored. No pagination
//! and no height filtering.

use shared_types::{Hash, OutPoint};
use tracing::warn;

use crate::domain::assembler::ResultAssembler;
use crate::domain::entities::OutputRecord;
use crate::ports::outbound::PendingPool;

/// Every pending name operation, optionally restricted to one exact name.
pub fn scan_pending<P>(
    pool: &P,
    name_filter: Option<&[u8]>,
    assembler: &ResultAssembler<'_>,
) -> Vec<OutputRecord>
where
    P: PendingPool + ?Sized,
{
    let mut results = Vec::new();

    for tx in pool.transactions() {
        if !tx.is_name_transaction() {
            continue;
        }
        for (vout, output) in tx.outputs.iter().enumerate() {
            let Some(op) = &output.name_op else {
                continue;
            };
            let Some((name, value)) = op.name_and_value() else {
                continue;
            };
            if name_filter.is_some_and(|wanted| wanted != name) {
                continue;
            }
            let Some(outpoint) = output_outpoint(tx.txid, vout) else {
                warn!(
                    "Skipping pending output {} of 0x{}: index out of range",
                    vout,
                    hex::encode(tx.txid)
                );
                continue;
            };
            results.push(
                assembler
                    .assemble(name, value, &outpoint, &output.address)
                    .with_operation(op.label()),
            );
        }
    }

    results
}

fn output_outpoint(txid: Hash, index: usize) -> Option<OutPoint> {
    u32::try_from(index).ok().map(|vout| OutPoint::new(txid, vout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPendingPool;
    use crate::config::NameRegistryConfig;
    use crate::domain::options::QueryOptions;
    use shared_types::{NameOperation, NameTransaction, NameTxOutput, Script};

    fn output(name_op: Option<NameOperation>) -> NameTxOutput {
        NameTxOutput {
            value: 1_000_000,
            address: Script::pay_to_key_hash([4; 20]),
            name_op,
        }
    }

    fn pool() -> InMemoryPendingPool {
        let mut pool = InMemoryPendingPool::default();
        pool.add(NameTransaction {
            txid: [1; 32],
            outputs: vec![
                output(None),
                output(Some(NameOperation::FirstUpdate {
                    name: b"d/new".to_vec(),
                    value: b"hello".to_vec(),
                    rand: vec![0; 20],
                })),
            ],
        });
        pool.add(NameTransaction {
            txid: [2; 32],
            outputs: vec![output(Some(NameOperation::NameNew { hash: vec![9; 20] }))],
        });
        pool.add(NameTransaction {
            txid: [3; 32],
            outputs: vec![output(Some(NameOperation::Update {
                name: b"d/old".to_vec(),
                value: b"world".to_vec(),
            }))],
        });
        pool
    }

    #[test]
    fn test_reports_registrations_and_updates() {
        let opts = QueryOptions::defaults(&NameRegistryConfig::default());
        let assembler = ResultAssembler::new(&opts);
        let mut out = scan_pending(&pool(), None, &assembler);
        out.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name.as_deref(), Some("d/new"));
        assert_eq!(out[0].op.as_deref(), Some("name_firstupdate"));
        assert_eq!(out[0].vout, 1);
        assert_eq!(out[0].height, None);
        assert_eq!(out[1].name.as_deref(), Some("d/old"));
        assert_eq!(out[1].op.as_deref(), Some("name_update"));
    }

    #[test]
    fn test_name_filter_is_exact() {
        let opts = QueryOptions::defaults(&NameRegistryConfig::default());
        let assembler = ResultAssembler::new(&opts);
        let out = scan_pending(&pool(), Some(b"d/old"), &assembler);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value.as_deref(), Some("world"));

        assert!(scan_pending(&pool(), Some(b"d/ol"), &assembler).is_empty());
    }

    #[test]
    fn test_output_index_must_fit_vout() {
        assert_eq!(output_outpoint([5; 32], 7), Some(OutPoint::new([5; 32], 7)));
        assert_eq!(
            output_outpoint([5; 32], u32::MAX as usize),
            Some(OutPoint::new([5; 32], u32::MAX))
        );
        if let Ok(too_big) = usize::try_from(u64::from(u32::MAX) + 1) {
            assert_eq!(output_outpoint([5; 32], too_big), None);
        }
    }
}
