//! Malformed and malicious announcements against the full service.
//!
//! Structural garbage must be rejected at decode time without touching any
//! pool; consistency faults that only show up after assembly must fail
//! finalization without the service accepting a bad block.

#[cfg(test)]
mod tests {
    use crate::fixtures::{build_block, make_transactions, test_rng, StaticMempool};
    use cb_reconstruction::{
        calculate_short_id, BlockReconstructionApi, BlockReconstructionService, CompactBlock,
        PrefilledTx, ReconstructionConfig, ReconstructionError, ShortIdKey,
    };
    use shared_types::{merkle_root, Block, BlockHeader, Hash, Transaction};
    use std::sync::Arc;

    fn service_with(pool: Vec<Arc<Transaction>>) -> BlockReconstructionService<StaticMempool> {
        BlockReconstructionService::new(
            ReconstructionConfig::default(),
            Arc::new(StaticMempool::new(pool)),
        )
    }

    #[test]
    fn test_duplicate_short_ids_rejected_structurally() {
        let mut rng = test_rng(1);
        let txs = make_transactions(6, &mut rng);
        let block = build_block(&txs);
        let service = service_with(txs);

        let mut compact = CompactBlock::from_block(&block, 5, &[]).unwrap();
        compact.short_ids[4] = compact.short_ids[1];

        let err = service.begin_reconstruction(compact).unwrap_err();
        assert!(matches!(err, ReconstructionError::DuplicateShortId { .. }));
        assert!(err.is_structural());
        assert_eq!(service.metrics().blocks_attempted, 0);
    }

    #[test]
    fn test_oversized_announcement_rejected() {
        let mut rng = test_rng(2);
        let block = build_block(&make_transactions(32, &mut rng));
        let config = ReconstructionConfig {
            max_block_slots: 16,
            ..Default::default()
        };
        let service = BlockReconstructionService::new(
            config,
            Arc::new(StaticMempool::new(vec![])),
        );

        let compact = CompactBlock::from_block(&block, 5, &[]).unwrap();
        let err = service.begin_reconstruction(compact).unwrap_err();
        assert!(matches!(
            err,
            ReconstructionError::TooManySlots {
                declared: 33,
                max: 16,
            }
        ));
    }

    #[test]
    fn test_prefilled_index_gaming_rejected() {
        let mut rng = test_rng(3);
        let txs = make_transactions(3, &mut rng);
        let block = build_block(&txs);
        let service = service_with(txs);

        let mut compact = CompactBlock::from_block(&block, 5, &[2]).unwrap();
        compact.prefilled[1].index = 0;

        let err = service.begin_reconstruction(compact).unwrap_err();
        assert!(matches!(
            err,
            ReconstructionError::NonIncreasingPrefilled { index: 0 }
        ));
    }

    #[test]
    fn test_wrong_transaction_with_right_count_fails_merkle() {
        let mut rng = test_rng(4);
        let in_block = make_transactions(8, &mut rng);
        let decoys = make_transactions(8, &mut rng);
        let block = build_block(&in_block);
        let service = service_with(vec![]);

        let compact = CompactBlock::from_block(&block, 5, &[]).unwrap();
        let (state, missing) = service.begin_reconstruction(compact).unwrap();
        assert_eq!(missing.len(), 8);

        // Right count, wrong bodies.
        let err = service.complete(state, decoys).unwrap_err();
        assert!(matches!(err, ReconstructionError::MerkleMismatch { .. }));
        assert!(err.is_consensus_adjacent());
        assert_eq!(service.metrics().finalize_failures, 1);
    }

    #[test]
    fn test_reordered_supplied_transactions_fail_merkle() {
        let mut rng = test_rng(5);
        let in_block = make_transactions(4, &mut rng);
        let block = build_block(&in_block);
        let service = service_with(vec![]);

        let compact = CompactBlock::from_block(&block, 5, &[]).unwrap();
        let (state, missing) = service.begin_reconstruction(compact).unwrap();

        let mut supplied: Vec<_> = missing
            .iter()
            .map(|&i| Arc::new(block.transactions[usize::from(i)].clone()))
            .collect();
        supplied.swap(0, 3);

        let err = service.complete(state, supplied).unwrap_err();
        assert!(matches!(err, ReconstructionError::MerkleMismatch { .. }));
    }

    #[test]
    fn test_truncated_supplied_list_rejected() {
        let mut rng = test_rng(6);
        let in_block = make_transactions(5, &mut rng);
        let block = build_block(&in_block);
        let service = service_with(vec![]);

        let compact = CompactBlock::from_block(&block, 5, &[]).unwrap();
        let (state, missing) = service.begin_reconstruction(compact).unwrap();
        assert_eq!(missing.len(), 5);

        let supplied: Vec<_> = missing
            .iter()
            .take(3)
            .map(|&i| Arc::new(block.transactions[usize::from(i)].clone()))
            .collect();

        let err = service.complete(state, supplied).unwrap_err();
        assert_eq!(
            err,
            ReconstructionError::WrongTransactionCount {
                supplied: 3,
                expected: 5,
            }
        );
        // Count mismatches are a fetch protocol fault, not a bad block.
        assert_eq!(service.metrics().finalize_failures, 0);
    }

    #[test]
    fn test_duplicate_across_resolved_and_supplied_slots() {
        // Malleated block repeating transaction A at slots 1 and 3. The
        // announcement is hand-built so slot 3 carries a short ID that
        // matches nothing locally: the short-ID list has no verbatim
        // duplicate, slot 1 resolves A from the pool, slot 3 comes back from
        // the fetch as A again. Only the post-assembly scan can catch it.
        let mut rng = test_rng(7);
        let txs = make_transactions(2, &mut rng);
        let (a, b) = (Arc::clone(&txs[0]), Arc::clone(&txs[1]));

        let base = build_block(&txs);
        let coinbase = base.transactions[0].clone();
        let transactions = vec![
            coinbase.clone(),
            a.as_ref().clone(),
            b.as_ref().clone(),
            a.as_ref().clone(),
        ];
        let txids: Vec<Hash> = transactions.iter().map(Transaction::txid).collect();
        let block = Block {
            header: BlockHeader {
                merkle_root: merkle_root(&txids),
                ..base.header
            },
            transactions,
        };

        let nonce = 5;
        let key = ShortIdKey::derive(&block.header, nonce);
        let compact = CompactBlock {
            header: block.header,
            nonce,
            short_ids: vec![
                calculate_short_id(&key, &a.wtxid()),
                calculate_short_id(&key, &b.wtxid()),
                [0xEE; 6],
            ],
            prefilled: vec![PrefilledTx {
                index: 0,
                tx: coinbase,
            }],
        };

        let service = service_with(vec![Arc::clone(&a), b]);
        let (state, missing) = service.begin_reconstruction(compact).unwrap();
        assert_eq!(missing, vec![3]);

        let err = service.complete(state, vec![a]).unwrap_err();
        assert_eq!(err, ReconstructionError::DuplicateTransaction { slot: 3 });
        assert!(err.is_consensus_adjacent());
    }

    #[test]
    fn test_coinbase_in_later_slot_rejected() {
        let mut rng = test_rng(8);
        let txs = make_transactions(2, &mut rng);
        let base = build_block(&txs);

        // Smuggle a second coinbase into slot 2, with a consistent merkle
        // root so only the shape check can reject it.
        let mut transactions = base.transactions.clone();
        transactions.insert(2, transactions[0].clone());
        let txids: Vec<Hash> = transactions.iter().map(Transaction::txid).collect();
        let block = Block {
            header: BlockHeader {
                merkle_root: merkle_root(&txids),
                ..base.header
            },
            transactions,
        };

        let service = service_with(txs);
        let compact = CompactBlock::from_block(&block, 5, &[2]).unwrap();
        let (state, missing) = service.begin_reconstruction(compact).unwrap();
        assert!(missing.is_empty());

        let err = service.complete(state, vec![]).unwrap_err();
        assert_eq!(err, ReconstructionError::BadCoinbase);
    }
}
