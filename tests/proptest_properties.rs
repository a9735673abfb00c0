use lockdiff::changelist::{ChangeRecord, RecordReader};
use lockdiff::diff::diff_all;
use lockdiff::restore::restore_all;
use proptest::prelude::*;

fn changes_for(old: &[u8], new: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    diff_all(&mut out, old, new).unwrap();
    out
}

fn records(changes: &[u8]) -> Vec<ChangeRecord> {
    let mut reader = RecordReader::new(changes);
    let mut out = Vec::new();
    while let Some(record) = reader.next_record().unwrap() {
        out.push(record);
    }
    out
}

proptest! {
    #[test]
    fn prop_diff_restore_roundtrip(
        old in proptest::collection::vec(any::<u8>(), 0..4096),
        new in proptest::collection::vec(any::<u8>(), 0..4096),
    ) {
        let changes = changes_for(&old, &new);
        let rebuilt = restore_all(&old, &changes).unwrap();
        prop_assert_eq!(rebuilt, new);
    }

    #[test]
    fn prop_identity_diff_is_empty(
        old in proptest::collection::vec(any::<u8>(), 0..4096),
    ) {
        let changes = changes_for(&old, &old);
        prop_assert!(changes.is_empty());
        let rebuilt = restore_all(&old, &changes).unwrap();
        prop_assert_eq!(rebuilt, old);
    }

    #[test]
    fn prop_offsets_non_decreasing(
        old in proptest::collection::vec(any::<u8>(), 0..2048),
        new in proptest::collection::vec(any::<u8>(), 0..2048),
    ) {
        let parsed = records(&changes_for(&old, &new));
        for pair in parsed.windows(2) {
            prop_assert!(pair[0].offset() <= pair[1].offset());
        }
    }

    #[test]
    fn prop_record_count_bounded_by_longer_input(
        old in proptest::collection::vec(any::<u8>(), 0..2048),
        new in proptest::collection::vec(any::<u8>(), 0..2048),
    ) {
        let parsed = records(&changes_for(&old, &new));
        prop_assert!(parsed.len() <= old.len().max(new.len()));
    }

    #[test]
    fn prop_change_list_text_reparses(
        old in proptest::collection::vec(any::<u8>(), 0..1024),
        new in proptest::collection::vec(any::<u8>(), 0..1024),
    ) {
        // Every emitted line must survive a parse back into the same record.
        let changes = changes_for(&old, &new);
        let parsed = records(&changes);
        let mut rewritten = Vec::new();
        {
            let mut writer = lockdiff::changelist::RecordWriter::new(&mut rewritten);
            for record in &parsed {
                writer.write_record(record).unwrap();
            }
        }
        prop_assert_eq!(rewritten, changes);
    }
}
