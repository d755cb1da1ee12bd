/// PROPERTY-BASED TESTS: ReplicatedList delta invariants
///
/// Uses proptest to verify list replication holds across random edits.
///
/// Key invariants:
/// 1. A mirror that starts equal ends equal after applying the delta
/// 2. A Full event converges any mirror, and applying it twice changes nothing
/// 3. Forwarded events reproduce the same list on a further mirror
use proptest::prelude::*;
use snapnet_shared::ReplicatedList;

#[derive(Clone, Debug)]
enum Edit {
    Add(u16),
    Insert(usize, u16),
    Remove(u16),
    RemoveAt(usize),
    Set(usize, u16),
    Clear,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => any::<u16>().prop_map(Edit::Add),
        3 => (any::<usize>(), any::<u16>()).prop_map(|(index, value)| Edit::Insert(index, value)),
        2 => (0u16..8).prop_map(Edit::Remove),
        2 => any::<usize>().prop_map(Edit::RemoveAt),
        2 => (any::<usize>(), any::<u16>()).prop_map(|(index, value)| Edit::Set(index, value)),
        1 => Just(Edit::Clear),
    ]
}

// Indexes are reduced into range so every edit is valid
fn apply(list: &mut ReplicatedList<u16>, edit: &Edit) {
    let len = list.len();
    match edit {
        Edit::Add(value) => list.add(*value),
        Edit::Insert(index, value) => list.insert(index % (len + 1), *value).unwrap(),
        Edit::Remove(value) => {
            list.remove(value);
        }
        Edit::RemoveAt(index) if len > 0 => {
            list.remove_at(index % len).unwrap();
        }
        Edit::Set(index, value) if len > 0 => {
            list.set(index % len, *value).unwrap();
        }
        Edit::RemoveAt(_) | Edit::Set(..) => {}
        Edit::Clear => list.clear(),
    }
}

proptest! {
    #[test]
    fn prop_delta_reproduces_edits(
        initial in prop::collection::vec(0u16..8, 0..10),
        edits in prop::collection::vec(edit_strategy(), 0..40),
    ) {
        let mut source = ReplicatedList::from_values(initial.clone());
        let mut mirror = ReplicatedList::from_values(initial);
        for edit in &edits {
            apply(&mut source, edit);
        }

        let delta = source.encode_delta().unwrap();
        mirror.decode_delta(&delta, false).unwrap();

        prop_assert_eq!(mirror.as_slice(), source.as_slice());
        prop_assert!(!mirror.is_dirty());
    }

    #[test]
    fn prop_full_event_converges_and_is_idempotent(
        contents in prop::collection::vec(any::<u16>(), 0..20),
        stale in prop::collection::vec(any::<u16>(), 0..20),
    ) {
        let mut source = ReplicatedList::from_values(contents);
        source.set_dirty();
        let delta = source.encode_delta().unwrap();

        let mut mirror = ReplicatedList::from_values(stale);
        mirror.decode_delta(&delta, false).unwrap();
        prop_assert_eq!(mirror.as_slice(), source.as_slice());

        mirror.decode_delta(&delta, false).unwrap();
        prop_assert_eq!(mirror.as_slice(), source.as_slice());
    }

    #[test]
    fn prop_forwarded_events_match(
        initial in prop::collection::vec(0u16..8, 0..10),
        edits in prop::collection::vec(edit_strategy(), 1..30),
    ) {
        let mut source = ReplicatedList::from_values(initial.clone());
        let mut relay = ReplicatedList::from_values(initial.clone());
        let mut leaf = ReplicatedList::from_values(initial);
        for edit in &edits {
            apply(&mut source, edit);
        }

        relay.decode_delta(&source.encode_delta().unwrap(), true).unwrap();
        leaf.decode_delta(&relay.encode_delta().unwrap(), false).unwrap();

        prop_assert_eq!(leaf.as_slice(), source.as_slice());
    }
}
