//! Concrete scenarios from the heap contract
//!
//! Each test walks one documented behavior end to end through the public API.

use tunable_fibonacci_heap::{CutThreshold, FibonacciHeap, HeapError};

#[test]
fn test_construction_threshold() {
    assert!(matches!(
        FibonacciHeap::<()>::with_threshold(0),
        Err(HeapError::ThresholdTooSmall(0))
    ));
    assert!(matches!(
        FibonacciHeap::<()>::with_threshold(1),
        Err(HeapError::ThresholdTooSmall(1))
    ));

    let heap = FibonacciHeap::<()>::with_threshold(2).unwrap();
    assert_eq!(heap.threshold(), CutThreshold::CLASSICAL);
    assert!(heap.is_empty());
    assert!(heap.find_min().is_none());
    assert_eq!(heap.len(), 0);
    assert_eq!(heap.num_trees(), 0);
    assert_eq!(heap.total_links(), 0);
    assert_eq!(heap.total_cuts(), 0);
}

#[test]
fn test_insert_find_delete_decrease() {
    let mut heap = FibonacciHeap::new();
    let five = heap.insert(5, "five").unwrap();
    let three = heap.insert(3, "three").unwrap();
    let eight = heap.insert(8, "eight").unwrap();
    let one = heap.insert(1, "one").unwrap();

    let min = heap.find_min().unwrap();
    assert_eq!(min.handle, one);
    assert_eq!((min.key, *min.payload), (1, "one"));

    heap.delete_min();
    assert!(!heap.contains(&one));
    assert_eq!(heap.len(), 3);
    assert_eq!(heap.find_min().unwrap().handle, three);
    heap.check_invariants().unwrap();

    // 8 - 6 = 2, below the current minimum 3
    heap.decrease_key(&eight, 6).unwrap();
    assert_eq!(heap.key(&eight), Some(2));
    let min = heap.find_min().unwrap();
    assert_eq!((min.handle, min.key), (eight, 2));
    assert_eq!(heap.get(&five), Some((5, &"five")));
    heap.check_invariants().unwrap();
}

#[test]
fn test_decrease_key_out_of_range_leaves_heap_unmodified() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (1..=9).map(|k| heap.insert(k * 10, k).unwrap()).collect();
    heap.delete_min();
    let before = heap.stats();
    let target = handles[5];
    let key = heap.key(&target).unwrap();

    for diff in [key, key + 1, 0, -5] {
        assert_eq!(
            heap.decrease_key(&target, diff),
            Err(HeapError::DiffOutOfRange { diff, key })
        );
    }
    assert_eq!(heap.stats(), before);
    assert_eq!(heap.key(&target), Some(key));
    heap.check_invariants().unwrap();
}

#[test]
fn test_meld_example() {
    let mut a = FibonacciHeap::new();
    a.insert(3, 'a').unwrap();
    a.insert(7, 'b').unwrap();

    let mut b = FibonacciHeap::new();
    b.insert(5, 'c').unwrap();
    b.insert(6, 'd').unwrap();
    b.insert(9, 'e').unwrap();

    a.meld(b);
    assert_eq!(a.len(), 5);
    assert_eq!(a.num_trees(), 5);
    assert_eq!(a.find_min().unwrap().key, 3);
    a.check_invariants().unwrap();

    let mut order = Vec::new();
    while let Some(extracted) = a.extract_min() {
        order.push(extracted.payload);
    }
    assert_eq!(order, vec!['a', 'c', 'd', 'b', 'e']);
}

#[test]
fn test_meld_accumulates_counters_and_keeps_handles() {
    let mut a = FibonacciHeap::new();
    for k in 1..=5 {
        a.insert(k, ()).unwrap();
    }
    a.delete_min();

    let mut b = FibonacciHeap::new();
    let handles: Vec<_> = (1..=9).map(|k| b.insert(k + 10, ()).unwrap()).collect();
    b.delete_min();
    b.decrease_key(&handles[8], 8).unwrap();

    let links = a.total_links() + b.total_links();
    let cuts = a.total_cuts() + b.total_cuts();
    a.meld(b);
    assert_eq!(a.total_links(), links);
    assert_eq!(a.total_cuts(), cuts);

    // Handles from the melded heap now address elements of `a`
    assert_eq!(a.key(&handles[8]), Some(11));
    a.decrease_key(&handles[7], 17).unwrap();
    assert_eq!(a.find_min().unwrap().handle, handles[7]);
    let returned = a.delete(&handles[4]);
    assert_eq!(a.total_links(), links + returned as u64);
    assert!(!a.contains(&handles[4]));
    a.check_invariants().unwrap();
}

#[test]
fn test_classical_threshold_cuts_on_second_loss() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (1..=9).map(|k| heap.insert(k, k).unwrap()).collect();
    // Remaining keys 2..=9 consolidate into one tree of rank 3 rooted at 2;
    // 6 is a non-root with children 7 and 8
    heap.delete_min();
    assert_eq!(heap.num_trees(), 1);

    let first = heap.decrease_key(&handles[6], 6).unwrap();
    assert_eq!(first, 1);
    assert_eq!(heap.num_trees(), 2);

    let second = heap.decrease_key(&handles[7], 7).unwrap();
    assert_eq!(second, 2);
    assert_eq!(heap.num_trees(), 4);
    assert_eq!(heap.total_cuts(), 3);
    heap.check_invariants().unwrap();
}

#[test]
fn test_threshold_three_waits_for_third_loss() {
    let mut heap = FibonacciHeap::with_threshold(3).unwrap();
    let handles: Vec<_> = (1..=17).map(|k| heap.insert(k, k).unwrap()).collect();
    // 2..=17 form one rank-4 tree; 10 is a non-root with children 11, 12 and 14
    heap.delete_min();
    assert_eq!(heap.num_trees(), 1);

    assert_eq!(heap.decrease_key(&handles[10], 10), Ok(1));
    assert_eq!(heap.decrease_key(&handles[11], 11), Ok(1));
    assert_eq!(heap.num_trees(), 3);

    // Third loss for 10 cuts it as well
    assert_eq!(heap.decrease_key(&handles[13], 13), Ok(2));
    assert_eq!(heap.num_trees(), 5);
    heap.check_invariants().unwrap();
}

#[test]
fn test_delete_discards_cut_count() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (1..=9).map(|k| heap.insert(k, k).unwrap()).collect();
    heap.delete_min();
    heap.decrease_key(&handles[6], 6).unwrap();

    let cuts_before = heap.total_cuts();
    let links_before = heap.total_links();
    let returned = heap.delete(&handles[7]);

    // Two cuts happened (8 and then its parent 6), only links are reported
    assert_eq!(heap.total_cuts(), cuts_before + 2);
    assert_eq!(heap.total_links(), links_before + returned as u64);
    assert_eq!(heap.len(), 7);
    heap.check_invariants().unwrap();
}

#[test]
fn test_delete_of_removed_handle_is_noop() {
    let mut heap = FibonacciHeap::new();
    let a = heap.insert(4, ()).unwrap();
    heap.insert(6, ()).unwrap();
    assert!(heap.remove(&a).is_some());

    let before = heap.stats();
    assert_eq!(heap.delete(&a), 0);
    assert!(heap.remove(&a).is_none());
    assert_eq!(heap.stats(), before);
}

#[test]
fn test_foreign_handle_is_rejected() {
    let mut a = FibonacciHeap::new();
    let mut b = FibonacciHeap::new();
    a.insert(10, ()).unwrap();
    let foreign = b.insert(10, ()).unwrap();

    assert!(!a.contains(&foreign));
    assert_eq!(a.decrease_key(&foreign, 1), Err(HeapError::InvalidHandle));
    assert_eq!(a.delete(&foreign), 0);
    assert_eq!(a.len(), 1);
}

#[test]
fn test_payload_access() {
    let mut heap = FibonacciHeap::new();
    let h = heap.insert(2, String::from("job")).unwrap();
    heap.get_mut(&h).unwrap().push_str("-42");
    let extracted = heap.extract_min().unwrap();
    assert_eq!(extracted.payload, "job-42");
    assert_eq!(extracted.links, 0);
}
