#![no_main]

use libfuzzer_sys::fuzz_target;

use pqueue::PriorityQueue;
use pqueue::StableFlatQueue;
use pqueue::StableNodeQueue;

// Each pair of bytes is one operation: the low bits of the first byte pick
// it, the second is its argument.
fuzz_target!(|data: &[u8]| {
    let mut node = StableNodeQueue::<u8, u8>::new();
    let mut flat = StableFlatQueue::<u8, u8>::new();

    for op in data.chunks_exact(2) {
        let (code, arg) = (op[0], op[1]);
        match code % 4 {
            0 | 1 => {
                assert!(node.enqueue(arg, code >> 2));
                assert!(flat.enqueue(arg, code >> 2));
            }
            2 => assert_eq!(node.pop(), flat.pop()),
            _ => assert_eq!(node.remove(&arg), flat.remove(&arg)),
        }
        assert_eq!(node.len(), flat.len());
        assert_eq!(node.peek_priority(), flat.peek_priority());
        assert!(node.is_heap());
        assert!(flat.is_heap());
    }

    assert_eq!(node.into_sorted_vec(), flat.into_sorted_vec());
});
