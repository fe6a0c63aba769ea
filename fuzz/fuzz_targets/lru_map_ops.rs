#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use lru_map::LruMap;

/// Reference order, front = MRU. Values are checked through `peek`.
fn promote(order: &mut VecDeque<u8>, key: u8) {
    if let Some(pos) = order.iter().position(|&k| k == key) {
        order.remove(pos);
    }
    order.push_front(key);
}

fn forget(order: &mut VecDeque<u8>, key: u8) {
    if let Some(pos) = order.iter().position(|&k| k == key) {
        order.remove(pos);
    }
}

fn trim(order: &mut VecDeque<u8>, bound: Option<usize>) -> Vec<u8> {
    let mut evicted = Vec::new();
    if let Some(max) = bound {
        while order.len() > max {
            if let Some(key) = order.pop_back() {
                evicted.push(key);
            }
        }
    }
    evicted
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 65_536 {
        return;
    }

    let (bound, ops) = match data.split_first() {
        Some((&0, rest)) => (None, rest),
        Some((&raw, rest)) => (Some(usize::from(raw % 32) + 1), rest),
        None => return,
    };

    let mut map: LruMap<u8, u16> = match bound {
        Some(max) => LruMap::new(max).expect("positive bound"),
        None => LruMap::unbounded(),
    };
    let mut bound = bound;
    let mut order: VecDeque<u8> = VecDeque::new();

    for chunk in ops.chunks(3) {
        let [op_tag, key_raw, value_raw] = match chunk {
            [a, b, c] => [*a, *b, *c],
            _ => break,
        };

        let key = key_raw % 48;
        let value = u16::from_le_bytes([key_raw, value_raw]);

        match op_tag % 8 {
            0 | 1 => {
                let was_present = map.contains_key(&key);
                let evicted = map.set(key, value);
                if !was_present {
                    let expected = trim_for_insert(&mut order, bound);
                    assert_eq!(evicted.map(|(k, _)| k), expected);
                } else {
                    assert!(evicted.is_none());
                }
                promote(&mut order, key);
                assert_eq!(map.peek(&key), Some(&value));
            }
            2 => {
                let got = map.get(&key).is_some();
                assert_eq!(got, order.contains(&key));
                if got {
                    promote(&mut order, key);
                }
            }
            3 => {
                let was_present = map.contains_key(&key);
                let mut called = false;
                map.put_if_absent(key, || {
                    called = true;
                    value
                });
                assert_eq!(called, !was_present);
                if !was_present {
                    trim_for_insert(&mut order, bound);
                }
                promote(&mut order, key);
            }
            4 => {
                let before: Vec<u8> = map.keys().copied().collect();
                let result = map.try_put_if_absent(key, || Err::<u16, ()>(()));
                if order.contains(&key) {
                    assert!(result.is_ok());
                    promote(&mut order, key);
                } else {
                    assert!(result.is_err());
                    assert_eq!(map.keys().copied().collect::<Vec<_>>(), before);
                }
            }
            5 => {
                let removed = map.remove(&key).is_some();
                assert_eq!(removed, order.contains(&key));
                forget(&mut order, key);
            }
            6 => {
                let new_bound = match value_raw % 4 {
                    0 => None,
                    _ => Some(usize::from(value_raw % 40) + 1),
                };
                let evicted: Vec<u8> = map
                    .set_maximum_size(new_bound)
                    .expect("positive bound")
                    .into_iter()
                    .map(|(k, _)| k)
                    .collect();
                bound = new_bound;
                assert_eq!(evicted, trim(&mut order, bound));
            }
            _ => {
                if value_raw % 16 == 0 {
                    map.clear();
                    order.clear();
                } else {
                    assert_eq!(map.pop_lru().map(|(k, _)| k), order.pop_back());
                }
            }
        }

        assert_eq!(map.len(), order.len());
        if let Some(max) = bound {
            assert!(map.len() <= max, "len {} exceeds bound {max}", map.len());
        }
        assert!(map.keys().copied().eq(order.iter().copied()));
        assert!(map.keys().rev().copied().eq(order.iter().rev().copied()));
    }
});

/// Make room for one new key the way the map does: evict the LRU key if full.
fn trim_for_insert(order: &mut VecDeque<u8>, bound: Option<usize>) -> Option<u8> {
    match bound {
        Some(max) if order.len() >= max => order.pop_back(),
        _ => None,
    }
}
