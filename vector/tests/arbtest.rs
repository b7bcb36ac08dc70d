use arbitrary::Unstructured;
use arbtest::{arbitrary, arbtest};
use sparse_trie_vector::{Error, SparseVector};

#[derive(arbitrary::Arbitrary, Debug)]
enum Op {
    Set(usize, u32),
    // Arbitrary `u32`s are almost never zero, so zeroing gets its own op.
    SetZero(usize),
    Clear(usize),
    Snapshot,
}

impl Op {
    fn apply_to_vec(&self, vec: &mut [u32]) {
        if vec.is_empty() {
            return;
        }
        let len = vec.len();
        match self {
            Op::Set(idx, x) => vec[idx % len] = *x,
            Op::SetZero(idx) | Op::Clear(idx) => vec[idx % len] = 0,
            Op::Snapshot => {}
        }
    }

    fn apply_to_vector(&self, vec: &SparseVector<u32>) -> SparseVector<u32> {
        let len = vec.len();
        if len == 0 {
            if let Op::Set(idx, x) = self {
                assert_eq!(
                    vec.set(*idx, *x),
                    Err(Error::OutOfRange {
                        index: *idx,
                        size: 0
                    })
                );
            }
            return vec.clone();
        }

        match self {
            Op::Set(idx, x) => vec.set(idx % len, *x).unwrap(),
            Op::SetZero(idx) => vec.set(idx % len, 0).unwrap(),
            Op::Clear(idx) => vec.clear(idx % len).unwrap(),
            Op::Snapshot => vec.clone(),
        }
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn to_vec(vector: &SparseVector<u32>) -> Vec<u32> {
    (0..vector.len()).map(|i| vector[i]).collect()
}

// u.arbitrary() generates very short vecs by default:
// https://github.com/matklad/arbtest/issues/8
fn arb_vec(u: &mut Unstructured<'_>, len: usize) -> arbitrary::Result<Vec<u32>> {
    std::iter::from_fn(|| {
        // Make about half of the elements zero.
        Some(match u.arbitrary::<bool>() {
            Ok(true) => Ok(0),
            Ok(false) => u.arbitrary::<u32>(),
            Err(e) => Err(e),
        })
    })
    .take(len)
    .collect()
}

fn arb_size(u: &mut Unstructured<'_>) -> arbitrary::Result<usize> {
    u.int_in_range(0..=300)
}

fn shuffled(u: &mut Unstructured<'_>, len: usize) -> arbitrary::Result<Vec<usize>> {
    let mut order: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = u.int_in_range(0..=i)?;
        order.swap(i, j);
    }
    Ok(order)
}

#[test]
fn mutations() {
    init_logging();
    arbtest(|u| {
        let size = arb_size(u)?;
        let mut vec = vec![0u32; size];
        let mut vector = SparseVector::new(size, 0u32);
        let mut snapshots = Vec::new();
        let ops: Vec<Op> = u.arbitrary()?;

        for op in ops {
            op.apply_to_vec(&mut vec);
            vector = op.apply_to_vector(&vector);
            if let Op::Snapshot = op {
                snapshots.push((vector.clone(), vec.clone()));
            }

            vector.check_invariants();
            assert_eq!(vector.len(), size);
            assert_eq!(vec, to_vec(&vector));
            assert_eq!(
                vector.count_nonzero(),
                vec.iter().filter(|&&x| x != 0).count()
            );
        }

        // Later modifications never leak into earlier versions.
        for (old_vector, old_vec) in &snapshots {
            old_vector.check_invariants();
            assert_eq!(old_vec, &to_vec(old_vector));
        }

        Ok(())
    });
}

#[test]
fn write_order_does_not_matter() {
    init_logging();
    arbtest(|u| {
        let size = arb_size(u)?;
        let vec = arb_vec(u, size)?;

        let mut ascending = SparseVector::new(size, 0);
        for (i, x) in vec.iter().enumerate() {
            ascending = ascending.set(i, *x).unwrap();
        }

        let mut shuffled_writes = SparseVector::new(size, 0);
        for i in shuffled(u, size)? {
            shuffled_writes = shuffled_writes.set(i, vec[i]).unwrap();
        }

        ascending.check_invariants();
        shuffled_writes.check_invariants();
        assert_eq!(vec, to_vec(&ascending));
        assert_eq!(ascending, shuffled_writes);

        Ok(())
    });
}

#[test]
fn clearing_everything_gives_back_the_empty_vector() {
    init_logging();
    arbtest(|u| {
        let size = arb_size(u)?;
        let vec = arb_vec(u, size)?;
        let empty = SparseVector::new(size, 0);

        let mut vector = empty.clone();
        for (i, x) in vec.iter().enumerate() {
            vector = vector.set(i, *x).unwrap();
        }
        for i in shuffled(u, size)? {
            vector = vector.clear(i).unwrap();
            vector.check_invariants();
        }

        assert_eq!(vector, empty);
        assert_eq!(vector.count_nonzero(), 0);

        Ok(())
    });
}

#[test]
fn clear_is_idempotent() {
    init_logging();
    arbtest(|u| {
        let size = arb_size(u)?.max(1);
        let vec = arb_vec(u, size)?;
        let mut vector = SparseVector::new(size, 0);
        for (i, x) in vec.iter().enumerate() {
            vector = vector.set(i, *x).unwrap();
        }

        let idx = u.int_in_range(0..=size - 1)?;
        let once = vector.clear(idx).unwrap();
        let twice = once.clear(idx).unwrap();
        assert!(twice.ptr_eq(&once));
        assert_eq!(once.get(idx), Ok(&0));
        assert_eq!(vector.get(idx), Ok(&vec[idx]));

        Ok(())
    });
}
