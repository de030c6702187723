use rand::Rng;

/// Fisher–Yates shuffle into a fresh vector; the input is left untouched.
pub fn shuffle_array<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// The first `count` entries of a shuffled copy of `pool` (all of it if shorter).
pub fn pick_working_set<T: Clone, R: Rng + ?Sized>(pool: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut shuffled = shuffle_array(pool, rng);
    shuffled.truncate(count);
    shuffled
}
