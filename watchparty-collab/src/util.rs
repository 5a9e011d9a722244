use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Returns a random alphanumeric string of the given length.
pub fn random_string(length: usize) -> String {
    thread_rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
