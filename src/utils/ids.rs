use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// URL-safe random id of `len` characters
pub fn nanoid(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// `<prefix>-<nanoid>`, e.g. `playlist-V1StGXR8_Z5`
pub fn prefixed_id(prefix: &str, len: usize) -> String {
    format!("{}-{}", prefix, nanoid(len))
}
