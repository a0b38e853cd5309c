use rand::Rng;

/// Default invite-code alphabet
///
/// Uppercase alphanumerics with the ambiguous glyphs (I, L, O, 0, 1)
/// removed, since codes are read aloud and retyped by hand.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Generate one candidate invite code from a fixed alphabet
///
/// Uniqueness against active codes is the registry's job; this only
/// produces the token.
#[inline]
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R, alphabet: &str, length: usize) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

/// Code length for the nth generation attempt
///
/// Attempts are grouped into rounds of `attempts_per_length`; each
/// exhausted round widens the code space by one character instead of
/// retrying the same length forever.
#[inline]
pub fn length_for_attempt(base_length: usize, attempts_per_length: u32, attempt: u32) -> usize {
    let attempts_per_length = attempts_per_length.max(1);
    base_length + (attempt / attempts_per_length) as usize
}
