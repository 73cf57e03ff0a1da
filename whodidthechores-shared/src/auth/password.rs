/// Password hashing and strength estimation
///
/// Hashes are Argon2id PHC strings with a fixed work factor:
///
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// Hashing and verification are CPU-bound. Async callers use
/// [`hash_password_async`] and [`verify_password_async`], which run on the
/// blocking thread pool.
///
/// Strength is estimated from the password alone, before anything is
/// hashed: see [`password_entropy`].
///
/// # Example
///
/// ```
/// use whodidthechores_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("correct-Horse-battery-9")?;
///
/// assert!(verify_password("correct-Horse-battery-9", &hash)?);
/// assert!(!verify_password("correct-Horse-battery-8", &hash)?);
/// # Ok(())
/// # }
/// ```

use std::collections::BTreeSet;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

use crate::error::FieldError;

/// Passwords estimated below this many bits are refused at signup
pub const MIN_ENTROPY_BITS: f64 = 65.0;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password with Argon2id and a fresh 16-byte salt
///
/// Output looks like:
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a PHC hash
///
/// `Ok(false)` on mismatch; `Err` only when the hash cannot be used. The
/// comparison is constant-time.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters come from the hash itself
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// [`hash_password`] on the blocking thread pool
pub async fn hash_password_async(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))?
}

/// [`verify_password`] on the blocking thread pool
pub async fn verify_password_async(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::VerifyError(format!("Verification task failed: {}", e)))?
}

/// Refuses passwords estimated below [`MIN_ENTROPY_BITS`]
pub fn check_password_complexity(password: &str) -> Result<(), FieldError> {
    if password_entropy(password) < MIN_ENTROPY_BITS {
        return Err(FieldError::WeakPassword);
    }
    Ok(())
}

const REPLACE_CHARS: &str = "!@$&*";
const SEPARATOR_CHARS: &str = "_-., ";
const OTHER_SPECIAL_CHARS: &str = "\"#%'()+/:;<=>?[\\]^{|}~";

/// Keyboard rows and alphabets; runs taken from these count for little
const SEQUENCES: [&str; 5] = [
    "0123456789",
    "qwertyuiop",
    "asdfghjkl",
    "zxcvbnm",
    "abcdefghijklmnopqrstuvwxyz",
];

/// Estimated entropy in bits
///
/// `effective_length × log2(base)`, where the base is the size of the
/// character pool the password draws from and the effective length ignores
/// padding: characters repeated more than twice in a row, and runs of three
/// or more taken from a common sequence (either direction).
pub fn password_entropy(password: &str) -> f64 {
    let base = entropy_base(password);
    if base == 0 {
        return 0.0;
    }
    effective_length(password) as f64 * f64::from(base).log2()
}

fn entropy_base(password: &str) -> u32 {
    let (mut lower, mut upper, mut digit) = (false, false, false);
    let (mut replace, mut separator, mut special) = (false, false, false);
    let mut others = BTreeSet::new();

    for c in password.chars() {
        match c {
            'a'..='z' => lower = true,
            'A'..='Z' => upper = true,
            '0'..='9' => digit = true,
            c if REPLACE_CHARS.contains(c) => replace = true,
            c if SEPARATOR_CHARS.contains(c) => separator = true,
            c if OTHER_SPECIAL_CHARS.contains(c) => special = true,
            c => {
                others.insert(c);
            }
        }
    }

    let mut base = others.len() as u32;
    for (present, size) in [
        (lower, 26),
        (upper, 26),
        (digit, 10),
        (replace, 5),
        (separator, 5),
        (special, 22),
    ] {
        if present {
            base += size;
        }
    }
    base
}

fn effective_length(password: &str) -> usize {
    let chars = collapse_repeats(&password.chars().collect::<Vec<_>>());
    SEQUENCES
        .iter()
        .fold(chars, |chars, seq| collapse_sequence(&chars, seq))
        .len()
}

/// Keeps at most two identical characters in a row
fn collapse_repeats(chars: &[char]) -> Vec<char> {
    let mut out: Vec<char> = Vec::with_capacity(chars.len());
    for &c in chars {
        if out.len() >= 2 && out[out.len() - 1] == c && out[out.len() - 2] == c {
            continue;
        }
        out.push(c);
    }
    out
}

/// Keeps the first two characters of every run of 3+ consecutive entries of
/// `seq`, ascending or descending, ignoring ASCII case
fn collapse_sequence(chars: &[char], seq: &str) -> Vec<char> {
    let seq: Vec<char> = seq.chars().collect();
    let position = |c: char| seq.iter().position(|s| *s == c.to_ascii_lowercase());

    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let mut end = i + 1;
        if let Some(first) = position(chars[i]) {
            for step in [1isize, -1] {
                let mut prev = first as isize;
                let mut j = i + 1;
                while let Some(p) = chars.get(j).and_then(|c| position(*c)) {
                    if p as isize != prev + step {
                        break;
                    }
                    prev = p as isize;
                    j += 1;
                }
                end = end.max(j);
            }
        }

        if end - i >= 3 {
            out.extend_from_slice(&chars[i..i + 2]);
            i = end;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}
