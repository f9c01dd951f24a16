use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const METHOD: &str = "pbkdf2";
const DIGEST: &str = "sha256";
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 hashes encoded as `pbkdf2:sha256:<iterations>$<salt>$<key hex>`.
///
/// The salt is stored as text and its UTF-8 bytes feed the KDF, the same layout
/// werkzeug's `generate_password_hash` writes.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn hash(&self, password: &str) -> String {
        let salt = random_salt();
        let key = derive(password.as_bytes(), salt.as_bytes(), self.iterations);
        encode(self.iterations, &salt, &key)
    }

    /// A well-formed hash that no password matches. Verifying against it costs the same
    /// as a real check, so callers can spend that time when there is no stored hash.
    pub fn placeholder(&self) -> String {
        encode(self.iterations, &random_salt(), &[0u8; KEY_LEN])
    }

    /// Iterations are read from the stored hash, so raising the configured count keeps
    /// older hashes valid.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let Some(parsed) = Encoded::parse(encoded) else {
            return false;
        };
        let actual = derive(password.as_bytes(), parsed.salt.as_bytes(), parsed.iterations);
        actual.as_slice().ct_eq(parsed.key.as_slice()).into()
    }
}

#[derive(Debug)]
struct Encoded<'a> {
    iterations: u32,
    salt: &'a str,
    key: Vec<u8>,
}

impl<'a> Encoded<'a> {
    fn parse(encoded: &'a str) -> Option<Self> {
        let mut parts = encoded.split('$');
        let (Some(method), Some(salt), Some(key), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return None;
        };

        let mut method = method.split(':');
        let (Some(METHOD), Some(DIGEST), Some(iterations), None) =
            (method.next(), method.next(), method.next(), method.next())
        else {
            return None;
        };

        let iterations = iterations.parse::<u32>().ok().filter(|n| *n > 0)?;
        if salt.is_empty() {
            return None;
        }
        let key = hex::decode(key).ok().filter(|key| key.len() == KEY_LEN)?;

        Some(Self {
            iterations,
            salt,
            key,
        })
    }
}

fn random_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect()
}

fn encode(iterations: u32, salt: &str, key: &[u8]) -> String {
    format!("{METHOD}:{DIGEST}:{iterations}${salt}${}", hex::encode(key))
}

fn derive(password: &[u8], salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);
    key
}
