//! Raw key material loading
//!
//! Keys are read as bytes and kept as-is. PEM parsing happens later, with the
//! parser of the configured algorithm family.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{DomainError, DomainResult};

/// PEM bytes of the engine's key pair, held for the engine's lifetime
#[derive(Clone)]
pub struct KeyStore {
    private_pem: Vec<u8>,
    public_pem: Vec<u8>,
    /// Source files, `None` for in-memory keys
    paths: Option<(PathBuf, PathBuf)>,
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("paths", &self.paths)
            .field("private_pem_len", &self.private_pem.len())
            .field("public_pem_len", &self.public_pem.len())
            .finish()
    }
}

impl KeyStore {
    /// Reads both key files fully into memory
    ///
    /// # Arguments
    ///
    /// * `private_key_path` - Path to the PEM-encoded private key file
    /// * `public_key_path` - Path to the PEM-encoded public key file
    ///
    /// # Returns
    ///
    /// * `Ok(KeyStore)` - Both files were read
    /// * `Err(DomainError::Configuration)` - A path is empty
    /// * `Err(DomainError::KeyFile)` - A file could not be read
    pub fn load(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> DomainResult<Self> {
        let private_key_path = private_key_path.as_ref();
        let public_key_path = public_key_path.as_ref();

        let public_pem = read_key_file(public_key_path, "public")?;
        let private_pem = read_key_file(private_key_path, "private")?;

        Ok(Self {
            private_pem,
            public_pem,
            paths: Some((private_key_path.to_path_buf(), public_key_path.to_path_buf())),
        })
    }

    /// Creates a key store from in-memory PEM data (embedded keys, tests)
    pub fn from_pem(private_pem: impl Into<Vec<u8>>, public_pem: impl Into<Vec<u8>>) -> Self {
        Self {
            private_pem: private_pem.into(),
            public_pem: public_pem.into(),
            paths: None,
        }
    }

    pub fn private_pem(&self) -> &[u8] {
        &self.private_pem
    }

    pub fn public_pem(&self) -> &[u8] {
        &self.public_pem
    }

    /// Returns the (private, public) key file paths, if loaded from disk
    pub fn key_paths(&self) -> Option<(&Path, &Path)> {
        self.paths
            .as_ref()
            .map(|(private, public)| (private.as_path(), public.as_path()))
    }
}

fn read_key_file(path: &Path, which: &str) -> DomainResult<Vec<u8>> {
    if path.as_os_str().is_empty() {
        return Err(DomainError::Configuration {
            message: format!("{} key path is not set", which),
        });
    }

    let pem = fs::read(path).map_err(|source| DomainError::KeyFile {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = pem.len(), "Loaded {} key", which);
    Ok(pem)
}
