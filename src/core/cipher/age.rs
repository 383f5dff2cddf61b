//! In-process age engine.
//!
//! Produces a JSON document:
//!
//! ```json
//! {
//!   "data": "-----BEGIN AGE ENCRYPTED FILE-----...",
//!   "envv": {
//!     "version": "1",
//!     "format": "dotenv",
//!     "recipients": [{ "recipient": "age1..." }],
//!     "lastmodified": "2026-01-01T00:00:00Z",
//!     "digest": "<sha256 of data>"
//!   }
//! }
//! ```
//!
//! age stanzas are anonymous, so the recipient list in `envv` is what makes
//! the ciphertext self-describing.

use std::io::{Read, Write};
use std::path::Path;

use ::age::x25519;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;
use zeroize::Zeroizing;

use super::{embedded_metadata, Engine, Sealed};
use crate::core::domain::Format;
use crate::core::keys::KeyFile;
use crate::core::policy::EncryptionPolicy;
use crate::core::types::Metadata;
use crate::error::{CipherError, Error, KeyError, Result};

const METADATA_KEY: &str = "envv";
const DOCUMENT_VERSION: &str = "1";

#[derive(Serialize, Deserialize)]
struct Document {
    data: String,
    #[serde(rename = "envv")]
    meta: DocumentMeta,
}

#[derive(Serialize, Deserialize)]
struct DocumentMeta {
    version: String,
    format: Format,
    recipients: Vec<RecipientEntry>,
    lastmodified: String,
    digest: String,
}

#[derive(Serialize, Deserialize)]
struct RecipientEntry {
    recipient: String,
}

/// age-based engine using x25519 keys and ASCII armor.
pub struct AgeEngine {
    identities: Vec<x25519::Identity>,
    source: String,
}

impl AgeEngine {
    /// Engine holding the given identities for decryption.
    pub fn new(identities: Vec<x25519::Identity>) -> Self {
        Self {
            identities,
            source: "in-memory identities".to_string(),
        }
    }

    /// Engine backed by the local key file.
    ///
    /// A missing file is fine for encryption; decryption then fails with
    /// `KeyError::NoPrivateKey`.
    pub fn from_key_file(keys: &KeyFile) -> Result<Self> {
        let identities = if keys.exists() {
            keys.load_identities()?
        } else {
            Vec::new()
        };
        Ok(Self {
            identities,
            source: keys.path().display().to_string(),
        })
    }

    fn seal(&self, plaintext: &[u8], format: Format, recipients: &[String]) -> Result<Vec<u8>> {
        let parsed = recipients
            .iter()
            .map(|key| {
                key.parse::<x25519::Recipient>()
                    .map_err(|_| Error::from(CipherError::InvalidPublicKey(key.clone())))
            })
            .collect::<Result<Vec<_>>>()?;

        let encryptor =
            ::age::Encryptor::with_recipients(parsed.iter().map(|r| r as &dyn ::age::Recipient))
                .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let mut armored = Vec::new();
        let mut writer = encryptor
            .wrap_output(::age::armor::ArmoredWriter::wrap_output(
                &mut armored,
                ::age::armor::Format::AsciiArmor,
            )?)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        writer.write_all(plaintext)?;
        writer
            .finish()
            .and_then(|armor| armor.finish())
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let data = String::from_utf8(armored)
            .map_err(|e| CipherError::EncryptionFailed(format!("UTF-8 error: {}", e)))?;

        let document = Document {
            meta: DocumentMeta {
                version: DOCUMENT_VERSION.to_string(),
                format,
                recipients: recipients
                    .iter()
                    .map(|r| RecipientEntry {
                        recipient: r.clone(),
                    })
                    .collect(),
                lastmodified: chrono::Utc::now().to_rfc3339(),
                digest: digest(&data),
            },
            data,
        };
        Ok(serde_json::to_vec_pretty(&document)?)
    }
}

fn digest(data: &str) -> String {
    format!("{:x}", Sha256::digest(data.as_bytes()))
}

impl Engine for AgeEngine {
    fn name(&self) -> &'static str {
        "age"
    }

    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    fn encrypt(
        &self,
        plaintext: &Path,
        format: Format,
        policy: &EncryptionPolicy,
    ) -> Result<Sealed> {
        let contents = Zeroizing::new(std::fs::read(plaintext)?);
        let recipients: Vec<String> = policy.primary().recipients.iter().cloned().collect();
        trace!(
            recipients = recipients.len(),
            plaintext_len = contents.len(),
            "encrypting"
        );

        let ciphertext = self.seal(&contents, format, &recipients)?;
        let metadata = self.metadata(&ciphertext)?;

        trace!(ciphertext_len = ciphertext.len(), "encrypted");
        Ok(Sealed {
            ciphertext,
            metadata,
        })
    }

    fn decrypt(&self, ciphertext: &[u8], _format: Format) -> Result<Zeroizing<Vec<u8>>> {
        trace!(ciphertext_len = ciphertext.len(), "decrypting");

        let document: Document = serde_json::from_slice(ciphertext)
            .map_err(|e| CipherError::Malformed(format!("not an age document: {}", e)))?;
        if digest(&document.data) != document.meta.digest {
            return Err(CipherError::Malformed("payload digest mismatch".to_string()).into());
        }
        if self.identities.is_empty() {
            return Err(KeyError::NoPrivateKey(self.source.clone()).into());
        }

        let reader = ::age::armor::ArmoredReader::new(document.data.as_bytes());
        let decryptor = ::age::Decryptor::new(reader)
            .map_err(|e| CipherError::Malformed(format!("{}", e)))?;

        let mut stream = decryptor
            .decrypt(self.identities.iter().map(|i| i as &dyn ::age::Identity))
            .map_err(|e| match e {
                ::age::DecryptError::NoMatchingKeys => CipherError::PermissionDenied,
                other => CipherError::Malformed(format!("{}", other)),
            })?;

        let mut plaintext = Zeroizing::new(Vec::new());
        stream
            .read_to_end(&mut plaintext)
            .map_err(|e| CipherError::Malformed(format!("{}", e)))?;

        trace!(plaintext_len = plaintext.len(), "decrypted");
        Ok(plaintext)
    }

    fn metadata(&self, ciphertext: &[u8]) -> Result<Metadata> {
        embedded_metadata(ciphertext, METADATA_KEY, "age")
    }
}
