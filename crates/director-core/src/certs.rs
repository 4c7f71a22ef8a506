//! Trusted certificate bundle pushed to agents.

use sha1::{Digest, Sha1};

/// PEM bundle sourced once at startup and threaded through to provisioning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedCerts {
    pem: String,
}

impl TrustedCerts {
    pub fn new(pem: impl Into<String>) -> Self {
        Self { pem: pem.into() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn pem(&self) -> &str {
        &self.pem
    }

    pub fn is_empty(&self) -> bool {
        self.pem.is_empty()
    }

    /// Lowercase hex SHA-1 of the bundle text, recorded on the VM once the
    /// agent has accepted the bundle.
    pub fn sha1(&self) -> String {
        hex::encode(Sha1::digest(self.pem.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bundle_fingerprint() {
        assert_eq!(
            TrustedCerts::empty().sha1(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = TrustedCerts::new("cert-a");
        let b = TrustedCerts::new("cert-b");
        assert_eq!(a.sha1(), TrustedCerts::new("cert-a").sha1());
        assert_ne!(a.sha1(), b.sha1());
        assert_eq!(a.sha1().len(), 40);
    }
}
