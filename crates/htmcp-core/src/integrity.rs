use htmcp_schema::{Sha256Digest, Sha256Hash};

use crate::error::InstallError;

/// Check fetched bytes against the expected digest.
///
/// Must run before anything is written to the bin directory.
pub fn verify(bytes: &[u8], expected: &Sha256Hash) -> Result<Sha256Digest, InstallError> {
    let actual = Sha256Digest::compute(bytes);
    if actual.matches(expected) {
        Ok(actual)
    } else {
        Err(InstallError::IntegrityMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_matching_digest() {
        let bytes = b"ht-mcp binary";
        let expected = Sha256Hash::from(Sha256Digest::compute(bytes));
        assert_eq!(verify(bytes, &expected).unwrap().as_str(), expected.as_str());
    }

    #[test]
    fn test_verify_accepts_uppercase_digest() {
        let bytes = b"ht-mcp binary";
        let expected = Sha256Hash::new(Sha256Digest::compute(bytes).as_str().to_uppercase());
        assert!(verify(bytes, &expected).is_ok());
    }

    #[test]
    fn test_verify_rejects_bit_flip() {
        let bytes = b"ht-mcp binary".to_vec();
        let expected = Sha256Hash::from(Sha256Digest::compute(&bytes));
        let mut flipped = bytes;
        flipped[3] ^= 0x80;

        let err = verify(&flipped, &expected).unwrap_err();
        match err {
            InstallError::IntegrityMismatch { expected: e, actual } => {
                assert_eq!(e, expected.as_str());
                assert_ne!(actual, e);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_verify_rejects_placeholder() {
        let err = verify(b"anything", &Sha256Hash::new("YOUR_LINUX_SHA256_HERE")).unwrap_err();
        assert!(matches!(err, InstallError::IntegrityMismatch { .. }));
    }
}
