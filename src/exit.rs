// src/exit.rs
//! Standardized process exit codes for `trustnet`.
//!
//! Provides a stable contract for scripts and automation.

use std::process::Termination;

use crate::error::TrustError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TrustExit {
    /// Run completed and all verdict files were written.
    Success = 0,
    /// Generic error (e.g. IO).
    Error = 1,
    /// Configuration or command-line input was rejected.
    InvalidInput = 2,
    /// Orchestration defect (tier order, sealed graph, early compile).
    Misuse = 3,
    /// Expansion hit a resource ceiling (tier size, total entries, time).
    ResourceExceeded = 4,
}

impl TrustExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    /// Picks the exit code for a failed run by inspecting the error chain.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.chain().find_map(|e| e.downcast_ref::<TrustError>()) {
            Some(e) if e.is_resource() => Self::ResourceExceeded,
            Some(e) if e.is_misuse() => Self::Misuse,
            Some(TrustError::Config(_)) => Self::InvalidInput,
            _ => Self::Error,
        }
    }
}

impl Termination for TrustExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<anyhow::Result<()>> for TrustExit {
    fn from(res: anyhow::Result<()>) -> Self {
        match res {
            Ok(()) => Self::Success,
            Err(e) => {
                eprintln!("Error: {e:#}");
                Self::for_error(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_error_maps_to_code_4() {
        let err = anyhow::Error::new(TrustError::GraphTooLarge {
            tier: 3,
            total: 10,
            limit: 5,
        })
        .context("expanding graph");
        assert_eq!(TrustExit::for_error(&err), TrustExit::ResourceExceeded);
        assert_eq!(TrustExit::ResourceExceeded.code(), 4);
    }

    #[test]
    fn test_misuse_error_maps_to_code_3() {
        let err = anyhow::Error::new(TrustError::TierOutOfOrder {
            requested: 4,
            completed: 1,
        });
        assert_eq!(TrustExit::for_error(&err), TrustExit::Misuse);
    }

    #[test]
    fn test_plain_error_maps_to_code_1() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(TrustExit::for_error(&err), TrustExit::Error);
    }
}
