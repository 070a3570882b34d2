//! # Encoder Configuration
//!
//! An immutable options value controlling the version and the default
//! extension records written into new containers. Passed by value into the
//! encrypting facade; nothing here is process-global.

use crate::consts::{DEFAULT_FILE_VERSION, PLACEHOLDER_EXTENSION_LEN};
use crate::header::Extension;
use chrono::Utc;

/// The creator string written into the `CREATED-BY` extension.
pub const CREATED_BY: &str = concat!("aescrypt-stream v", env!("CARGO_PKG_VERSION"));

/// Controls what a new container looks like.
#[derive(Debug, Clone)]
pub struct Options {
    /// Write a `CREATED-BY` record naming this library. Default: on.
    pub insert_created_by: bool,
    /// Write `CREATED-DATE` and `CREATED-TIME` records (UTC). Default: off.
    pub insert_timestamp: bool,
    /// Write the conventional 127-byte empty-key placeholder record,
    /// reserved space for later header edits. Default: on.
    pub insert_placeholder: bool,
    /// Container version to produce (0 to 2). Default: 2. Extensions are
    /// only representable in version 2.
    pub version: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            insert_created_by: true,
            insert_timestamp: false,
            insert_placeholder: true,
            version: DEFAULT_FILE_VERSION,
        }
    }
}

impl Options {
    /// The extension records implied by this configuration, in emission order.
    pub(crate) fn default_extensions(&self) -> Vec<Extension> {
        let mut extensions = Vec::new();
        if self.insert_created_by {
            extensions.push(Extension::new("CREATED-BY", CREATED_BY.as_bytes().to_vec()));
        }
        if self.insert_timestamp {
            let now = Utc::now();
            extensions.push(Extension::new(
                "CREATED-DATE",
                now.format("%Y-%m-%d").to_string().into_bytes(),
            ));
            // 12-hour clock with no AM/PM marker, the shape the reference
            // tool writes
            extensions.push(Extension::new(
                "CREATED-TIME",
                now.format("%I-%M-%S").to_string().into_bytes(),
            ));
        }
        if self.insert_placeholder {
            extensions.push(Extension::new("", vec![0u8; PLACEHOLDER_EXTENSION_LEN]));
        }
        extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_extensions_follow_flags() {
        let defaults = Options::default().default_extensions();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults[0].key, "CREATED-BY");
        assert_eq!(defaults[1].key, "");
        assert_eq!(defaults[1].value.len(), 127);

        let bare = Options {
            insert_created_by: false,
            insert_placeholder: false,
            ..Options::default()
        };
        assert!(bare.default_extensions().is_empty());

        let stamped = Options {
            insert_timestamp: true,
            ..Options::default()
        };
        let keys: Vec<_> = stamped
            .default_extensions()
            .iter()
            .map(|e| e.key.clone())
            .collect();
        assert_eq!(keys, ["CREATED-BY", "CREATED-DATE", "CREATED-TIME", ""]);
    }
}
