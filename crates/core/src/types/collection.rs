//! Logical document collections.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A logical collection of documents in the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    /// Stored store credentials, one per domain.
    #[serde(rename = "shopifyintegration")]
    ShopifyIntegration,
    /// Last computed summary, one per domain.
    #[serde(rename = "datasnapshot")]
    DataSnapshot,
}

impl Collection {
    /// Every known collection.
    pub const ALL: [Self; 2] = [Self::ShopifyIntegration, Self::DataSnapshot];

    /// The collection name as stored in the backing store.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShopifyIntegration => "shopifyintegration",
            Self::DataSnapshot => "datasnapshot",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
