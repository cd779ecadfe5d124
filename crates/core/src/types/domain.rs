//! Shopify store domain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Suffix every canonical store domain ends with.
pub const MYSHOPIFY_SUFFIX: &str = ".myshopify.com";

/// A canonical Shopify store domain (`<name>.myshopify.com`).
///
/// Built with [`ShopDomain::normalize`], which accepts anything a user might
/// paste into a form: a bare handle, a full admin URL, or an already
/// canonical domain.
///
/// ## Normalization
///
/// 1. Trim surrounding whitespace
/// 2. Remove `http://` and `https://` (case-sensitive)
/// 3. Keep everything before the first `/`
/// 4. Append `.myshopify.com` unless already present
///
/// No character-set or length validation is performed, and the input is not
/// lowercased: `Acme` and `acme` are distinct stores.
///
/// ## Examples
///
/// ```
/// use shopsync_core::ShopDomain;
///
/// assert_eq!(ShopDomain::normalize("acme").as_str(), "acme.myshopify.com");
/// assert_eq!(
///     ShopDomain::normalize("https://acme.myshopify.com/admin").as_str(),
///     "acme.myshopify.com"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Normalize a user-supplied store identifier into its canonical form.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let without_scheme = raw.trim().replace("http://", "").replace("https://", "");
        let host = without_scheme.split('/').next().unwrap_or_default();

        if host.ends_with(MYSHOPIFY_SUFFIX) {
            Self(host.to_owned())
        } else {
            Self(format!("{host}{MYSHOPIFY_SUFFIX}"))
        }
    }

    /// Get the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ShopDomain> for String {
    fn from(domain: ShopDomain) -> Self {
        domain.0
    }
}
