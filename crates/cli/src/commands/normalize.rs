//! Domain normalization command.

use shopsync_core::ShopDomain;

/// Print the canonical `*.myshopify.com` form of `raw`.
pub fn run(raw: &str) {
    let domain = ShopDomain::normalize(raw);

    #[allow(clippy::print_stdout)]
    {
        println!("{domain}");
    }
}
