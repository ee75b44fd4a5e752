//! `kostats categories` – show the category table.

use anyhow::Result;
use kostats_core::category::Category;
use kostats_core::config::KostatsConfig;

pub fn run_categories(cfg: &KostatsConfig) -> Result<()> {
    let base = cfg.base_url()?;
    for category in Category::ALL {
        let listing = base.join(&category.listing_path())?;
        println!(
            "{:<4} {:<24} {:<6} {}",
            category.code(),
            category.display_name(),
            category.subdirectory(),
            listing
        );
    }
    Ok(())
}
