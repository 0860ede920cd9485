use std::sync::Arc;

use crate::app::{AppContext, PostdeckError, Result};
use crate::domain::Outcome;
use crate::repository::ItemRepository;
use crate::store::ItemStore;
use crate::sync::MediatorOutcome;

pub async fn sync_items(ctx: &AppContext) -> Result<()> {
    println!("Syncing from {}...", ctx.config.remote.base_url);

    match ctx.mediator.reconcile().await {
        MediatorOutcome::Success { .. } => {
            println!("Sync complete: {} items cached", ctx.store.count()?);
        }
        MediatorOutcome::Failure(cause) => {
            println!("Cache unchanged: {} items", ctx.store.count()?);
            return Err(Arc::try_unwrap(cause)
                .unwrap_or_else(|shared| PostdeckError::Other(shared.to_string())));
        }
    }
    Ok(())
}

pub fn list_items(ctx: &AppContext, page: usize) -> Result<()> {
    let page_size = ctx.config.paging.page_size.max(1);
    let Some(offset) = page_offset(page, page_size) else {
        println!("No items on page {}", page);
        return Ok(());
    };
    let items = ctx.store.query_page(offset, page_size)?;

    if items.is_empty() {
        if offset == 0 {
            println!("No items. Run `postdeck sync` first.");
        } else {
            println!("No items on page {}", page);
        }
        return Ok(());
    }

    for item in &items {
        println!("{:>5}  {}", item.id, item.display_title());
    }

    let total = ctx.store.count()?;
    let pages = total.div_ceil(page_size);
    println!("Page {} of {} ({} items)", page.max(1), pages, total);
    Ok(())
}

/// Offset of 1-based `page`; page 0 is treated as page 1.
fn page_offset(page: usize, page_size: usize) -> Option<usize> {
    page.saturating_sub(1).checked_mul(page_size)
}

pub async fn show_item(ctx: &AppContext, id: i64) -> Result<()> {
    match ctx.repository.item(id).await {
        Outcome::Success(item) => {
            println!("{}", item.display_title());
            println!("  id:    {}", item.id);
            println!("  image: {}", item.image_url);
        }
        Outcome::Error(cause) => eprintln!("Item {}: {}", id, cause),
        Outcome::Loading => {}
    }
    Ok(())
}
