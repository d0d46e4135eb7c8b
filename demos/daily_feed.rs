//! Fetch today's newest papers in a category and print their details.
//!
//! Run with: `cargo run --example daily_feed -- cs.CL 5`

use arxiv_daily::feed::{ArxivTransport, FeedPipeline};
use arxiv_daily::view::{Listing, PaperListView};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let category = args.next().unwrap_or_else(|| "cs.CV".to_string());
    let count = args.next().and_then(|n| n.parse().ok()).unwrap_or(5);

    let mut view = PaperListView::new();
    if !view.set_category(&category) {
        eprintln!("Unknown category {category}, falling back to {}", view.category());
    }
    view.set_result_count(count);

    let pipeline = FeedPipeline::new(ArxivTransport::new()?);
    println!("Fetching {} papers from {}...\n", view.result_count(), view.category());
    view.replace(pipeline.fetch(&view.query()).await?);

    let titles = match view.listing() {
        Listing::NoResults => {
            println!("No papers found");
            return Ok(());
        }
        Listing::Titles(titles) => titles,
    };

    for (position, title) in titles.iter().enumerate() {
        println!("{}. {}", position + 1, title);
        if let Some(detail) = view.detail(position) {
            println!("   {}", detail.authors);
            if let Some(relative) = &detail.published_relative {
                println!("   published {}", relative);
            }
            if let Some(pdf) = &detail.pdf_url {
                println!("   {}", pdf);
            }
        }
        println!();
    }

    Ok(())
}
