//! Statistics reporting.

use console::style;

use crate::download::BatchStats;

/// Print the totals of a finished batch.
pub fn print_batch_stats(stats: &BatchStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Download Statistics:").bold());
    println!("  Downloaded: {}", style(stats.succeeded).green());
    if stats.failed > 0 {
        println!("  Failed:     {}", style(stats.failed).red());
    }
    if stats.cancelled > 0 {
        println!("  Cancelled:  {}", style(stats.cancelled).yellow());
    }
    println!("  Total:      {}", stats.total());
    println!("{}", style("═".repeat(50)).dim());
}
