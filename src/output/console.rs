//! Console output utilities.

use std::path::Path;

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the parameters of the current run.
pub fn print_run_summary(provider: &str, tag: &str, count: usize, out: &Path, workers: usize) {
    println!();
    println!("{}", style("Run:").bold());
    println!("  Provider:  {}", provider);
    println!("  Tag:       {}", tag);
    println!("  Count:     {}", count);
    println!("  Directory: {}", out.display());
    println!("  Workers:   {}", workers);
    println!();
}
