use anyhow::Result;
use colored::Colorize;
use cwreport_core::{BackendKind, Category};

pub async fn execute() -> Result<()> {
    println!("{}", "=== Supported Categories ===".bold().cyan());

    for category in Category::ALL {
        println!(
            "  {} {:<14} {}",
            "•".green(),
            category.as_str(),
            category.description()
        );
    }

    println!("\n{}", "=== Backends ===".bold().cyan());
    for backend in BackendKind::all() {
        let status = if backend.is_available() {
            "available".green()
        } else {
            "not compiled in (build with --features aws)".yellow()
        };
        println!("  {} {:<8} {}", "•".green(), backend.as_str(), status);
    }

    println!(
        "\n{}",
        "Use 'cwreport run <category>' to generate a report".yellow()
    );

    Ok(())
}
