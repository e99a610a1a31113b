//! Simple build example: pick parts for a budget and print them.

use rigbuild::prelude::*;
use std::sync::Arc;

fn main() -> Result<(), RigBuildError> {
    let mut args = std::env::args().skip(1);
    let budget: f64 = match args.next().map(|b| b.parse()) {
        Some(Ok(budget)) => budget,
        Some(Err(_)) => {
            eprintln!("Usage: cargo run --example simple_build [budget] [usage]");
            std::process::exit(1);
        }
        None => 1500.0,
    };
    let usage = args.next().unwrap_or_else(|| "gaming".to_string());

    let selector = Selector::new(Arc::new(Catalog::builtin()?))?;
    let build = selector.build(budget, &usage)?;

    println!("{} build for ${:.2}", build.usage.label(), build.budget);
    for (category, part) in build.iter() {
        println!("  {:<14} {:<40} ${:.2}", category.label(), part.model_name, part.price);
    }
    println!("Total: ${:.2} (${:.2} left)", build.total_price, build.remaining_budget());
    if let Some(socket) = build.socket() {
        println!("Platform socket: {}", socket);
    }

    Ok(())
}
