//! List commands implementation

use crate::backends::available_backends;

/// List all compiled-in backends
pub fn list_backends() {
    let backends = available_backends();
    if backends.is_empty() {
        println!("No backends available (recompile with backend features enabled)");
        return;
    }

    println!("Available backends:");
    println!();
    for b in &backends {
        if b.aliases.is_empty() {
            println!("  {:10} - {}", b.name, b.description);
        } else {
            println!(
                "  {:10} - {} (aliases: {})",
                b.name,
                b.description,
                b.aliases.join(", ")
            );
        }
    }
}
