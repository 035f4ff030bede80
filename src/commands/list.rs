//! List commands implementation

use crate::programmers::available_tools;

/// List all compiled-in tool backends
pub fn list_tools() {
    println!("Available tools:");
    println!();
    for tool in available_tools() {
        let aliases = if tool.aliases.is_empty() {
            String::new()
        } else {
            format!(" (alias: {})", tool.aliases.join(", "))
        };
        println!("  {:<14} - {}{}", tool.name, tool.description, aliases);
    }
    println!();
    println!("Select one with --tool name[:key=value,...]");
}
