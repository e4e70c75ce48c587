//! Print the token stream for each argument, one token per line.
//! Useful when a title splits in an unexpected place.
//!
//! Usage: songtitle-tokens <title>... [--parse]

use anyhow::{bail, Result};
use songtitle::charclass::is_unreserved;
use songtitle::scanner::scan;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let show_parse = args.iter().any(|a| a == "--parse");
    let titles: Vec<&String> = args.iter().filter(|a| *a != "--parse").collect();

    if titles.is_empty() {
        eprintln!("Usage: songtitle-tokens <title>... [--parse]");
        eprintln!();
        eprintln!("Prints each token as: offset kind literal");
        eprintln!("Reserved characters are listed with their code point.");
        bail!("no titles given");
    }

    for title in titles {
        println!("{:?}", title);
        for token in scan(title) {
            let mut chars = token.literal.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if !is_unreserved(c) => println!(
                    "  {:>4} {:<5} {:?} U+{:04X}",
                    token.offset,
                    token.kind,
                    token.literal,
                    c as u32
                ),
                _ => println!("  {:>4} {:<5} {:?}", token.offset, token.kind, token.literal),
            }
        }
        if show_parse {
            let song = songtitle::parse(title);
            println!("  artist: {:?}", song.artist);
            println!("  title:  {:?}", song.title);
            println!("  tags:   {:?}", song.tags);
        }
    }

    Ok(())
}
