// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\nParagraph with some content.\n\n- Bullet point\n  - Nested item\n- Another item\n\n> A quote\n> over two lines\n\n1. first\n2. second\n\n- [ ] open task\n- [x] done task\n\n| a | b |\n| - | - |\n| 1 | 2 |\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

/// One block's worth of mixed text, as typed into a focused block before it
/// is reconciled.
#[allow(dead_code)]
pub fn generate_unreconciled_text(lines: usize) -> String {
    let patterns = ["- item", "- item", "plain line", "> quote", "1. one", "2. two", "text"];
    (0..lines)
        .map(|i| patterns[i % patterns.len()])
        .collect::<Vec<_>>()
        .join("\n")
}
