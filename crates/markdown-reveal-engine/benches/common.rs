// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **bold**, *italic* and `code`.\n\n- [ ] Task item\n- Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n| a | b |\n|---|:-:|\n| 1 | 2 |\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_notes(sections: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("## Section {section}\n\n"));
        content.push_str(
            "Some paragraph content with a [link](https://example.com) and ==highlights==.\n\
             A second line with $x^2$ math and :rocket: emoji.\n\n",
        );
        for i in 0..3 {
            content.push_str(&format!("{}. Item {i} in section {section}\n", i + 1));
        }
        content.push('\n');
        if section % 3 == 0 {
            content.push_str("> A quoted ***remark***\n\n---\n\n");
        }
    }

    content
}

/// A document big enough that edits to it are debounced.
#[allow(dead_code)]
pub fn generate_large_document() -> String {
    generate_notes(120)
}
