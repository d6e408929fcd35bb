//! Terminal output helpers.

/// Print a block of text with every line prefixed by `indent` spaces.
pub fn print_indented(indent: usize, text: &str) {
    let pad = " ".repeat(indent);
    for line in text.lines() {
        println!("{pad}{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_indented_handles_multiline() {
        // smoke test; output goes to stdout
        print_indented(2, "one\ntwo");
        print_indented(0, "");
    }
}
