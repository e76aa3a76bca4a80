//! Yes/no confirmation on the terminal

use std::io::{self, BufRead, Write};

use anyhow::Result;

/// Asks `question` on stderr and reads the answer from stdin. Anything but
/// an explicit yes, including end of input, counts as no.
pub fn confirm(question: &str) -> Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{} [y/N] ", question)?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_yes_variants() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
    }

    #[test]
    fn everything_else_is_no() {
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
