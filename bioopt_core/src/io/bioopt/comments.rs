//! Removal of comments from BioOpt lines

/// Strips comments from the lines of one section
///
/// `#` comments out the rest of a line. `%` opens a block comment which is closed by the
/// next `%`, possibly on a later line of the same section.
#[derive(Debug, Default)]
pub struct CommentStripper {
    in_block: bool,
}

impl CommentStripper {
    pub fn new() -> Self {
        CommentStripper::default()
    }

    /// Whether a block comment is open at the end of the last stripped line
    pub fn in_block(&self) -> bool {
        self.in_block
    }

    /// Remove comments from a line, the result is trimmed
    pub fn strip(&mut self, line: &str) -> String {
        let mut stripped = String::with_capacity(line.len());
        for c in line.chars() {
            if self.in_block {
                if c == '%' {
                    self.in_block = false;
                }
                continue;
            }
            match c {
                '#' => break,
                '%' => self.in_block = true,
                _ => stripped.push(c),
            }
        }
        stripped.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comments() {
        let mut stripper = CommentStripper::new();
        assert_eq!(stripper.strip("R1: A -> B # first reaction"), "R1: A -> B");
        assert_eq!(stripper.strip("# only a comment"), "");
        assert_eq!(stripper.strip("  R2: C -> D  "), "R2: C -> D");
    }

    #[test]
    fn block_comments_on_one_line() {
        let mut stripper = CommentStripper::new();
        assert_eq!(stripper.strip("R1: A %not B% -> C"), "R1: A  -> C");
        assert!(!stripper.in_block());
        // A hash inside a block does not end the line
        assert_eq!(stripper.strip("R1 %#% 1 1"), "R1  1 1");
    }

    #[test]
    fn block_comments_span_lines() {
        let mut stripper = CommentStripper::new();
        assert_eq!(stripper.strip("R1: A -> B % start"), "R1: A -> B");
        assert!(stripper.in_block());
        assert_eq!(stripper.strip("R2: C -> D"), "");
        assert_eq!(stripper.strip("end % R3: E -> F"), "R3: E -> F");
        assert!(!stripper.in_block());
    }
}
