/// Number of stderr lines kept when an external engine fails
const STDERR_TAIL_LINES: usize = 5;

/// Keep the last few non-empty lines of a child process' stderr so that the
/// failure cause stays readable without dumping the whole engine log.
pub fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return "no error output".to_string();
    }

    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}
