use std::io::{self, IsTerminal, Write};

/// xterm window op asking the terminal to resize to `cols` x `rows` cells.
pub fn write_resize_request<W: Write>(out: &mut W, cols: u16, rows: u16) -> io::Result<()> {
    write!(out, "\x1b[8;{};{}t", rows, cols)?;
    out.flush()
}

pub fn request_resize(cols: u16, rows: u16) {
    let mut stdout = io::stdout();
    if !stdout.is_terminal() {
        return;
    }

    // Unsupported terminals ignore this sequence.
    if let Err(e) = write_resize_request(&mut stdout, cols, rows) {
        crate::utils::logger::warn(&format!("resize request failed: {}", e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_request_sequence() {
        let mut out = Vec::new();
        write_resize_request(&mut out, 120, 40).unwrap();
        assert_eq!(out, b"\x1b[8;40;120t");
    }
}
