//! Writes rendered frames, redrawing in place on a terminal.

use std::io::{self, Stdout, Write};

use crate::utils::{cursor_up, RESET_FORMATTING};

pub struct FramePresenter<W: Write> {
    out: W,
    interactive: bool,
    color: bool,
}

impl FramePresenter<Stdout> {
    pub fn stdout(interactive: bool, color: bool) -> Self {
        Self::new(io::stdout(), interactive, color)
    }
}

impl<W: Write> FramePresenter<W> {
    pub fn new(out: W, interactive: bool, color: bool) -> Self {
        Self {
            out,
            interactive,
            color,
        }
    }

    /// Prints `frame`; a non-final frame on a terminal leaves the cursor on its first line
    ///
    /// Off a terminal frames are appended one after another, separated by a
    /// blank line. The final frame resets text formatting when color is on.
    pub fn present(&mut self, frame: &str, is_final: bool) -> io::Result<()> {
        self.out.write_all(frame.as_bytes())?;
        if is_final {
            if self.color {
                self.out.write_all(RESET_FORMATTING.as_bytes())?;
            }
        } else if self.interactive {
            let lines = frame.lines().count();
            if lines > 0 {
                self.out.write_all(cursor_up(lines).as_bytes())?;
            }
        } else {
            self.out.write_all(b"\n")?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
