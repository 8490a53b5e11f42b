//! Screen: owns the terminal and flushes board frames to it.
//!
//! Frames are encoded as spans. The first frame, and any frame after a resize
//! or [`Screen::invalidate`], is one span per row; after that only the spans
//! that differ from the previous frame are sent. The painter tracks the
//! terminal cursor and the active style so adjacent spans and repeated colors
//! cost nothing extra.

use std::io::{self, Write};
use std::ops::Range;

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, Emphasis, FrameBuffer, Rgb};

pub struct Screen<W: Write> {
    out: W,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Screen<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Screen<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.last = None;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Send `fb` and keep it as the reference for the next frame. The old
    /// reference is handed back through `fb`; callers redraw it from scratch.
    /// Returns the number of bytes written.
    pub fn present(&mut self, fb: &mut FrameBuffer) -> Result<usize> {
        self.buf.clear();
        encode_frame(self.last.as_ref(), fb, &mut self.buf)?;
        let written = self.buf.len();
        self.flush_buf()?;

        let prev = self
            .last
            .replace(std::mem::replace(fb, FrameBuffer::new(0, 0)));
        if let Some(prev) = prev {
            *fb = prev;
        }
        Ok(written)
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()
    }
}

/// Encode `next` into `out`. Without a same-sized `prev` the screen is cleared
/// and every row is sent; otherwise only changed spans are. Identical frames
/// encode to nothing.
pub fn encode_frame(
    prev: Option<&FrameBuffer>,
    next: &FrameBuffer,
    out: &mut Vec<u8>,
) -> Result<()> {
    let mut painter = Painter::new(out);
    let prev = prev.filter(|p| p.same_size(next));
    if prev.is_none() {
        painter.out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    for y in 0..next.height() {
        let Some(row) = next.row(y) else { continue };
        match prev.and_then(|p| p.row(y)) {
            Some(old) => {
                for span in changed_spans(old, row) {
                    painter.paint(span.start as u16, y, &row[span])?;
                }
            }
            None => painter.paint(0, y, row)?,
        }
    }
    painter.finish()
}

/// Column ranges where `old` and `new` differ, merged into maximal runs.
pub fn changed_spans<'a>(
    old: &'a [Cell],
    new: &'a [Cell],
) -> impl Iterator<Item = Range<usize>> + 'a {
    let mut x = 0;
    std::iter::from_fn(move || {
        let differs = |i: usize| old.get(i) != new.get(i);
        while x < new.len() && !differs(x) {
            x += 1;
        }
        if x >= new.len() {
            return None;
        }
        let start = x;
        while x < new.len() && differs(x) {
            x += 1;
        }
        Some(start..x)
    })
}

/// Writes cells while remembering where the terminal cursor is and which
/// style is active.
struct Painter<'a> {
    out: &'a mut Vec<u8>,
    at: Option<(u16, u16)>,
    style: Option<CellStyle>,
}

impl<'a> Painter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            at: None,
            style: None,
        }
    }

    fn paint(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        if cells.is_empty() {
            return Ok(());
        }
        if self.at != Some((x, y)) {
            self.out.queue(cursor::MoveTo(x, y))?;
        }
        for cell in cells {
            self.restyle(cell.style)?;
            self.out.queue(Print(cell.ch))?;
        }
        self.at = Some((x + cells.len() as u16, y));
        Ok(())
    }

    /// Emit only the parts of `style` that differ from the active one. A
    /// change of emphasis needs an attribute reset, which also drops colors.
    fn restyle(&mut self, style: CellStyle) -> Result<()> {
        let active = match self.style {
            Some(active) if active == style => return Ok(()),
            Some(active) if active.emphasis == style.emphasis => Some(active),
            _ => None,
        };
        if active.is_none() {
            self.out.queue(SetAttribute(Attribute::Reset))?;
            match style.emphasis {
                Emphasis::Plain => {}
                Emphasis::Bold => {
                    self.out.queue(SetAttribute(Attribute::Bold))?;
                }
                Emphasis::Dim => {
                    self.out.queue(SetAttribute(Attribute::Dim))?;
                }
            }
        }
        if active.map(|a| a.fg) != Some(style.fg) {
            self.out.queue(SetForegroundColor(term_color(style.fg)))?;
        }
        if active.map(|a| a.bg) != Some(style.bg) {
            self.out.queue(SetBackgroundColor(term_color(style.bg)))?;
        }
        self.style = Some(style);
        Ok(())
    }

    fn finish(self) -> Result<()> {
        if self.style.is_some() {
            self.out.queue(ResetColor)?;
            self.out.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

fn term_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
