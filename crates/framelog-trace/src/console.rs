use std::io::Write;

use framelog_types::{CollaboratorError, Segment, Tone};

use crate::EncodedImage;

/// Host logging facility that trace output is written into.
///
/// Calls arrive in strict render order; a console must not reorder them.
pub trait Console {
    /// Opens a named group; subsequent output nests inside it until [`Console::group_end`].
    fn group(&mut self, label: &str, collapsed: bool) -> Result<(), CollaboratorError>;

    /// Closes the most recently opened group.
    fn group_end(&mut self) -> Result<(), CollaboratorError>;

    /// Emits one line made of styled segments.
    fn log(&mut self, segments: &[Segment]) -> Result<(), CollaboratorError>;

    /// Displays an encoded image at the given scale.
    fn image(&mut self, image: &EncodedImage, scale: f64) -> Result<(), CollaboratorError>;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn group(&mut self, label: &str, collapsed: bool) -> Result<(), CollaboratorError> {
        (**self).group(label, collapsed)
    }

    fn group_end(&mut self) -> Result<(), CollaboratorError> {
        (**self).group_end()
    }

    fn log(&mut self, segments: &[Segment]) -> Result<(), CollaboratorError> {
        (**self).log(segments)
    }

    fn image(&mut self, image: &EncodedImage, scale: f64) -> Result<(), CollaboratorError> {
        (**self).image(image, scale)
    }
}

/// Layout used to show a bitmap as a single styled log line: a one-character
/// "+" padded out to the image's size, with the image as its background.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBox {
    pub text: &'static str,
    pub style: String,
}

pub fn image_box(width: u32, height: u32, scale: f64) -> ImageBox {
    let width = f64::from(width) * scale;
    let height = f64::from(height) * scale;
    ImageBox {
        text: "+",
        style: format!(
            "font-size: 1px; padding: {}px {}px; line-height: {height}px;",
            (height / 2.0).floor(),
            (width / 2.0).floor(),
        ),
    }
}

// ── Text console ────────────────────────────────────────

/// Writes trace output as indented plain text, optionally with ANSI styling.
pub struct TextConsole<W> {
    out: W,
    depth: usize,
    ansi: bool,
}

impl<W: Write> TextConsole<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            depth: 0,
            ansi: false,
        }
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn indent(&mut self) -> std::io::Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(b"  ")?;
        }
        Ok(())
    }
}

fn ansi_code(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Plain | Tone::Value => None,
        Tone::Call => Some("\x1b[1m"),
        Tone::Key => Some("\x1b[2m"),
        Tone::Changed => Some("\x1b[33m"),
    }
}

impl<W: Write> Console for TextConsole<W> {
    fn group(&mut self, label: &str, collapsed: bool) -> Result<(), CollaboratorError> {
        self.indent()?;
        let marker = if collapsed { '▸' } else { '▾' };
        writeln!(self.out, "{marker} {label}")?;
        self.depth += 1;
        Ok(())
    }

    fn group_end(&mut self) -> Result<(), CollaboratorError> {
        // over-closing is tolerated
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn log(&mut self, segments: &[Segment]) -> Result<(), CollaboratorError> {
        self.indent()?;
        for segment in segments {
            match ansi_code(segment.tone).filter(|_| self.ansi) {
                Some(code) => write!(self.out, "{code}{}\x1b[0m", segment.text)?,
                None => self.out.write_all(segment.text.as_bytes())?,
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn image(&mut self, image: &EncodedImage, scale: f64) -> Result<(), CollaboratorError> {
        let layout = image_box(image.width, image.height, scale);
        self.indent()?;
        writeln!(
            self.out,
            "{} [{} {}x{}, {} bytes] {}",
            layout.text,
            image.mime,
            image.width,
            image.height,
            image.bytes.len(),
            layout.style,
        )?;
        Ok(())
    }
}

// ── Recording console ───────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCall {
    Group { label: String, collapsed: bool },
    GroupEnd,
    Log(Vec<Segment>),
    Image { width: u32, height: u32, scale: f64 },
}

/// Keeps every console call in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub calls: Vec<ConsoleCall>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text of every logged line, in order.
    pub fn lines(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ConsoleCall::Log(segments) => {
                    Some(segments.iter().map(|s| s.text.as_str()).collect())
                }
                _ => None,
            })
            .collect()
    }
}

impl Console for RecordingConsole {
    fn group(&mut self, label: &str, collapsed: bool) -> Result<(), CollaboratorError> {
        self.calls.push(ConsoleCall::Group {
            label: label.to_owned(),
            collapsed,
        });
        Ok(())
    }

    fn group_end(&mut self) -> Result<(), CollaboratorError> {
        self.calls.push(ConsoleCall::GroupEnd);
        Ok(())
    }

    fn log(&mut self, segments: &[Segment]) -> Result<(), CollaboratorError> {
        self.calls.push(ConsoleCall::Log(segments.to_vec()));
        Ok(())
    }

    fn image(&mut self, image: &EncodedImage, scale: f64) -> Result<(), CollaboratorError> {
        self.calls.push(ConsoleCall::Image {
            width: image.width,
            height: image.height,
            scale,
        });
        Ok(())
    }
}

// ── Tracing console ─────────────────────────────────────

/// Forwards every line as a `tracing` event, carrying the open group path.
#[derive(Debug, Default)]
pub struct TracingConsole {
    path: Vec<String>,
}

impl TracingConsole {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Console for TracingConsole {
    fn group(&mut self, label: &str, _collapsed: bool) -> Result<(), CollaboratorError> {
        self.path.push(label.to_owned());
        Ok(())
    }

    fn group_end(&mut self) -> Result<(), CollaboratorError> {
        self.path.pop();
        Ok(())
    }

    fn log(&mut self, segments: &[Segment]) -> Result<(), CollaboratorError> {
        let text: String = segments.iter().map(|s| s.text.as_str()).collect();
        tracing::info!(target: "framelog", group = %self.path.join(" / "), "{text}");
        Ok(())
    }

    fn image(&mut self, image: &EncodedImage, scale: f64) -> Result<(), CollaboratorError> {
        tracing::info!(
            target: "framelog",
            mime = %image.mime,
            width = image.width,
            height = image.height,
            scale,
            bytes = image.bytes.len(),
            "surface snapshot"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framelog_types::LogLine;

    #[test]
    fn image_box_halves_scaled_dimensions() {
        let layout = image_box(300, 150, 1.0);
        assert_eq!(layout.text, "+");
        assert_eq!(
            layout.style,
            "font-size: 1px; padding: 75px 150px; line-height: 150px;"
        );

        let layout = image_box(3, 5, 2.0);
        assert_eq!(
            layout.style,
            "font-size: 1px; padding: 5px 3px; line-height: 10px;"
        );
    }

    #[test]
    fn text_console_indents_groups_and_tolerates_over_closing() {
        let mut console = TextConsole::new(Vec::new());
        console.group("outer", false).unwrap();
        console.log(&LogLine::call("save()").segments).unwrap();
        console.group_end().unwrap();
        console.group_end().unwrap();
        console.log(&LogLine::changed("lineWidth", 2).segments).unwrap();

        let text = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(text, "▾ outer\n  save()\nlineWidth = 2\n");
    }

    #[test]
    fn ansi_styling_wraps_toned_segments() {
        let mut console = TextConsole::new(Vec::new()).with_ansi(true);
        console.log(&LogLine::call("fill()").segments).unwrap();
        let text = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(text, "\x1b[1mfill()\x1b[0m\n");
    }
}
