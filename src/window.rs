use {
    super::*,
    crate::{
        dashboard::Dashboard,
        frame::{Cell, Frame, Style},
        input::Command,
        layout::ResizeFlag,
    },
    crossterm::{
        ExecutableCommand, QueueableCommand, cursor,
        event::{self, Event},
        style::{self, Stylize},
        terminal,
    },
    std::{
        io::{BufWriter, Stdout, Write},
        time::Duration,
    },
    tracing::{info, warn},
};

/// the terminal, while it is being drawn to.
///
/// the terminal is put into raw mode and switched to its alternate screen for as long as this
/// is alive, and restored when it is closed or dropped.
struct Terminal {
    stdout: BufWriter<Stdout>,
    /// whether the terminal has already been restored.
    closed: bool,
}

impl App {
    /// runs the dashboard until the user quits.
    pub fn run(self) -> Result<(), crate::Error> {
        let Self { mut sentinel } = self;

        let mut terminal = Terminal::open()?;
        let (width, height) = terminal::size()?;
        let devices = sentinel.devices().clone();
        let mut dashboard = Dashboard::new(width, height, sentinel.clock_ticks(), devices);
        let resize = ResizeFlag::default();
        info!(width, height, "opened terminal");

        while dashboard.is_running() {
            if resize.take() {
                dashboard.resized();
            }
            let (width, height) = terminal::size()?;
            if dashboard.relayout(width, height) {
                terminal.clear()?;
            }

            for command in terminal.commands(&resize)? {
                dashboard.apply(command);
            }

            dashboard.ingest(sentinel.observe());
            terminal.present(dashboard.draw())?;

            if dashboard.is_running() {
                std::thread::sleep(dashboard.interval());
            }
        }

        terminal.close()?;
        info!("closed terminal");
        Ok(())
    }
}

// === impl Terminal ===

impl Terminal {
    fn open() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;

        // from here on, dropping the terminal restores it.
        let mut session = Self {
            stdout: BufWriter::new(io::stdout()),
            closed: false,
        };
        session
            .stdout
            .get_mut()
            .execute(terminal::EnterAlternateScreen)?
            .execute(cursor::Hide)?
            .execute(terminal::Clear(terminal::ClearType::All))?;

        Ok(session)
    }

    /// restores the terminal.
    fn close(mut self) -> Result<(), io::Error> {
        self.restore()
    }

    fn restore(&mut self) -> Result<(), io::Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        // every step is attempted, so that a failure to redraw the cursor still leaves raw mode.
        let shown = self.stdout.flush().and_then(|()| {
            self.stdout
                .get_mut()
                .execute(cursor::Show)?
                .execute(terminal::LeaveAlternateScreen)
                .map(drop)
        });
        let cooked = terminal::disable_raw_mode();
        shown.and(cooked)
    }

    /// clears the screen.
    fn clear(&mut self) -> Result<(), io::Error> {
        self.stdout
            .queue(terminal::Clear(terminal::ClearType::All))
            .map(drop)
    }

    /// returns the commands typed since this was last called, without blocking.
    ///
    /// raises the resize flag if the terminal was resized.
    fn commands(&mut self, resize: &ResizeFlag) -> Result<Vec<Command>, io::Error> {
        let mut commands = Vec::new();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => commands.extend(Command::from_key(key)),
                Event::Resize(..) => resize.raise(),
                _ => {}
            }
        }

        Ok(commands)
    }

    /// draws a frame, replacing whatever was on screen.
    ///
    /// neighboring cells sharing a style are printed together, and the terminal is flushed once
    /// the whole frame has been queued.
    fn present(&mut self, frame: &Frame) -> Result<(), io::Error> {
        let Self { stdout, .. } = self;

        for y in 0..frame.height() {
            stdout.queue(cursor::MoveTo(0, y))?;
            for run in frame.row(y).chunk_by(|a, b| a.style == b.style) {
                let Some(Cell { style, .. }) = run.first() else {
                    continue;
                };
                let text = run
                    .iter()
                    .filter(|c| !c.is_wide_tail())
                    .map(|c| c.glyph)
                    .collect::<String>();
                stdout.queue(style::PrintStyledContent(Self::styled(text, *style)))?;
            }
        }

        stdout.flush()
    }

    fn styled(text: String, style: Style) -> style::StyledContent<String> {
        let Style { fg, bold, dim } = style;

        let mut styled = text.stylize();
        if let Some(color) = fg {
            styled = styled.with(color);
        }
        if bold {
            styled = styled.bold();
        }
        if dim {
            styled = styled.dim();
        }
        styled
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(error) = self.restore() {
            warn!(%error, "failed to restore the terminal");
        }
    }
}
