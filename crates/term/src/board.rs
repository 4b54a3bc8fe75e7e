//! TerminalBoard: a `PinBackend` that simulates the board in a terminal.
//!
//! LED lines are drawn as a row of cells. Digit keys are latched in a
//! [`PressLatch`] and each press reads low once the scan reaches its line.

use std::io::{self, ErrorKind, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{cursor, style::Print, terminal, QueueableCommand};
use tracing::debug;

use crate::board_view::{render_leds, LedStates, TITLE};
use crate::hal::{HalError, PinBackend, StopSignal};
use crate::keymap::{map_key, KeyAction};
use crate::latch::PressLatch;
use crate::types::{ButtonCode, LedIndex, Level, BUTTON_COUNT};

const KEY_POLL: Duration = Duration::from_millis(20);

type SharedLatch = Arc<Mutex<PressLatch>>;

pub struct TerminalBoard {
    stdout: io::Stdout,
    buf: Vec<u8>,
    leds: LedStates,
    presses: SharedLatch,
    reader_stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
    entered: bool,
}

impl TerminalBoard {
    /// Take over the terminal and start reading keys.
    ///
    /// `q` or Ctrl-C raises `stop` (raw mode swallows the usual SIGINT).
    pub fn enter(stop: StopSignal) -> Result<Self> {
        terminal::enable_raw_mode()?;

        let presses: SharedLatch = Arc::new(Mutex::new(PressLatch::default()));
        let reader_stop = Arc::new(AtomicBool::new(false));
        let reader = spawn_key_reader(Arc::clone(&presses), Arc::clone(&reader_stop), stop);

        let mut board = Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(1024),
            leds: [false; BUTTON_COUNT],
            presses,
            reader_stop,
            reader: Some(reader),
            entered: true,
        };

        board.buf.clear();
        board.buf.queue(terminal::EnterAlternateScreen)?;
        board.buf.queue(cursor::Hide)?;
        board.flush_buf()?;
        board.draw()?;
        Ok(board)
    }

    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;

        self.reader_stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }

        self.buf.clear();
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn draw(&mut self) -> io::Result<()> {
        self.buf.clear();
        self.buf.queue(cursor::MoveTo(0, 0))?;
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.buf.queue(Print(TITLE))?;
        self.buf.queue(cursor::MoveTo(2, 2))?;
        self.buf.queue(Print(render_leds(&self.leds)))?;
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()
    }

    fn set_led_line(&mut self, pin: u8, on: bool) -> Result<(), HalError> {
        let led = led_for_pin(pin)?;
        self.leds[(led.get() - 1) as usize] = on;
        self.draw().map_err(|e| HalError::io(pin, e))
    }
}

impl PinBackend for TerminalBoard {
    fn configure_output(&mut self, pin: u8, initial: Level) -> Result<(), HalError> {
        self.set_led_line(pin, initial == Level::High)
    }

    fn configure_input_pull_up(&mut self, pin: u8) -> Result<(), HalError> {
        button_for_pin(pin).map(|_| ())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), HalError> {
        self.set_led_line(pin, level == Level::High)
    }

    fn read(&mut self, pin: u8) -> Result<Level, HalError> {
        let code = button_for_pin(pin)?;
        let mut presses = self.presses.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(presses.read(code, Instant::now()))
    }

    fn release(&mut self, pin: u8) -> Result<(), HalError> {
        if led_for_pin(pin).is_ok() {
            self.set_led_line(pin, false)
        } else {
            button_for_pin(pin).map(|_| ())
        }
    }
}

impl Drop for TerminalBoard {
    fn drop(&mut self) {
        // Always try to restore terminal state.
        let _ = self.exit();
    }
}

fn spawn_key_reader(
    presses: SharedLatch,
    reader_stop: Arc<AtomicBool>,
    stop: StopSignal,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while !reader_stop.load(Ordering::SeqCst) {
            match event::poll(KEY_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(_) => break,
            }
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match map_key(key) {
                Some(KeyAction::Press(code)) => {
                    debug!(button = %code, "key press");
                    let mut presses = presses.lock().unwrap_or_else(PoisonError::into_inner);
                    presses.press(code, Instant::now());
                }
                Some(KeyAction::Quit) => stop.trigger(),
                None => {}
            }
        }
    })
}

fn led_for_pin(pin: u8) -> Result<LedIndex, HalError> {
    LedIndex::all()
        .find(|led| led.pin() == pin)
        .ok_or_else(|| unknown_line(pin))
}

fn button_for_pin(pin: u8) -> Result<ButtonCode, HalError> {
    ButtonCode::scan_order()
        .find(|code| code.pin() == pin)
        .ok_or_else(|| unknown_line(pin))
}

fn unknown_line(pin: u8) -> HalError {
    HalError::io(pin, io::Error::new(ErrorKind::InvalidInput, "not a board line"))
}
