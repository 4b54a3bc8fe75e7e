//! Shared test boards: a scripted button player and recorders.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use simon_board::engine::PhotoCapture;
use simon_board::hal::{Delay, HalError, PinBackend, StopSignal};
use simon_board::types::{ButtonCode, LedIndex, Level};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    ConfigureOutput { pin: u8, initial: Level },
    ConfigureInput { pin: u8 },
    Write { pin: u8, level: Level },
    Release { pin: u8 },
    Delay(Duration),
}

/// Shared, ordered record of everything the board and delay saw
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<BoardEvent>>>);

impl EventLog {
    pub fn push(&self, event: BoardEvent) {
        self.0.lock().unwrap().push(event);
    }

    pub fn snapshot(&self) -> Vec<BoardEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<BoardEvent> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    /// LED writes as (led index, on), in order
    pub fn led_writes(&self) -> Vec<(u8, bool)> {
        self.snapshot()
            .into_iter()
            .filter_map(|e| match e {
                BoardEvent::Write { pin, level } => {
                    led_for_pin(pin).map(|led| (led.get(), level == Level::High))
                }
                _ => None,
            })
            .collect()
    }

    pub fn released_pins(&self) -> Vec<u8> {
        self.snapshot()
            .into_iter()
            .filter_map(|e| match e {
                BoardEvent::Release { pin } => Some(pin),
                _ => None,
            })
            .collect()
    }
}

pub fn led_for_pin(pin: u8) -> Option<LedIndex> {
    LedIndex::all().find(|led| led.pin() == pin)
}

pub fn code(n: u8) -> ButtonCode {
    ButtonCode::new(n).unwrap()
}

/// Plays a fixed sequence of button presses.
///
/// The next scripted button reads low once during a sweep and once more
/// during the release wait, then reads high. When the script runs out the
/// board raises `stop` if one was given, and panics otherwise.
pub struct ScriptedBoard {
    log: EventLog,
    script: VecDeque<ButtonCode>,
    held: Option<(u8, u32)>,
    stop_when_done: Option<StopSignal>,
    quiet_reads: usize,
    fail_outputs: bool,
}

impl ScriptedBoard {
    pub fn new(log: EventLog, presses: impl IntoIterator<Item = ButtonCode>) -> Self {
        Self {
            log,
            script: presses.into_iter().collect(),
            held: None,
            stop_when_done: None,
            quiet_reads: 0,
            fail_outputs: false,
        }
    }

    pub fn stop_when_done(mut self, stop: StopSignal) -> Self {
        self.stop_when_done = Some(stop);
        self
    }

    /// The first `reads` line reads come back high whatever the script says.
    pub fn quiet_for(mut self, reads: usize) -> Self {
        self.quiet_reads = reads;
        self
    }

    /// Configuring an output line fails with an I/O error.
    pub fn failing_outputs(mut self) -> Self {
        self.fail_outputs = true;
        self
    }
}

impl PinBackend for ScriptedBoard {
    fn configure_output(&mut self, pin: u8, initial: Level) -> Result<(), HalError> {
        if self.fail_outputs {
            return Err(HalError::io(
                pin,
                std::io::Error::new(std::io::ErrorKind::Other, "line busy"),
            ));
        }
        self.log.push(BoardEvent::ConfigureOutput { pin, initial });
        Ok(())
    }

    fn configure_input_pull_up(&mut self, pin: u8) -> Result<(), HalError> {
        self.log.push(BoardEvent::ConfigureInput { pin });
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), HalError> {
        self.log.push(BoardEvent::Write { pin, level });
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<Level, HalError> {
        if self.quiet_reads > 0 {
            self.quiet_reads -= 1;
            return Ok(Level::High);
        }
        if let Some((held_pin, remaining)) = self.held {
            if held_pin != pin {
                return Ok(Level::High);
            }
            if remaining == 0 {
                self.held = None;
                return Ok(Level::High);
            }
            self.held = Some((held_pin, remaining - 1));
            return Ok(Level::Low);
        }

        match self.script.front() {
            Some(next) if next.pin() == pin => {
                self.script.pop_front();
                self.held = Some((pin, 1));
                Ok(Level::Low)
            }
            Some(_) => Ok(Level::High),
            None => match &self.stop_when_done {
                Some(stop) => {
                    stop.trigger();
                    Ok(Level::High)
                }
                None => panic!("button script exhausted"),
            },
        }
    }

    fn release(&mut self, pin: u8) -> Result<(), HalError> {
        self.log.push(BoardEvent::Release { pin });
        Ok(())
    }
}

/// Records every wait instead of sleeping
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    log: EventLog,
}

impl RecordingDelay {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl Delay for RecordingDelay {
    fn delay(&mut self, duration: Duration) {
        self.log.push(BoardEvent::Delay(duration));
    }
}

/// Camera double that remembers who it photographed
#[derive(Debug, Clone, Default)]
pub struct RecordingCamera {
    pub shots: Arc<Mutex<Vec<(String, u32)>>>,
}

impl PhotoCapture for RecordingCamera {
    fn capture(&mut self, username: &str, score: u32) -> Option<String> {
        self.shots
            .lock()
            .unwrap()
            .push((username.to_string(), score));
        Some(format!("static/photos/{username}_{score}.jpg"))
    }
}
