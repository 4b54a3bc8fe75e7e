//! Linux sysfs GPIO backend (`/sys/class/gpio`)
//!
//! Pins are board (BCM) numbers. The kernel line number is the pin plus the
//! base of the SoC's GPIO chip, which is 0 on older kernels and e.g. 512 on a
//! Raspberry Pi running 6.6 or later. [`detect_base`] reads it from the
//! `gpiochip*` entries.
//!
//! The sysfs interface has no way to set line bias, so pull-ups are applied
//! by an external command (by default `pinctrl set {pin} ip pu`). Without it
//! the pull-up has to come from boot config, e.g. in `config.txt`:
//!
//! ```text
//! gpio=6,12,13,16,19,20,26,21=ip,pu
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::types::Level;
use crate::{HalError, PinBackend};

/// Default sysfs GPIO root
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// Default pull-up command and arguments. `{pin}` is the BCM pin number.
pub const DEFAULT_BIAS_PROGRAM: &str = "pinctrl";
pub const DEFAULT_BIAS_ARGS: &[&str] = &["set", "{pin}", "ip", "pu"];

/// Attempts while waiting for udev to publish a freshly exported line
const EXPORT_WAIT_ATTEMPTS: u32 = 20;
const EXPORT_WAIT_STEP: Duration = Duration::from_millis(10);

/// External program that sets a pull-up on one pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiasCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl BiasCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Default for BiasCommand {
    fn default() -> Self {
        Self::new(
            DEFAULT_BIAS_PROGRAM,
            DEFAULT_BIAS_ARGS.iter().map(|a| a.to_string()).collect(),
        )
    }
}

#[derive(Debug)]
pub struct SysfsGpio {
    root: PathBuf,
    base: u32,
    bias: Option<BiasCommand>,
    exported: BTreeSet<u8>,
    bias_warned: bool,
}

impl SysfsGpio {
    /// Lines numbered from `base` 0 and no bias command.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            base: 0,
            bias: None,
            exported: BTreeSet::new(),
            bias_warned: false,
        }
    }

    /// Use the chip base found under `root`.
    pub fn detect(root: impl Into<PathBuf>) -> Self {
        let gpio = Self::new(root);
        let base = detect_base(&gpio.root);
        info!(root = %gpio.root.display(), base, "gpio chip base");
        gpio.with_base(base)
    }

    pub fn with_base(mut self, base: u32) -> Self {
        self.base = base;
        self
    }

    pub fn with_bias_command(mut self, bias: BiasCommand) -> Self {
        self.bias = Some(bias);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Kernel line number for a board pin
    pub fn line(&self, pin: u8) -> u32 {
        self.base + u32::from(pin)
    }

    fn line_dir(&self, pin: u8) -> PathBuf {
        self.root.join(format!("gpio{}", self.line(pin)))
    }

    fn write_attr(&self, pin: u8, attr: &str, value: &str) -> Result<(), HalError> {
        fs::write(self.line_dir(pin).join(attr), value).map_err(|e| HalError::io(pin, e))
    }

    fn export(&mut self, pin: u8) -> Result<(), HalError> {
        let dir = self.line_dir(pin);
        if !dir.exists() {
            fs::write(self.root.join("export"), self.line(pin).to_string())
                .map_err(|e| HalError::io(pin, e))?;

            let mut attempts = 0;
            while !dir.exists() {
                attempts += 1;
                if attempts > EXPORT_WAIT_ATTEMPTS {
                    return Err(HalError::io(
                        pin,
                        io::Error::new(ErrorKind::NotFound, "line did not appear after export"),
                    ));
                }
                thread::sleep(EXPORT_WAIT_STEP);
            }
        }
        self.exported.insert(pin);
        debug!(pin, line = self.line(pin), "gpio exported");
        Ok(())
    }

    fn pull_up(&mut self, pin: u8) -> Result<(), HalError> {
        let Some(bias) = &self.bias else {
            self.warn_no_bias("no bias command configured");
            return Ok(());
        };

        let pin_arg = pin.to_string();
        let line_arg = self.line(pin).to_string();
        let args = bias
            .args
            .iter()
            .map(|a| a.replace("{pin}", &pin_arg).replace("{line}", &line_arg));

        let result = Command::new(&bias.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match result {
            Ok(status) if status.success() => {
                debug!(pin, "pull-up set");
                Ok(())
            }
            Ok(status) => Err(HalError::io(
                pin,
                io::Error::new(
                    ErrorKind::Other,
                    format!("{:?} exited with {}", bias.program, status),
                ),
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let reason = format!("bias command {:?} not found", bias.program);
                self.warn_no_bias(&reason);
                Ok(())
            }
            Err(e) => Err(HalError::io(pin, e)),
        }
    }

    fn warn_no_bias(&mut self, reason: &str) {
        if !self.bias_warned {
            warn!(reason, "cannot set pull-up bias; button lines must be pulled up by boot config");
            self.bias_warned = true;
        }
    }
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new(SYSFS_GPIO_ROOT)
    }
}

impl PinBackend for SysfsGpio {
    fn configure_output(&mut self, pin: u8, initial: Level) -> Result<(), HalError> {
        self.export(pin)?;
        // "low"/"high" set direction and value in one write, so the line never glitches.
        let direction = match initial {
            Level::Low => "low",
            Level::High => "high",
        };
        self.write_attr(pin, "direction", direction)
    }

    fn configure_input_pull_up(&mut self, pin: u8) -> Result<(), HalError> {
        self.export(pin)?;
        self.write_attr(pin, "direction", "in")?;
        self.pull_up(pin)
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), HalError> {
        let value = match level {
            Level::Low => "0",
            Level::High => "1",
        };
        self.write_attr(pin, "value", value)
    }

    fn read(&mut self, pin: u8) -> Result<Level, HalError> {
        let raw = fs::read_to_string(self.line_dir(pin).join("value"))
            .map_err(|e| HalError::io(pin, e))?;
        match raw.trim() {
            "0" => Ok(Level::Low),
            "1" => Ok(Level::High),
            other => Err(HalError::io(
                pin,
                io::Error::new(
                    ErrorKind::InvalidData,
                    format!("unexpected value {:?}", other),
                ),
            )),
        }
    }

    fn release(&mut self, pin: u8) -> Result<(), HalError> {
        if !self.exported.remove(&pin) {
            return Ok(());
        }
        self.write_attr(pin, "direction", "in")?;
        fs::write(self.root.join("unexport"), self.line(pin).to_string())
            .map_err(|e| HalError::io(pin, e))
    }
}

/// Base of the SoC GPIO chip under `root`.
///
/// Prefers a chip whose label starts with `pinctrl-`, then the lowest base
/// found. A root without `gpiochip*` entries gives 0.
pub fn detect_base(root: &Path) -> u32 {
    let Ok(entries) = fs::read_dir(root) else {
        return 0;
    };

    let mut chips: Vec<(u32, String)> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("gpiochip"))
        .filter_map(|e| {
            let dir = e.path();
            let base = fs::read_to_string(dir.join("base")).ok()?.trim().parse().ok()?;
            let label = fs::read_to_string(dir.join("label"))
                .map(|l| l.trim().to_string())
                .unwrap_or_default();
            Some((base, label))
        })
        .collect();
    chips.sort();

    chips
        .iter()
        .find(|(_, label)| label.starts_with("pinctrl-"))
        .or_else(|| chips.first())
        .map_or(0, |(base, _)| *base)
}
