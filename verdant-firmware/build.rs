//! Build script for verdant-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates plant.toml at compile time
//! - Generates the compiled-in defaults from plant.toml

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    let config = load_config();
    let defaults = validate_config(&config);
    write_defaults(&defaults);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse plant.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=plant.toml");

    let config_path = Path::new("plant.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: plant.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a plant.toml configuration file           ║\n\
            ║  in the verdant-firmware directory.                              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read plant.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in plant.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validated values ready to be emitted as constants
struct Defaults {
    name: String,
    start_date: (u16, u8, u8),
    moisture_threshold: i64,
    initial_date: (u16, u8, u8),
    idle_timeout_ms: u64,
    poll_interval_ms: u64,
    reading_interval_ms: u64,
    countdown_s: u64,
    calibration_samples: u64,
    calibration_interval_ms: u64,
    settle_ms: u64,
}

fn validate_config(config: &toml::Value) -> Defaults {
    let mut errors = Vec::new();

    let name = string(config, "plant", "name", &mut errors).unwrap_or_default();
    if name.is_empty() {
        errors.push("[plant] name must not be empty".to_string());
    } else if name.len() > 16 || !name.is_ascii() {
        errors.push(format!(
            "[plant] name '{}' must be at most 16 ASCII characters",
            name
        ));
    }

    let start_date = date(config, "plant", "start_date", &mut errors);
    let initial_date = date(config, "clock", "initial_date", &mut errors);

    let moisture_threshold =
        integer(config, "plant", "moisture_threshold", 0, 100, &mut errors);

    let idle_timeout_ms = integer(config, "timing", "idle_timeout_ms", 500, 600_000, &mut errors);
    let poll_interval_ms =
        integer(config, "timing", "poll_interval_ms", 100, 600_000, &mut errors);
    if poll_interval_ms > idle_timeout_ms {
        errors.push(format!(
            "[timing] poll_interval_ms ({}) must not exceed idle_timeout_ms ({})",
            poll_interval_ms, idle_timeout_ms
        ));
    }

    let reading_interval_ms =
        integer(config, "moisture", "sample_interval_ms", 0, 10_000, &mut errors);

    let countdown_s = integer(config, "calibration", "countdown_s", 0, 60, &mut errors);
    let calibration_samples = integer(config, "calibration", "samples", 1, 10_000, &mut errors);
    let calibration_interval_ms =
        integer(config, "calibration", "sample_interval_ms", 0, 10_000, &mut errors);
    let settle_ms = integer(config, "calibration", "settle_ms", 0, 60_000, &mut errors);

    if !errors.is_empty() {
        let msg = errors.join("\n");
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: plant.toml validation failed                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&msg)
        );
    }

    println!("cargo:warning=plant.toml validated successfully");

    Defaults {
        name,
        start_date: start_date.unwrap_or((1970, 1, 1)),
        moisture_threshold: moisture_threshold as i64,
        initial_date: initial_date.unwrap_or((1970, 1, 1)),
        idle_timeout_ms,
        poll_interval_ms,
        reading_interval_ms,
        countdown_s,
        calibration_samples,
        calibration_interval_ms,
        settle_ms,
    }
}

fn lookup<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

fn string(
    config: &toml::Value,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match lookup(config, section, key) {
        Some(toml::Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(format!("[{}] {} must be a string", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] {} is required", section, key));
            None
        }
    }
}

fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> u64 {
    match lookup(config, section, key) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => *v as u64,
        Some(toml::Value::Integer(v)) => {
            errors.push(format!(
                "[{}] {} = {} is out of range ({}..={})",
                section, key, v, min, max
            ));
            0
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            0
        }
        None => {
            errors.push(format!("[{}] {} is required", section, key));
            0
        }
    }
}

/// Parse a `YYYY-MM-DD` string
fn date(
    config: &toml::Value,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<(u16, u8, u8)> {
    let text = string(config, section, key, errors)?;
    let parts: Vec<&str> = text.split('-').collect();

    let parsed = match parts.as_slice() {
        [y, m, d] => match (y.parse::<u16>(), m.parse::<u8>(), d.parse::<u8>()) {
            (Ok(y), Ok(m), Ok(d)) => Some((y, m, d)),
            _ => None,
        },
        _ => None,
    };

    match parsed {
        Some((y, m, d)) if y >= 1970 && (1..=12).contains(&m) && d >= 1 && d <= days_in_month(y, m) => {
            Some((y, m, d))
        }
        _ => {
            errors.push(format!(
                "[{}] {} = '{}' is not a valid YYYY-MM-DD date",
                section, key, text
            ));
            None
        }
    }
}

fn days_in_month(year: u16, month: u8) -> u8 {
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    match month {
        2 if leap => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Emit `plant_defaults.rs` into OUT_DIR
fn write_defaults(d: &Defaults) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("plant_defaults.rs")).unwrap();

    writeln!(f, "// Generated from plant.toml by build.rs").unwrap();
    writeln!(f, "pub const PLANT_NAME: &str = {:?};", d.name).unwrap();
    writeln!(
        f,
        "pub const START_DATE: Date = Date::new({}, {}, {});",
        d.start_date.0, d.start_date.1, d.start_date.2
    )
    .unwrap();
    writeln!(f, "pub const MOISTURE_THRESHOLD: i32 = {};", d.moisture_threshold).unwrap();
    writeln!(
        f,
        "pub const CLOCK_INITIAL_DATE: Date = Date::new({}, {}, {});",
        d.initial_date.0, d.initial_date.1, d.initial_date.2
    )
    .unwrap();
    writeln!(f, "pub const IDLE_TIMEOUT_MS: u64 = {};", d.idle_timeout_ms).unwrap();
    writeln!(f, "pub const POLL_INTERVAL_MS: u64 = {};", d.poll_interval_ms).unwrap();
    writeln!(f, "pub const READING_INTERVAL_MS: u32 = {};", d.reading_interval_ms).unwrap();
    writeln!(
        f,
        "pub const CALIBRATION_TIMING: CalibrationTiming = CalibrationTiming {{ \
         countdown_s: {}, samples: {}, sample_interval_ms: {}, settle_ms: {} }};",
        d.countdown_s, d.calibration_samples, d.calibration_interval_ms, d.settle_ms
    )
    .unwrap();
}
