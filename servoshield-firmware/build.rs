//! Build script for servoshield-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates shield.toml at compile time
//! - Generates the board constants the firmware includes

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use servoshield_core::timing::{SERVO_MAX_SAFE_US, SERVO_MIN_SAFE_US};
use servoshield_core::BusAddresses;

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
}

/// Validated shield.toml contents
struct FirmwareConfig {
    addresses: BusAddresses,
    use_gating_pins: bool,
    readback: bool,
    frequency_khz: u32,
    sweep_min_us: u32,
    sweep_max_us: u32,
    sweep_step_us: u32,
    sweep_interval_ms: u32,
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate shield.toml configuration at compile time
fn validate_config() -> FirmwareConfig {
    // Re-run if shield.toml changes
    println!("cargo:rerun-if-changed=shield.toml");

    let config_path = Path::new("shield.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read shield.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(str::to_owned).collect();
            fail("Invalid TOML syntax in shield.toml", &lines);
        }
    };

    let mut errors = Vec::new();

    let shield = config.get("shield").and_then(|s| s.as_table());
    if shield.is_none() {
        errors.push("Missing [shield] section".to_string());
    }
    let empty = toml::map::Map::new();
    let shield = shield.unwrap_or(&empty);

    let addresses = match (shield.get("jumpers"), shield.get("addresses")) {
        (Some(_), Some(_)) => {
            errors.push("[shield] set either 'jumpers' or 'addresses', not both".to_string());
            BusAddresses::NO_JUMPERS_SET
        }
        (Some(toml::Value::Integer(bits)), None) => {
            match u8::try_from(*bits)
                .ok()
                .and_then(|b| BusAddresses::from_jumpers(b).ok())
            {
                Some(addresses) => addresses,
                None => {
                    errors.push("[shield] jumpers must be 0-31".to_string());
                    BusAddresses::NO_JUMPERS_SET
                }
            }
        }
        (Some(_), None) => {
            errors.push("[shield] jumpers must be an integer".to_string());
            BusAddresses::NO_JUMPERS_SET
        }
        (None, Some(value)) => match value.clone().try_into::<BusAddresses>() {
            Ok(addresses) => addresses,
            Err(e) => {
                errors.push(format!("[shield] addresses: {}", e));
                BusAddresses::NO_JUMPERS_SET
            }
        },
        (None, None) => BusAddresses::NO_JUMPERS_SET,
    };

    if let Err(e) = addresses.validate() {
        errors.push(format!("[shield] addresses rejected: {:?}", e));
    }

    let use_gating_pins = bool_field(shield, "shield", "use_gating_pins", true, &mut errors);
    let readback = bool_field(shield, "shield", "readback", false, &mut errors);

    let i2c = config
        .get("i2c")
        .and_then(|s| s.as_table())
        .unwrap_or(&empty);
    let frequency_khz = int_field(i2c, "i2c", "frequency_khz", 100, &mut errors);
    if ![100, 400, 1000].contains(&frequency_khz) {
        errors.push("[i2c] frequency_khz must be 100, 400 or 1000".to_string());
    }

    let sweep = config
        .get("sweep")
        .and_then(|s| s.as_table())
        .unwrap_or(&empty);
    let sweep_min_us = int_field(sweep, "sweep", "min_us", SERVO_MIN_SAFE_US, &mut errors);
    let sweep_max_us = int_field(sweep, "sweep", "max_us", SERVO_MAX_SAFE_US, &mut errors);
    let sweep_step_us = int_field(sweep, "sweep", "step_us", 10, &mut errors);
    let sweep_interval_ms = int_field(sweep, "sweep", "interval_ms", 20, &mut errors);

    if sweep_min_us > sweep_max_us {
        errors.push("[sweep] min_us must not exceed max_us".to_string());
    }
    if sweep_step_us == 0 {
        errors.push("[sweep] step_us must be at least 1".to_string());
    }
    if sweep_interval_ms == 0 {
        errors.push("[sweep] interval_ms must be at least 1".to_string());
    }

    if !errors.is_empty() {
        fail("Invalid configuration in shield.toml", &errors);
    }

    // Outside the usual servo range is allowed, but worth a warning
    if sweep_min_us < SERVO_MIN_SAFE_US || sweep_max_us > SERVO_MAX_SAFE_US {
        println!(
            "cargo:warning=sweep range {}-{}us exceeds the typical servo range {}-{}us",
            sweep_min_us, sweep_max_us, SERVO_MIN_SAFE_US, SERVO_MAX_SAFE_US
        );
    }

    println!("cargo:warning=shield.toml validated successfully");

    FirmwareConfig {
        addresses,
        use_gating_pins,
        readback,
        frequency_khz,
        sweep_min_us,
        sweep_max_us,
        sweep_step_us,
        sweep_interval_ms,
    }
}

/// Write the validated values as Rust constants
fn generate_config(config: &FirmwareConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("shield_config.rs")).unwrap();

    writeln!(f, "// Generated from shield.toml by build.rs").unwrap();
    writeln!(
        f,
        "pub const SHIELD_CONFIG: ShieldConfig =\n    \
         ShieldConfig::new(BusAddresses::new({:#04x}, {:#04x}), {});",
        config.addresses.chip_a, config.addresses.chip_b, config.use_gating_pins
    )
    .unwrap();
    writeln!(f, "pub const READBACK: bool = {};", config.readback).unwrap();
    writeln!(f, "pub const I2C_FREQUENCY_KHZ: u32 = {};", config.frequency_khz).unwrap();
    writeln!(f, "pub const SWEEP_MIN_US: u32 = {};", config.sweep_min_us).unwrap();
    writeln!(f, "pub const SWEEP_MAX_US: u32 = {};", config.sweep_max_us).unwrap();
    writeln!(f, "pub const SWEEP_STEP_US: u32 = {};", config.sweep_step_us).unwrap();
    writeln!(f, "pub const SWEEP_INTERVAL_MS: u64 = {};", config.sweep_interval_ms).unwrap();
}

fn bool_field(
    table: &toml::map::Map<String, toml::Value>,
    section: &str,
    key: &str,
    default: bool,
    errors: &mut Vec<String>,
) -> bool {
    match table.get(key) {
        None => default,
        Some(toml::Value::Boolean(b)) => *b,
        Some(_) => {
            errors.push(format!("[{}] {} must be true or false", section, key));
            default
        }
    }
}

fn int_field(
    table: &toml::map::Map<String, toml::Value>,
    section: &str,
    key: &str,
    default: u32,
    errors: &mut Vec<String>,
) -> u32 {
    match table.get(key) {
        None => default,
        Some(toml::Value::Integer(i)) => match u32::try_from(*i) {
            Ok(v) => v,
            Err(_) => {
                errors.push(format!("[{}] {} must be a positive integer", section, key));
                default
            }
        },
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
