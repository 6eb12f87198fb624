// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use clap::Parser;
use serde_derive::Serialize;

use ampscale_core::block::Block;
use ampscale_core::mapper::{Bound, Coefficient, RangeMapper};

mod config;

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "Ampscale coefficient dump", long_about = None)]
struct Args {
    /// Lower bound of range 1, in volts.
    #[arg(long, default_value_t = 0.0)]
    min1: f64,
    /// Upper bound of range 1, in volts.
    #[arg(long, default_value_t = 1.0)]
    max1: f64,
    /// Lower bound of range 2, in volts.
    #[arg(long, default_value_t = 0.0)]
    min2: f64,
    /// Upper bound of range 2, in volts.
    #[arg(long, default_value_t = 1.0)]
    max2: f64,
    /// Print the coefficients as JSON.
    #[arg(long)]
    json: bool,
    /// Daemonize the service.
    #[arg(long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report {
    scale_1_2: f64,
    offset_1_2: f64,
    scale_2_1: f64,
    offset_2_1: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = config::DumpConfig {
        global: ampscale_core::GlobalConfig::default(),
    };

    config.global.bin_name = env!("CARGO_BIN_NAME").to_string();
    config.global.daemon = args.daemon;

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.daemon {
        log_config.set_time_level(log::LevelFilter::Off);
        log_config.set_thread_level(log::LevelFilter::Off);
    } else {
        log_config.set_time_offset_to_local().ok();
        log_config.set_time_format_rfc2822();
    }

    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);

    let log_level = if args.daemon {
        log::LevelFilter::Info
    } else {
        match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    let color_choice = if args.daemon {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        color_choice,
    )?;

    if args.daemon {
        log::debug!("Running service as daemon");
    }

    log::trace!("{:#?}", config);

    dump(&config, &args)
}

fn dump(config: &config::DumpConfig, args: &Args) -> anyhow::Result<()> {
    log::info!("Starting {}", config.global.bin_name);

    let mut mapper = RangeMapper::new();

    // Feed the bounds through the named-port interface, the same way a
    // host framework wires its controls.
    for (key, value) in [
        (Bound::Min1.key(), args.min1),
        (Bound::Max1.key(), args.max1),
        (Bound::Min2.key(), args.min2),
        (Bound::Max2.key(), args.max2),
    ] {
        log::debug!("Input {} ⇨ {}", key, value);
        mapper.set_input(key, value);
    }

    mapper.update();

    if args.json {
        let report = Report {
            scale_1_2: mapper.coefficient(Coefficient::Scale12),
            offset_1_2: mapper.coefficient(Coefficient::Offset12),
            scale_2_1: mapper.coefficient(Coefficient::Scale21),
            offset_2_1: mapper.coefficient(Coefficient::Offset21),
        };

        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for key in RangeMapper::outputs() {
            println!("{:<12} {:>14.6}", key, mapper.output(key));
        }
    }

    Ok(())
}
