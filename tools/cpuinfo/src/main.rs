//! `cpuinfo`: print the processor vendor, brand string and feature support.

mod config;
mod logger;

use crate::config::{CliConfig, Selection};
use crate::logger::StderrLogger;
use cpuinfo::{CpuInfo, Feature, Status};
use std::borrow::Cow;
use std::io::{self, Write};
use std::process;

/// Features printed when no names are given on the command line.
const REPORTED: &[Feature] = &[
    Feature::Amd3dnow,
    Feature::Amd3dnowext,
    Feature::Abm,
    Feature::Adx,
    Feature::Aes,
    Feature::Avx,
    Feature::Avx2,
    Feature::Avx512cd,
    Feature::Avx512f,
    Feature::Avx512pf,
    Feature::Bmi1,
    Feature::Bmi2,
    Feature::Clfsh,
    Feature::Cmpxchg16b,
    Feature::Cmpxchg8b,
    Feature::Erms,
    Feature::F16c,
    Feature::Fma,
    Feature::Fsgsbase,
    Feature::Fxsr,
    Feature::Hle,
    Feature::Invpcid,
    Feature::LahfLm,
    Feature::Lzcnt,
    Feature::Mmx,
    Feature::Mmxext,
    Feature::Monitor,
    Feature::Vmx,
    Feature::Smx,
    Feature::Eist,
    Feature::Movbe,
    Feature::Msr,
    Feature::Osxsave,
    Feature::Pclmulqdq,
    Feature::Popcnt,
    Feature::Prefetchwt1,
    Feature::Rdpid,
    Feature::Rdrand,
    Feature::Rdseed,
    Feature::Rdtscp,
    Feature::Rtm,
    Feature::Sep,
    Feature::Sha,
    Feature::Sse,
    Feature::Sse2,
    Feature::Sse3,
    Feature::Sse41,
    Feature::Sse42,
    Feature::Sse4a,
    Feature::Ssse3,
    Feature::Syscall,
    Feature::Tbm,
    Feature::Xop,
    Feature::Xsave,
];

fn main() {
    let config = match CliConfig::from_env(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("cpuinfo: {err}");
            process::exit(err.status().code());
        }
    };

    if let Err(err) = StderrLogger::new(config.log_level).init() {
        eprintln!("cpuinfo: logger unavailable: {err}");
    }

    let status = match run(&config, &mut io::stdout().lock()) {
        Ok(status) => status,
        Err(err) => {
            log::error!("writing report failed: {err}");
            Status::IO
        }
    };
    process::exit(status.code());
}

fn run(config: &CliConfig, out: &mut impl Write) -> io::Result<Status> {
    log::debug!("cache limit {}, {} selection", config.probe.cache_limit, config.selection);

    let info = match cpuinfo::initialize_with(config.probe) {
        Ok(info) => info,
        Err(err) => {
            log::error!("{err}");
            return Ok(err.status());
        }
    };
    log::info!("{} ({})", info.vendor(), info.version());

    let features = match &config.selection {
        Selection::Default => REPORTED,
        Selection::All => Feature::ALL,
        Selection::Named(list) => list.as_slice(),
    };

    match report(info, features, out)? {
        Ok(()) => Ok(Status::SUCCESS),
        Err(status) => Ok(status),
    }
}

/// Write the vendor/brand header followed by one line per feature.
fn report(
    info: &CpuInfo,
    features: &[Feature],
    out: &mut impl Write,
) -> io::Result<Result<(), Status>> {
    let mut vendor = [0u8; 16];
    let vendor_len = match info.copy_vendor_string(&mut vendor) {
        Ok(len) => len,
        Err(err) => return Ok(Err(err.status())),
    };

    let mut brand = [0u8; 64];
    let brand_len = match info.copy_brand_string(&mut brand) {
        Ok(len) => len,
        Err(err) => return Ok(Err(err.status())),
    };

    writeln!(out, "Vendor is {}", lossy(&vendor[..vendor_len]))?;
    writeln!(out, "\t{}\n", lossy(&brand[..brand_len]))?;

    for &feature in features {
        let verdict = if info.has(feature) {
            "supported"
        } else {
            "not supported"
        };
        writeln!(out, "{} is {verdict}", feature.name())?;
    }
    Ok(Ok(()))
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
