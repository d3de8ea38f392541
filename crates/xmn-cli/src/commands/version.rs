//! Version command implementation.

use std::cmp::Ordering;

use anyhow::Result;
use xmn_core::Version;

/// Run the version command
pub fn run(left: &str, right: &str) -> Result<()> {
    let left_version = Version::from_app_version(left)?;
    let right_version = Version::from_app_version(right)?;

    let symbol = match left_version.cmp(&right_version) {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    println!("{} {} {}", left_version, symbol, right_version);
    Ok(())
}
