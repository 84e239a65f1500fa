//! Locating the game installation and matching client versions.

use crate::error::{Error, SC2Result};
use std::path::{Path, PathBuf};

/// Game directory: `SC2PATH` if set, the install path recorded by the
/// launcher on Windows, or the conventional default per OS.
pub fn get_path_to_sc2() -> SC2Result<String> {
	if let Some(path) = std::env::var_os("SC2PATH") {
		return path
			.into_string()
			.map_err(|_| Error::Config("SC2PATH is not valid unicode".to_string()));
	}

	#[cfg(target_os = "windows")]
	if let Some(path) = windows::path_from_execute_info() {
		return Ok(path);
	}

	if cfg!(target_os = "windows") {
		Ok("C:/Program Files (x86)/StarCraft II".to_string())
	} else if cfg!(target_os = "linux") {
		Ok(format!(
			"{}/StarCraftII",
			std::env::var("HOME").unwrap_or_else(|_| "~".to_string())
		))
	} else {
		Err(Error::Sc2NotFound(
			"no default game path for this OS, set SC2PATH".to_string(),
		))
	}
}

/// Newest `Versions/Base*` folder in the game directory.
pub fn get_latest_base_version(sc2_path: &str) -> SC2Result<u32> {
	Path::new(&format!("{}/Versions", sc2_path))
		.read_dir()?
		.filter_map(|dir| {
			let dir = dir.ok()?;
			if !dir.file_type().ok()?.is_dir() {
				return None;
			}
			dir.file_name()
				.to_str()?
				.strip_prefix("Base")?
				.parse::<u32>()
				.ok()
		})
		.max()
		.ok_or_else(|| Error::Sc2NotFound(format!("no Base* folders in {}/Versions", sc2_path)))
}

/// Executable path for a base version.
pub fn executable_path(sc2_path: &str, base_version: u32) -> PathBuf {
	let binary = if cfg!(target_os = "windows") {
		"SC2_x64.exe"
	} else {
		"SC2_x64"
	};
	PathBuf::from(format!(
		"{}/Versions/Base{}/{}",
		sc2_path, base_version, binary
	))
}

/// Base build number of a published game version, for replays and ladder
/// version pinning.
pub fn get_base_version(version: &str) -> SC2Result<u32> {
	Ok(match version {
		"4.11.4" => 78285,
		"4.11.3" => 77661,
		"4.11.2" => 77535,
		"4.11.1" => 77474,
		"4.11" | "4.11.0" => 77379,
		"4.10.4" => 76811,
		"4.10.3" => 76114,
		"4.10.2" => 76052,
		"4.10.1" => 75800,
		"4.10" | "4.10.0" => 75689,
		"4.9.3" => 75025,
		"4.9.2" => 74741,
		"4.9.1" => 74456,
		"4.9" | "4.9.0" => 74071,
		"4.8.6" => 73620,
		"4.8.5" => 73559,
		"4.8.4" => 73286,
		"4.8.3" => 72282,
		"4.8.2" => 71663,
		"4.8.1" => 71523,
		"4.8" | "4.8.0" => 71061,
		v => {
			return Err(Error::Config(format!(
				"unknown game version {:?}, pass a base build instead",
				v
			)))
		}
	})
}

#[cfg(target_os = "windows")]
mod windows {
	use dirs::home_dir;
	use regex::Regex;
	use std::{fs::read_to_string, path::Path};

	/// The launcher records the install path in ExecuteInfo.txt.
	pub fn path_from_execute_info() -> Option<String> {
		let file = read_to_string(format!(
			"{}/Documents/StarCraft II/ExecuteInfo.txt",
			home_dir()?.to_str()?,
		))
		.ok()?;
		let captures = Regex::new(r"= (.*)\\Versions").ok()?.captures(&file)?;
		let path = Path::new(&captures[1]);
		if path.exists() {
			Some(path.to_str()?.replace('\\', "/"))
		} else {
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_versions_resolve() {
		assert_eq!(get_base_version("4.10").ok(), Some(75689));
		assert_eq!(get_base_version("4.10.0").ok(), Some(75689));
		assert!(get_base_version("3.0").is_err());
	}
}
