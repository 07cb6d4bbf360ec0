use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
    Unknown,
}

pub fn detect() -> Platform {
    match std::env::consts::OS {
        "macos" => Platform::MacOS,
        "linux" => Platform::Linux,
        "windows" => Platform::Windows,
        _ => Platform::Unknown,
    }
}

/// Speech program and (male, female) voices that ship with the platform.
/// macOS has `say`; everywhere else espeak is the usual choice.
pub fn default_speech(platform: Platform) -> (&'static str, &'static str, &'static str) {
    match platform {
        Platform::MacOS => ("say", "Alex", "Victoria"),
        _ => ("espeak", "en+m3", "en+f3"),
    }
}

/// Arguments that make the speech program exit quickly without speaking.
pub fn speech_probe(program: &str) -> &'static [&'static str] {
    match program {
        "say" => &["-v", "?"],
        _ => &["--version"],
    }
}

/// Returns true when `program` can be started with the given probe args.
pub fn command_available(program: &str, probe: &[&str]) -> bool {
    Command::new(program)
        .args(probe)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macos_speaks_with_say() {
        assert_eq!(default_speech(Platform::MacOS).0, "say");
    }

    #[test]
    fn other_platforms_use_espeak() {
        assert_eq!(default_speech(Platform::Linux).0, "espeak");
        assert_eq!(default_speech(Platform::Unknown).0, "espeak");
    }

    #[test]
    fn say_is_probed_by_listing_voices() {
        assert_eq!(speech_probe("say"), &["-v", "?"]);
        assert_eq!(speech_probe("espeak"), &["--version"]);
    }

    #[test]
    fn missing_program_is_unavailable() {
        assert!(!command_available("subwatch-no-such-program", &["--version"]));
    }
}
