/// polecam Terminal Demo - Orbit camera and object poles
///
/// Usage: polecam-terminal [CONFIG.toml]
///
/// Controls:
///   - Left drag: Orbit the camera (Ctrl = single axis, Alt = roll)
///   - Right drag: Rotate the cube (Ctrl = single axis, Alt = spin)
///   - Wheel: Zoom (Shift for small steps)
///   - WASDQE: Move the camera target (Shift for small steps)
///   - P / - / =: Pause, rewind, fast-forward timers (1/2/3 pick which)
///   - l / L: HDR / gamma lighting, K: gamma toggle, Y/H: gamma up/down
///   - M: Lighting model, T: Target marker, Space: Time of day
///   - ESC: Quit

use std::io;
use std::path::Path;

use polecam_core::PoleConfig;
use polecam_terminal::TerminalApp;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => PoleConfig::load(Path::new(&path))
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?,
        None => PoleConfig::default(),
    };

    let mut app = TerminalApp::new(&config)?;
    app.run()
}
