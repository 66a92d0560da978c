mod error;
mod handle;
mod launcher;
pub mod raw_mode;
pub mod relay;
mod resize;
mod spawn_config;

pub use error::{GeometryError, LaunchError, RelayError, TerminalModeError};
pub use handle::{Geometry, PtyHandle};
pub use launcher::{launch, LaunchedPty};
pub use raw_mode::{RawModeGuard, TerminalModeState};
pub use relay::OutputRelay;
pub use resize::ResizeWatcher;
pub use spawn_config::ShellCommand;
