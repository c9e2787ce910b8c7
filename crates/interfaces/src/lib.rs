pub mod desktop;
pub mod terminal;
pub mod traits;

pub use desktop::DesktopNotifier;
pub use terminal::TerminalInterface;
pub use traits::{Indicator, InterfaceError, Notifier};
